//! Struct Description Helpers
//!
//! Field listing ditulis manual per type lewat trait [`Describe`].
//! Address diperlakukan sebagai identity token 64-bit yang opaque:
//! consumer tidak pernah men-dereference-nya.

use crate::error::BufferOverflow;
use crate::protocol::Writer;
use std::mem;

/// Identity token untuk sebuah value di memori proses ini
#[inline(always)]
pub fn addr_of<T: ?Sized>(value: &T) -> u64 {
    value as *const T as *const () as usize as u64
}

/// Type yang bisa mendeskripsikan field-fieldnya ke tape
///
/// ```
/// use structtape::{Describe, Writer};
///
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Describe for Point {
///     const KIND: &'static str = "Point";
///
///     fn describe_fields(&self, w: &mut Writer<'_>) {
///         let _ = w.struct_field("x", "int", &self.x);
///         let _ = w.struct_field("y", "int", &self.y);
///     }
/// }
///
/// let p = Point { x: 1, y: 2 };
/// let mut buf = [0u8; 128];
/// let mut w = Writer::new(&mut buf);
/// w.describe(&p).unwrap();
/// w.close().unwrap();
/// ```
pub trait Describe {
    /// Kind name di record START
    const KIND: &'static str;

    /// Emit FIELD records. Hasil tiap write boleh diabaikan:
    /// error bersifat sticky dan dicek oleh [`Writer::describe`].
    fn describe_fields(&self, w: &mut Writer<'_>);
}

impl Writer<'_> {
    /// START(KIND, addr, size_of_val) + fields + END
    pub fn describe<T: Describe>(&mut self, value: &T) -> Result<(), BufferOverflow> {
        self.begin(T::KIND, addr_of(value), mem::size_of_val(value))?;
        value.describe_fields(self);
        self.end()
    }

    /// FIELD record dengan address dan size diambil dari reference field
    pub fn struct_field<F: ?Sized>(
        &mut self,
        name: &str,
        type_name: &str,
        field: &F,
    ) -> Result<(), BufferOverflow> {
        self.field(name, type_name, addr_of(field), mem::size_of_val(field))
    }
}
