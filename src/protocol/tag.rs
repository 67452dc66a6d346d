//! Record Tags dan Ukuran Wire
//!
//! Layout setiap record (tanpa length prefix, dibaca berurutan):
//! ┌──────┬──────────────────────────────────────────────────┐
//! │ Tag  │ Payload                                          │
//! ├──────┼──────────────────────────────────────────────────┤
//! │ 0x01 │ kind\0  address(8)  size(8)            START     │
//! │ 0x03 │ name\0  type\0  address(8)  size(8)    FIELD     │
//! │ 0x02 │ -                                      END       │
//! │ 0xFF │ -                                      EOF       │
//! └──────┴──────────────────────────────────────────────────┘
//!
//! Address dan size selalu 8 bytes (native byte order), berapapun
//! lebar pointer di host.

/// Tag byte di awal setiap record
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Mulai mendeskripsikan satu value/struct
    Start = 1,
    /// Tutup START terakhir yang masih terbuka
    End = 2,
    /// Satu field dari struct yang sedang terbuka
    Field = 3,
    /// Akhir stream
    Eof = 0xFF,
}

impl Tag {
    #[inline(always)]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(Self::Start),
            2 => Some(Self::End),
            3 => Some(Self::Field),
            0xFF => Some(Self::Eof),
            _ => None,
        }
    }
}

pub const TAG_SIZE: usize = 1;
/// Lebar address di wire
pub const ADDRESS_SIZE: usize = 8;
/// Lebar size di wire
pub const SIZE_SIZE: usize = 8;

/// Kind name yang dipakai untuk string C tunggal
pub const CSTRING_KIND: &str = "cstring";

/// Bytes yang dibutuhkan `write_cstring(s)`: sampai NUL pertama, plus terminator
#[inline(always)]
pub fn cstring_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len()) + 1
}

/// Ukuran encoded dari satu record START
#[inline(always)]
pub fn begin_len(kind: &str) -> usize {
    TAG_SIZE + cstring_len(kind) + ADDRESS_SIZE + SIZE_SIZE
}

/// Ukuran encoded dari satu record FIELD
#[inline(always)]
pub fn field_len(name: &str, type_name: &str) -> usize {
    TAG_SIZE + cstring_len(name) + cstring_len(type_name) + ADDRESS_SIZE + SIZE_SIZE
}

/// Ukuran encoded dari END atau EOF
pub const END_LEN: usize = TAG_SIZE;
pub const EOF_LEN: usize = TAG_SIZE;
