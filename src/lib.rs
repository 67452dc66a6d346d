//! structtape - Zero-Allocation Struct Inspection Tapes
//!
//! Menulis deskripsi struct (nama, type, address, size tiap field) ke
//! buffer flat berukuran tetap, untuk dibaca oleh layer visualisasi
//! eksternal yang merender tree of values.
//!
//! Arsitektur:
//! - [`protocol`]: Tag-length-value writer dan decoder
//! - [`describe`]: Trait [`Describe`] dan address token
//! - [`core`]: Tape yang di-back oleh memory-mapped file
//!
//! ```
//! use structtape::{parse_regions, Writer};
//!
//! let mut buf = [0u8; 64];
//! let mut w = Writer::new(&mut buf);
//! w.begin("Point", 0x1000, 16).ok();
//! w.field("x", "int", 0x1000, 4).ok();
//! w.field("y", "int", 0x1004, 4).ok();
//! w.end().ok();
//! w.close().ok();
//! // Cukup cek sekali di akhir
//! assert!(w.status().is_ok());
//!
//! let regions = parse_regions(&buf).unwrap();
//! assert_eq!(regions[0].fields.len(), 2);
//! ```

pub mod core;
pub mod describe;
pub mod error;
pub mod protocol;

pub use crate::core::MmapTape;
pub use describe::{addr_of, Describe};
pub use error::{BufferOverflow, DecodeError, Error, Result};
pub use protocol::{parse_regions, Decoder, Record, Region, Tag, Writer};
