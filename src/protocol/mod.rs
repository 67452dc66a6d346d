//! Protocol Layer: Tag-Length-Value Tape Encoding
//!
//! Prinsip desain:
//! - Flat Binary: record ditulis back-to-back, tanpa framing global
//! - Fixed-width numbers: address dan size selalu 8 bytes
//! - No allocation: writer hanya menyalin ke buffer milik caller
//! - Sticky error: overflow dicek sekali di akhir urutan write

mod decoder;
mod tag;
mod writer;

pub use decoder::{parse_regions, Decoder, Field, Record, Region, Slot};
pub use tag::{
    begin_len, cstring_len, field_len, Tag, ADDRESS_SIZE, CSTRING_KIND, END_LEN, EOF_LEN,
    SIZE_SIZE, TAG_SIZE,
};
pub use writer::Writer;
