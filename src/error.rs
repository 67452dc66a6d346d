//! Error types untuk structtape
//!
//! - [`BufferOverflow`]: satu-satunya error dari sisi writer (sticky)
//! - [`DecodeError`]: stream tidak sesuai grammar saat dibaca kembali
//! - [`Error`]: gabungan untuk operasi yang menyentuh file (tape)

use std::io;
use thiserror::Error;

/// Write yang akan melewati kapasitas buffer.
///
/// Dicatat sekali pada write pertama yang gagal, lalu dikembalikan
/// apa adanya oleh setiap operasi berikutnya.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("buffer overflow: {requested} bytes requested at offset {len}, capacity {capacity}")]
pub struct BufferOverflow {
    /// Panjang yang sudah di-commit saat overflow terjadi
    pub len: usize,
    /// Ukuran write yang ditolak
    pub requested: usize,
    /// Total kapasitas buffer
    pub capacity: usize,
}

/// Errors saat mem-parse stream yang sudah di-encode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer habis di tengah record
    #[error("truncated record at offset {offset}: {needed} more bytes needed")]
    Truncated { offset: usize, needed: usize },

    /// String tanpa NUL terminator sebelum akhir buffer
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// Nama kind/field/type bukan UTF-8 valid
    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Tag byte yang tidak dikenal
    #[error("unexpected tag 0x{tag:02x} at offset {offset}")]
    UnexpectedTag { tag: u8, offset: usize },

    /// FIELD di luar pasangan START/END
    #[error("field '{name}' at offset {offset} is outside any region")]
    FieldOutsideRegion { name: String, offset: usize },

    /// END tanpa START yang terbuka
    #[error("END at offset {offset} has no matching START")]
    UnbalancedEnd { offset: usize },

    /// EOF ketika masih ada region yang terbuka
    #[error("region '{kind}' was never closed")]
    UnclosedRegion { kind: String },

    /// Buffer berakhir tanpa record EOF
    #[error("stream ended at offset {offset} without EOF")]
    MissingEof { offset: usize },
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Overflow(#[from] BufferOverflow),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("tape I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
