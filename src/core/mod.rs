//! Core module: Storage untuk tape
//!
//! Prinsip desain:
//! - Zero-Copy: Tape langsung di-mmap, writer menulis ke page cache
//! - No-Allocation: Kapasitas ditentukan saat create, tidak pernah tumbuh

mod mmap_tape;

pub use mmap_tape::MmapTape;
