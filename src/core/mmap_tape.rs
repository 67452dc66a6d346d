//! Memory-Mapped Tape File
//!
//! Buffer milik caller yang di-back oleh file, sehingga viewer eksternal
//! bisa membaca stream yang sama tanpa copy:
//! - Zero-copy: Writer menulis langsung ke mapping
//! - Fixed capacity: ukuran file = kapasitas tape, tidak pernah tumbuh
//! - Persistence: isi tape tersimpan ke disk saat flush / drop

use crate::protocol::{parse_regions, Region, Writer};
use crate::Result;
use memmap2::{MmapMut, MmapOptions};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tracing::debug;

/// Tape yang di-mmap dari file
pub struct MmapTape {
    mmap: MmapMut,
}

impl MmapTape {
    /// Membuat tape baru (atau menimpa yang lama), diisi nol
    ///
    /// # Arguments
    /// * `path` - Path ke file tape
    /// * `capacity` - Kapasitas dalam bytes (harus > 0)
    pub fn create<P: AsRef<Path>>(path: P, capacity: usize) -> io::Result<Self> {
        if capacity == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "tape capacity must be non-zero",
            ));
        }

        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        // Truncate lalu set_len: seluruh isi jadi nol
        file.set_len(capacity as u64)?;

        // SAFETY: File baru dibuka read/write dan tidak di-share dengan writer lain
        let mmap = unsafe { MmapOptions::new().len(capacity).map_mut(&file)? };

        debug!(path = %path.display(), capacity, "created tape");
        Ok(Self { mmap })
    }

    /// Membuka tape yang sudah ada; kapasitas = ukuran file
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "tape file is empty",
            ));
        }

        // SAFETY: Caller bertanggung jawab agar file tidak di-truncate selama di-map
        let mmap = unsafe { MmapOptions::new().map_mut(&file)? };

        debug!(path = %path.display(), capacity = mmap.len(), "opened tape");
        Ok(Self { mmap })
    }

    /// Writer baru di awal tape. Writer sebelumnya (jika ada) sudah
    /// tidak bisa hidup karena borrow.
    ///
    /// Isi lama di-nol-kan dulu: stream yang overflow atau tidak di-close
    /// gagal di-decode, bukan tersambung dengan record lama.
    pub fn writer(&mut self) -> Writer<'_> {
        self.mmap.fill(0);
        Writer::new(&mut self.mmap[..])
    }

    /// Isi tape lengkap (termasuk bagian yang belum ditulis)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.mmap.len()
    }

    /// Parse isi tape
    pub fn regions(&self) -> Result<Vec<Region<'_>>> {
        Ok(parse_regions(self.as_bytes())?)
    }

    /// Sinkronkan mapping ke disk
    pub fn flush(&self) -> io::Result<()> {
        self.mmap.flush()
    }
}
