//! Zero-Allocation Tape Writer
//!
//! Append-only cursor di atas buffer milik caller.
//! Tidak ada alokasi, tidak ada resize: jika record tidak muat,
//! writer masuk ke error state dan tetap di sana.
//!
//! Record START/FIELD dicek ukurannya sekaligus sebelum sub-write pertama,
//! jadi tidak pernah ada record setengah jadi di buffer.

use super::tag::{begin_len, cstring_len, field_len, Tag, CSTRING_KIND};
use crate::error::BufferOverflow;
use std::ffi::CStr;

/// Writer untuk tape record
///
/// Buffer dipinjam dari caller, sehingga buffer pasti hidup lebih lama
/// dari writer. Kapasitas = panjang slice.
pub struct Writer<'a> {
    buffer: &'a mut [u8],
    len: usize,
    error: Option<BufferOverflow>,
}

impl<'a> Writer<'a> {
    /// Membuat writer di atas buffer. Selalu berhasil, termasuk untuk
    /// buffer kosong (write pertama langsung overflow).
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            len: 0,
            error: None,
        }
    }

    /// Pastikan `size` bytes masih muat tanpa menulis apapun.
    ///
    /// Jika tidak muat, error di-latch dan tidak ada byte yang disentuh.
    #[inline(always)]
    fn ensure(&mut self, size: usize) -> Result<(), BufferOverflow> {
        if let Some(err) = self.error {
            return Err(err);
        }

        // Slice length <= isize::MAX, jadi penjumlahan ini tidak wrap
        if self.len + size > self.buffer.len() {
            let err = BufferOverflow {
                len: self.len,
                requested: size,
                capacity: self.buffer.len(),
            };
            self.error = Some(err);
            return Err(err);
        }
        Ok(())
    }

    /// Reserve `size` bytes di posisi tulis dan commit panjangnya
    #[inline(always)]
    fn reserve(&mut self, size: usize) -> Result<&mut [u8], BufferOverflow> {
        self.ensure(size)?;
        let start = self.len;
        self.len += size;
        Ok(&mut self.buffer[start..self.len])
    }

    /// Append raw bytes
    #[inline(always)]
    pub fn append_raw(&mut self, data: &[u8]) -> Result<(), BufferOverflow> {
        self.reserve(data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// Append satu tag byte
    #[inline(always)]
    pub fn write_tag(&mut self, tag: Tag) -> Result<(), BufferOverflow> {
        self.append_raw(&[tag as u8])
    }

    /// Append address sebagai u64 (8 bytes)
    #[inline(always)]
    pub fn write_address(&mut self, address: u64) -> Result<(), BufferOverflow> {
        self.append_raw(&address.to_ne_bytes())
    }

    /// Append size, di-widen ke u64 (8 bytes)
    #[inline(always)]
    pub fn write_size(&mut self, size: usize) -> Result<(), BufferOverflow> {
        self.append_raw(&(size as u64).to_ne_bytes())
    }

    /// Append string + NUL terminator
    ///
    /// Seperti `strlen`, hanya bytes sebelum NUL pertama yang ditulis.
    #[inline(always)]
    pub fn write_cstring(&mut self, s: &str) -> Result<(), BufferOverflow> {
        let n = cstring_len(s) - 1;
        let dst = self.reserve(n + 1)?;
        dst[..n].copy_from_slice(&s.as_bytes()[..n]);
        dst[n] = 0;
        Ok(())
    }

    /// START record: mulai mendeskripsikan satu value
    ///
    /// Record di-commit utuh atau tidak sama sekali.
    pub fn begin(&mut self, kind: &str, address: u64, size: usize) -> Result<(), BufferOverflow> {
        self.ensure(begin_len(kind))?;
        self.write_tag(Tag::Start)?;
        self.write_cstring(kind)?;
        self.write_address(address)?;
        self.write_size(size)
    }

    /// FIELD record untuk struct yang sedang terbuka
    pub fn field(
        &mut self,
        name: &str,
        type_name: &str,
        address: u64,
        size: usize,
    ) -> Result<(), BufferOverflow> {
        self.ensure(field_len(name, type_name))?;
        self.write_tag(Tag::Field)?;
        self.write_cstring(name)?;
        self.write_cstring(type_name)?;
        self.write_address(address)?;
        self.write_size(size)
    }

    /// END record
    pub fn end(&mut self) -> Result<(), BufferOverflow> {
        self.write_tag(Tag::End)
    }

    /// EOF record. Seharusnya panggilan terakhir; writer tidak mencegah
    /// write setelahnya.
    pub fn close(&mut self) -> Result<(), BufferOverflow> {
        self.write_tag(Tag::Eof)
    }

    /// Deskripsikan satu string C utuh: START("cstring") langsung diikuti END
    pub fn cstring(&mut self, value: &CStr) -> Result<(), BufferOverflow> {
        let address = value.as_ptr() as usize as u64;
        self.begin(CSTRING_KIND, address, value.to_bytes_with_nul().len())?;
        self.end()
    }

    /// Status sticky saat ini
    #[inline(always)]
    pub fn status(&self) -> Result<(), BufferOverflow> {
        self.error.map_or(Ok(()), Err)
    }

    #[inline(always)]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Bytes yang sudah di-commit
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Sisa ruang di buffer
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.len
    }

    /// `buffer[0..len]`
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.len]
    }

    /// Lepas writer, kembalikan bagian buffer yang sudah ditulis
    pub fn into_written(self) -> &'a [u8] {
        let len = self.len;
        let buffer: &'a [u8] = self.buffer;
        &buffer[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::tag::{END_LEN, EOF_LEN};

    fn expected_begin(kind: &str, address: u64, size: u64) -> Vec<u8> {
        let mut out = vec![Tag::Start as u8];
        out.extend_from_slice(kind.as_bytes());
        out.push(0);
        out.extend_from_slice(&address.to_ne_bytes());
        out.extend_from_slice(&size.to_ne_bytes());
        out
    }

    fn expected_field(name: &str, type_name: &str, address: u64, size: u64) -> Vec<u8> {
        let mut out = vec![Tag::Field as u8];
        out.extend_from_slice(name.as_bytes());
        out.push(0);
        out.extend_from_slice(type_name.as_bytes());
        out.push(0);
        out.extend_from_slice(&address.to_ne_bytes());
        out.extend_from_slice(&size.to_ne_bytes());
        out
    }

    #[test]
    fn test_records_concatenate_in_call_order() {
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);

        w.begin("Point", 0x1000, 16).unwrap();
        w.field("x", "int", 0x1000, 4).unwrap();
        w.end().unwrap();
        w.close().unwrap();

        let mut expected = expected_begin("Point", 0x1000, 16);
        expected.extend(expected_field("x", "int", 0x1000, 4));
        expected.push(Tag::End as u8);
        expected.push(Tag::Eof as u8);

        assert!(!w.has_error());
        assert_eq!(w.len(), expected.len());
        assert_eq!(w.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_overflow_writes_nothing() {
        // begin("A") butuh 19 bytes, buffer hanya 8
        let mut buf = [0xAAu8; 8];
        let mut w = Writer::new(&mut buf);

        let err = w.begin("A", 0x1, 1).unwrap_err();
        assert!(w.has_error());
        assert_eq!(w.len(), 0);
        assert_eq!(
            err,
            BufferOverflow {
                len: 0,
                requested: begin_len("A"),
                capacity: 8,
            }
        );

        drop(w);
        assert_eq!(buf, [0xAA; 8]);
    }

    #[test]
    fn test_field_overflow_keeps_previous_records() {
        let cap = begin_len("S") + 4;
        let mut buf = vec![0u8; cap];
        let mut w = Writer::new(&mut buf);

        w.begin("S", 0x10, 4).unwrap();
        assert!(w.field("a", "int", 0x10, 4).is_err());
        assert_eq!(w.len(), begin_len("S"));
        assert_eq!(w.as_bytes(), &expected_begin("S", 0x10, 4)[..]);
    }

    #[test]
    fn test_single_write_overflow_leaves_length() {
        let mut buf = [0u8; 4];
        let mut w = Writer::new(&mut buf);

        w.append_raw(&[1, 2]).unwrap();
        assert!(w.append_raw(&[3, 4, 5]).is_err());
        assert_eq!(w.len(), 2);
        assert_eq!(w.as_bytes(), &[1, 2]);
    }

    #[test]
    fn test_error_is_sticky() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);

        let first = w.write_cstring("way too long").unwrap_err();
        assert_eq!(w.len(), 0);

        // Bahkan write 0 byte gagal dengan error yang sama
        assert_eq!(w.append_raw(&[]), Err(first));
        assert_eq!(w.write_tag(Tag::End), Err(first));
        assert_eq!(w.close(), Err(first));
        assert_eq!(w.status(), Err(first));
        assert_eq!(w.len(), 0);
        assert!(w.as_bytes().is_empty());
    }

    #[test]
    fn test_close_after_error_appends_nothing() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        assert!(w.begin("A", 0x1, 1).is_err());

        assert!(w.close().is_err());
        assert!(w.has_error());
        assert_eq!(w.len(), 0);
        drop(w);
        assert_eq!(buf, [0u8; 8]);
    }

    #[test]
    fn test_exact_fit() {
        let cap = begin_len("Exact") + END_LEN;
        let mut buf = vec![0u8; cap];
        let mut w = Writer::new(&mut buf);

        w.begin("Exact", 0xdead, 3).unwrap();
        w.end().unwrap();

        assert!(!w.has_error());
        assert_eq!(w.len(), w.capacity());
        assert_eq!(w.remaining(), 0);
        // Byte berikutnya overflow
        assert!(w.close().is_err());
    }

    #[test]
    fn test_empty_cstring() {
        let mut buf = [0xFFu8; 16];
        let mut w = Writer::new(&mut buf);
        w.write_cstring("").unwrap();
        assert_eq!(w.as_bytes(), &[0]);
    }

    #[test]
    fn test_cstring_layout() {
        let mut buf = [0xFFu8; 16];
        let mut w = Writer::new(&mut buf);
        w.write_cstring("hello").unwrap();
        assert_eq!(w.len(), 6);
        assert_eq!(w.as_bytes(), b"hello\0");
    }

    #[test]
    fn test_cstring_stops_at_embedded_nul() {
        let mut buf = [0xFFu8; 16];
        let mut w = Writer::new(&mut buf);
        w.write_cstring("ab\0cd").unwrap();
        assert_eq!(w.as_bytes(), b"ab\0");
    }

    #[test]
    fn test_cstring_is_atomic() {
        // 5 bytes muat, "hello\0" tidak: tidak boleh ada partial write
        let mut buf = [0xFFu8; 5];
        let mut w = Writer::new(&mut buf);
        assert!(w.write_cstring("hello").is_err());
        assert_eq!(w.len(), 0);
        drop(w);
        assert_eq!(buf, [0xFF; 5]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf: [u8; 0] = [];
        let mut w = Writer::new(&mut buf);
        assert!(w.is_empty());
        assert_eq!(w.end().unwrap_err().capacity, 0);
    }

    #[test]
    fn test_record_length_helpers_match_writer() {
        let mut buf = [0u8; 128];
        let mut w = Writer::new(&mut buf);

        w.begin("Node", 1, 2).unwrap();
        assert_eq!(w.len(), begin_len("Node"));
        w.field("next", "struct Node *", 3, 8).unwrap();
        assert_eq!(w.len(), begin_len("Node") + field_len("next", "struct Node *"));
        w.end().unwrap();
        w.close().unwrap();
        assert_eq!(
            w.len(),
            begin_len("Node") + field_len("next", "struct Node *") + END_LEN + EOF_LEN
        );
    }

    #[test]
    fn test_cstring_value_record() {
        let value = CStr::from_bytes_with_nul(b"hi\0").unwrap();
        let mut buf = [0u8; 64];
        let mut w = Writer::new(&mut buf);
        w.cstring(value).unwrap();

        let mut expected = expected_begin("cstring", value.as_ptr() as usize as u64, 3);
        expected.push(Tag::End as u8);
        assert_eq!(w.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_into_written() {
        let mut buf = [0u8; 8];
        let mut w = Writer::new(&mut buf);
        w.end().unwrap();
        w.close().unwrap();
        let written = w.into_written();
        assert_eq!(written, &[Tag::End as u8, Tag::Eof as u8]);
    }
}
