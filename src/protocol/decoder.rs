//! Zero-Copy Tape Decoder
//!
//! Membaca stream record secara berurutan, digerakkan oleh tag.
//! Semua string di-borrow langsung dari buffer.

use super::tag::{Tag, ADDRESS_SIZE, SIZE_SIZE};
use crate::error::DecodeError;

/// Satu record yang sudah di-decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record<'a> {
    Start {
        kind: &'a str,
        address: u64,
        size: u64,
    },
    Field {
        name: &'a str,
        type_name: &'a str,
        address: u64,
        size: u64,
    },
    End,
    Eof,
}

/// Sequential decoder
pub struct Decoder<'a> {
    buffer: &'a [u8],
    read_pos: usize,
    finished: bool,
}

impl<'a> Decoder<'a> {
    #[inline(always)]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            read_pos: 0,
            finished: false,
        }
    }

    /// Decode record berikutnya.
    ///
    /// Returns `Ok(None)` setelah EOF. Bytes setelah EOF diabaikan.
    pub fn next_record(&mut self) -> Result<Option<Record<'a>>, DecodeError> {
        if self.finished {
            return Ok(None);
        }

        let offset = self.read_pos;
        let tag_byte = *self
            .buffer
            .get(offset)
            .ok_or(DecodeError::MissingEof { offset })?;
        let tag = Tag::from_u8(tag_byte).ok_or(DecodeError::UnexpectedTag {
            tag: tag_byte,
            offset,
        })?;
        self.read_pos += 1;

        let record = match tag {
            Tag::Start => Record::Start {
                kind: self.read_cstring()?,
                address: self.read_u64(ADDRESS_SIZE)?,
                size: self.read_u64(SIZE_SIZE)?,
            },
            Tag::Field => Record::Field {
                name: self.read_cstring()?,
                type_name: self.read_cstring()?,
                address: self.read_u64(ADDRESS_SIZE)?,
                size: self.read_u64(SIZE_SIZE)?,
            },
            Tag::End => Record::End,
            Tag::Eof => {
                self.finished = true;
                Record::Eof
            }
        };

        Ok(Some(record))
    }

    /// Posisi baca saat ini
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.read_pos
    }

    /// Remaining bytes
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read_pos)
    }

    fn read_cstring(&mut self) -> Result<&'a str, DecodeError> {
        let offset = self.read_pos;
        let rest = &self.buffer[offset..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString { offset })?;
        let s = std::str::from_utf8(&rest[..nul]).map_err(|_| DecodeError::InvalidUtf8 { offset })?;
        self.read_pos += nul + 1;
        Ok(s)
    }

    fn read_u64(&mut self, width: usize) -> Result<u64, DecodeError> {
        let offset = self.read_pos;
        let bytes = self
            .buffer
            .get(offset..offset + width)
            .ok_or_else(|| DecodeError::Truncated {
                offset,
                needed: width - (self.buffer.len() - offset),
            })?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        self.read_pos += width;
        Ok(u64::from_ne_bytes(raw))
    }
}

/// Satu field di dalam region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub type_name: &'a str,
    pub address: u64,
    pub size: u64,
}

/// Satu START..END yang sudah di-parse, termasuk region nested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<'a> {
    pub kind: &'a str,
    pub address: u64,
    pub size: u64,
    pub fields: Vec<Field<'a>>,
    pub children: Vec<Region<'a>>,
}

/// Satu slot dalam layout region: field, atau byte yang tidak diklaim field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'r, 'a> {
    Field(&'r Field<'a>),
    Padding { address: u64, size: u64 },
}

impl<'a> Region<'a> {
    /// Fields dalam urutan emisi, dengan padding di antara field dan di
    /// ekor region. Field yang overlap tidak menghasilkan padding.
    pub fn layout(&self) -> Vec<Slot<'_, 'a>> {
        let mut slots = Vec::with_capacity(self.fields.len() * 2 + 1);
        let mut last = self.address;

        for field in &self.fields {
            if last < field.address {
                slots.push(Slot::Padding {
                    address: last,
                    size: field.address - last,
                });
            }
            slots.push(Slot::Field(field));
            last = field.address.saturating_add(field.size);
        }

        let end = self.address.saturating_add(self.size);
        if last < end {
            slots.push(Slot::Padding {
                address: last,
                size: end - last,
            });
        }
        slots
    }
}

/// Parse seluruh tape menjadi tree of regions
///
/// FIELD selalu menempel ke region terdalam yang masih terbuka;
/// START di dalam region lain menjadi child.
pub fn parse_regions(buffer: &[u8]) -> Result<Vec<Region<'_>>, DecodeError> {
    let mut decoder = Decoder::new(buffer);
    let mut roots = Vec::new();
    let mut open: Vec<Region<'_>> = Vec::new();

    loop {
        let offset = decoder.position();
        let record = match decoder.next_record()? {
            Some(record) => record,
            None => break,
        };

        match record {
            Record::Start {
                kind,
                address,
                size,
            } => open.push(Region {
                kind,
                address,
                size,
                fields: Vec::new(),
                children: Vec::new(),
            }),
            Record::Field {
                name,
                type_name,
                address,
                size,
            } => {
                let region = open.last_mut().ok_or_else(|| DecodeError::FieldOutsideRegion {
                    name: name.to_string(),
                    offset,
                })?;
                region.fields.push(Field {
                    name,
                    type_name,
                    address,
                    size,
                });
            }
            Record::End => {
                let region = open.pop().ok_or(DecodeError::UnbalancedEnd { offset })?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(region),
                    None => roots.push(region),
                }
            }
            Record::Eof => {
                if let Some(region) = open.pop() {
                    return Err(DecodeError::UnclosedRegion {
                        kind: region.kind.to_string(),
                    });
                }
            }
        }
    }

    Ok(roots)
}
