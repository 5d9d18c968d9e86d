//! Chunk framing shared by binary XML and the resource table.
//!
//! Both formats are trees of little-endian chunks, each opening with a type,
//! a header size and a total size.

use crate::{ManifestError, Result};

pub(crate) const RES_STRING_POOL_TYPE: u16 = 0x0001;
pub(crate) const RES_TABLE_TYPE: u16 = 0x0002;
pub(crate) const RES_XML_TYPE: u16 = 0x0003;
pub(crate) const RES_XML_START_ELEMENT_TYPE: u16 = 0x0102;
pub(crate) const RES_XML_RESOURCE_MAP_TYPE: u16 = 0x0180;
pub(crate) const RES_TABLE_PACKAGE_TYPE: u16 = 0x0200;
pub(crate) const RES_TABLE_TYPE_TYPE: u16 = 0x0201;

pub(crate) const NO_INDEX: u32 = 0xFFFF_FFFF;

pub(crate) const TYPE_REFERENCE: u8 = 0x01;
pub(crate) const TYPE_STRING: u8 = 0x03;

pub(crate) fn u8_at(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset)
        .copied()
        .ok_or(ManifestError::Malformed("unexpected end of data"))
}

pub(crate) fn u16_at(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset.saturating_add(2))
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(ManifestError::Malformed("unexpected end of data"))
}

pub(crate) fn u32_at(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset.saturating_add(4))
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(ManifestError::Malformed("unexpected end of data"))
}

pub(crate) struct ChunkHeader {
    pub(crate) kind: u16,
    pub(crate) header_size: usize,
    pub(crate) size: usize,
}

impl ChunkHeader {
    pub(crate) fn read(data: &[u8], offset: usize) -> Result<Self> {
        let header = Self {
            kind: u16_at(data, offset)?,
            header_size: u16_at(data, offset + 2)? as usize,
            size: u32_at(data, offset + 4)? as usize,
        };
        if header.header_size < 8 || header.size < header.header_size {
            return Err(ManifestError::Malformed("invalid chunk header"));
        }
        if offset.saturating_add(header.size) > data.len() {
            return Err(ManifestError::Malformed("chunk exceeds document"));
        }
        Ok(header)
    }
}

/// Child chunks of `parent` from `start` on, as `(header, body)` pairs.
pub(crate) fn children(parent: &[u8], start: usize) -> Children<'_> {
    Children {
        data: parent,
        offset: start,
    }
}

pub(crate) struct Children<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Children<'a> {
    type Item = Result<(ChunkHeader, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset.saturating_add(8) > self.data.len() {
            return None;
        }
        let header = match ChunkHeader::read(self.data, self.offset) {
            Ok(header) => header,
            Err(e) => {
                self.offset = self.data.len();
                return Some(Err(e));
            }
        };
        let body = &self.data[self.offset..self.offset + header.size];
        self.offset += header.size;
        Some(Ok((header, body)))
    }
}
