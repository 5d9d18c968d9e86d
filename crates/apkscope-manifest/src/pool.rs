//! Lazily decoded string pools.
//!
//! A pool is kept as its raw chunk plus the offset table; a string is decoded
//! only when something references it. Offsets may alias one another, so every
//! decode is charged against a [`TextBudget`] proportional to the input size.

use crate::chunk::{u8_at, u16_at, u32_at};
use crate::{ManifestError, Result};

const UTF8_FLAG: u32 = 1 << 8;

/// Decoded text may reach this multiple of the input size.
const EXPANSION_LIMIT: usize = 8;
/// Budget floor for small documents.
const MIN_BUDGET: usize = 64 * 1024;

/// Upper bound on the bytes of text decoded from one input.
#[derive(Debug)]
pub(crate) struct TextBudget {
    remaining: usize,
}

impl TextBudget {
    pub(crate) fn for_input(len: usize) -> Self {
        Self {
            remaining: len.saturating_mul(EXPANSION_LIMIT).max(MIN_BUDGET),
        }
    }

    pub(crate) fn charge(&mut self, bytes: usize) -> Result<()> {
        self.remaining = self
            .remaining
            .checked_sub(bytes)
            .ok_or(ManifestError::Malformed("decoded text exceeds input"))?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct StringPool<'a> {
    chunk: &'a [u8],
    header_size: usize,
    count: usize,
    strings_start: usize,
    utf8: bool,
}

impl<'a> StringPool<'a> {
    pub(crate) fn parse(chunk: &'a [u8], header_size: usize) -> Result<Self> {
        let count = u32_at(chunk, 8)? as usize;
        let flags = u32_at(chunk, 16)?;
        let strings_start = u32_at(chunk, 20)? as usize;

        if count.saturating_mul(4) > chunk.len().saturating_sub(header_size) {
            return Err(ManifestError::Malformed("string count exceeds pool"));
        }

        Ok(Self {
            chunk,
            header_size,
            count,
            strings_start,
            utf8: flags & UTF8_FLAG != 0,
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Decode string `index`, charging its length to `budget`.
    pub(crate) fn get(&self, index: u32, budget: &mut TextBudget) -> Result<String> {
        let index = index as usize;
        if index >= self.count {
            return Err(ManifestError::Malformed("string index out of range"));
        }
        let relative = u32_at(self.chunk, self.header_size + index * 4)? as usize;
        let at = self
            .strings_start
            .checked_add(relative)
            .ok_or(ManifestError::Malformed("string offset overflow"))?;

        let text = if self.utf8 {
            decode_utf8(self.chunk, at)?
        } else {
            decode_utf16(self.chunk, at)?
        };
        budget.charge(text.len())?;
        Ok(text)
    }
}

pub(crate) fn decode_utf16(chunk: &[u8], mut at: usize) -> Result<String> {
    let mut len = u16_at(chunk, at)? as usize;
    at += 2;
    if len & 0x8000 != 0 {
        len = ((len & 0x7FFF) << 16) | u16_at(chunk, at)? as usize;
        at += 2;
    }
    let bytes = chunk
        .get(at..at.saturating_add(len * 2))
        .ok_or(ManifestError::Malformed("string exceeds pool"))?;
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    Ok(String::from_utf16_lossy(&units))
}

pub(crate) fn decode_utf8(chunk: &[u8], mut at: usize) -> Result<String> {
    // character count, then byte count; each one or two bytes long
    let mut lengths = [0usize; 2];
    for length in &mut lengths {
        let first = u8_at(chunk, at)? as usize;
        at += 1;
        *length = if first & 0x80 != 0 {
            let second = u8_at(chunk, at)? as usize;
            at += 1;
            ((first & 0x7F) << 8) | second
        } else {
            first
        };
    }
    let bytes = chunk
        .get(at..at.saturating_add(lengths[1]))
        .ok_or(ManifestError::Malformed("string exceeds pool"))?;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
