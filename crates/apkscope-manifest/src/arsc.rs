//! Lookup of simple values in the compiled resource table (`resources.arsc`).
//!
//! Only what label resolution needs is read: the global string pool and the
//! per-type entry tables. Style maps (complex entries) are never followed.
//!
//! A resource id is `0xPPTTEEEE`: package, type and entry index. When an entry
//! is defined under several configurations the default configuration wins,
//! otherwise the first one in table order.

use crate::chunk::{
    self, RES_STRING_POOL_TYPE, RES_TABLE_PACKAGE_TYPE, RES_TABLE_TYPE, RES_TABLE_TYPE_TYPE,
    TYPE_REFERENCE, TYPE_STRING, u8_at, u16_at, u32_at,
};
use crate::pool::{StringPool, TextBudget};
use crate::{ManifestError, Result};

/// Archive member holding the compiled resource table.
pub const RESOURCE_TABLE_ENTRY: &str = "resources.arsc";

/// Reference chains longer than this are treated as unresolvable.
const MAX_REFERENCE_DEPTH: usize = 8;

const FLAG_SPARSE: u8 = 0x01;
const FLAG_OFFSET16: u8 = 0x02;

const ENTRY_FLAG_COMPLEX: u16 = 0x0001;
const ENTRY_FLAG_COMPACT: u16 = 0x0008;

const NO_ENTRY16: u16 = 0xFFFF;
const NO_ENTRY32: u32 = 0xFFFF_FFFF;

/// Offset of `ResTable_config` inside a type chunk header.
const CONFIG_OFFSET: usize = 20;

/// One `ResTable_type` chunk: the entries of a type under one configuration.
struct TypeChunk<'a> {
    package_id: u8,
    type_id: u8,
    body: &'a [u8],
    header_size: usize,
}

impl TypeChunk<'_> {
    fn is_default_config(&self) -> bool {
        let Ok(size) = u32_at(self.body, CONFIG_OFFSET) else {
            return false;
        };
        let end = (CONFIG_OFFSET + size as usize).min(self.header_size);
        self.body
            .get(CONFIG_OFFSET + 4..end)
            .is_some_and(|config| config.iter().all(|&b| b == 0))
    }

    /// `(data_type, data)` of entry `index`, if present and not complex.
    fn value(&self, index: u16) -> Result<Option<(u8, u32)>> {
        let flags = u8_at(self.body, 9)?;
        let entry_count = u32_at(self.body, 12)? as usize;
        let entries_start = u32_at(self.body, 16)? as usize;
        let table = self.header_size;

        let offset = if flags & FLAG_SPARSE != 0 {
            let mut found = None;
            for slot in 0..entry_count {
                let at = table + slot * 4;
                if u16_at(self.body, at)? == index {
                    found = Some(u16_at(self.body, at + 2)? as usize * 4);
                    break;
                }
            }
            match found {
                Some(offset) => offset,
                None => return Ok(None),
            }
        } else if (index as usize) >= entry_count {
            return Ok(None);
        } else if flags & FLAG_OFFSET16 != 0 {
            match u16_at(self.body, table + index as usize * 2)? {
                NO_ENTRY16 => return Ok(None),
                offset => offset as usize * 4,
            }
        } else {
            match u32_at(self.body, table + index as usize * 4)? {
                NO_ENTRY32 => return Ok(None),
                offset => offset as usize,
            }
        };

        let at = entries_start
            .checked_add(offset)
            .ok_or(ManifestError::Malformed("entry offset overflow"))?;
        let size = u16_at(self.body, at)? as usize;
        let entry_flags = u16_at(self.body, at + 2)?;

        if entry_flags & ENTRY_FLAG_COMPACT != 0 {
            return Ok(Some(((entry_flags >> 8) as u8, u32_at(self.body, at + 4)?)));
        }
        if entry_flags & ENTRY_FLAG_COMPLEX != 0 {
            return Ok(None);
        }

        let value = at + size;
        Ok(Some((u8_at(self.body, value + 3)?, u32_at(self.body, value + 4)?)))
    }
}

/// Parsed view over a resource table; borrows the table bytes.
pub struct ResourceTable<'a> {
    strings: Option<StringPool<'a>>,
    types: Vec<TypeChunk<'a>>,
    input_len: usize,
}

impl std::fmt::Debug for ResourceTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTable")
            .field("strings", &self.strings.map(|pool| pool.len()))
            .field("types", &self.types.len())
            .finish()
    }
}

impl<'a> ResourceTable<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let root = chunk::ChunkHeader::read(data, 0)?;
        if root.kind != RES_TABLE_TYPE {
            return Err(ManifestError::Malformed("not a resource table"));
        }

        let mut table = Self {
            strings: None,
            types: Vec::new(),
            input_len: data.len(),
        };

        for child in chunk::children(&data[..root.size], root.header_size) {
            let (header, body) = child?;
            match header.kind {
                RES_STRING_POOL_TYPE if table.strings.is_none() => {
                    table.strings = Some(StringPool::parse(body, header.header_size)?);
                }
                RES_TABLE_PACKAGE_TYPE => table.read_package(body, header.header_size)?,
                _ => {}
            }
        }

        Ok(table)
    }

    fn read_package(&mut self, body: &'a [u8], header_size: usize) -> Result<()> {
        let package_id = u32_at(body, 8)? as u8;
        for child in chunk::children(body, header_size) {
            let (header, type_body) = child?;
            if header.kind == RES_TABLE_TYPE_TYPE {
                self.types.push(TypeChunk {
                    package_id,
                    type_id: u8_at(type_body, 8)?,
                    body: type_body,
                    header_size: header.header_size,
                });
            }
        }
        Ok(())
    }

    fn value(&self, id: u32) -> Result<Option<(u8, u32)>> {
        let package_id = (id >> 24) as u8;
        let type_id = (id >> 16) as u8;
        let index = id as u16;

        let mut fallback = None;
        for candidate in self
            .types
            .iter()
            .filter(|t| t.package_id == package_id && t.type_id == type_id)
        {
            let Some(value) = candidate.value(index)? else {
                continue;
            };
            if candidate.is_default_config() {
                return Ok(Some(value));
            }
            fallback.get_or_insert(value);
        }
        Ok(fallback)
    }

    /// String value of resource `id`, following references. `None` when the id
    /// is undefined or its value is not a string.
    pub fn resolve_string(&self, id: u32) -> Result<Option<String>> {
        let mut budget = TextBudget::for_input(self.input_len);
        let mut id = id;
        for _ in 0..MAX_REFERENCE_DEPTH {
            match self.value(id)? {
                Some((TYPE_STRING, index)) => {
                    let strings = self
                        .strings
                        .as_ref()
                        .ok_or(ManifestError::Malformed("resource table has no string pool"))?;
                    return strings.get(index, &mut budget).map(Some);
                }
                Some((TYPE_REFERENCE, target)) => id = target,
                _ => return Ok(None),
            }
        }
        Ok(None)
    }
}
