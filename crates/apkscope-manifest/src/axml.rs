//! Decoder for Android binary XML (the compiled form of `AndroidManifest.xml`).
//!
//! Only start tags are materialized; namespaces, end tags and text nodes are
//! skipped. Every offset is bounds-checked, so truncated or hostile input
//! yields [`ManifestError::Malformed`] rather than a panic.

use crate::chunk::{
    self, ChunkHeader, NO_INDEX, RES_STRING_POOL_TYPE, RES_XML_RESOURCE_MAP_TYPE,
    RES_XML_START_ELEMENT_TYPE, RES_XML_TYPE, TYPE_REFERENCE, TYPE_STRING, u8_at, u16_at, u32_at,
};
use crate::pool::{StringPool, TextBudget};
use crate::{ManifestError, Result};

const TYPE_INT_DEC: u8 = 0x10;
const TYPE_INT_HEX: u8 = 0x11;
const TYPE_INT_BOOLEAN: u8 = 0x12;

/// Typed value of a compiled attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Integer(i32),
    Boolean(bool),
    /// Resource table reference, unresolved.
    Reference(u32),
    Other { data_type: u8, data: u32 },
}

impl AttributeValue {
    /// Textual form for literal values; `None` for references and opaque data.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Reference(_) | Self::Other { .. } => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Framework attribute id from the resource map, if any.
    pub resource_id: Option<u32>,
    pub value: AttributeValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// Look up an attribute by local name, falling back to the framework id
    /// for manifests whose attribute names were stripped.
    pub fn attribute(&self, name: &str, resource_id: u32) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|a| a.resource_id == Some(resource_id))
            })
            .map(|a| &a.value)
    }
}

/// Start tags of a binary XML document, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    pub elements: Vec<Element>,
}

impl Document {
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.name == name)
    }
}

/// Decode a binary XML document.
pub fn parse(data: &[u8]) -> Result<Document> {
    let root = ChunkHeader::read(data, 0)?;
    if root.kind != RES_XML_TYPE {
        return Err(ManifestError::Malformed("not a binary xml document"));
    }

    let mut budget = TextBudget::for_input(data.len());
    let mut strings = None;
    let mut resource_ids = Vec::new();
    let mut document = Document::default();

    for child in chunk::children(&data[..root.size], root.header_size) {
        let (header, body) = child?;
        match header.kind {
            RES_STRING_POOL_TYPE => strings = Some(StringPool::parse(body, header.header_size)?),
            RES_XML_RESOURCE_MAP_TYPE => {
                resource_ids = body[header.header_size..]
                    .chunks_exact(4)
                    .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                    .collect();
            }
            RES_XML_START_ELEMENT_TYPE => {
                let strings = strings
                    .as_ref()
                    .ok_or(ManifestError::Malformed("element before string pool"))?;
                document.elements.push(parse_start_element(
                    body,
                    header.header_size,
                    strings,
                    &resource_ids,
                    &mut budget,
                )?);
            }
            _ => {}
        }
    }

    Ok(document)
}

fn parse_start_element(
    chunk: &[u8],
    header_size: usize,
    strings: &StringPool<'_>,
    resource_ids: &[u32],
    budget: &mut TextBudget,
) -> Result<Element> {
    let ext = header_size;
    let name = strings.get(u32_at(chunk, ext + 4)?, budget)?;
    let attribute_start = u16_at(chunk, ext + 8)? as usize;
    let attribute_size = u16_at(chunk, ext + 10)? as usize;
    let attribute_count = u16_at(chunk, ext + 12)? as usize;

    if attribute_size < 20 {
        return Err(ManifestError::Malformed("attribute record too small"));
    }

    let attributes = (0..attribute_count)
        .map(|i| {
            let at = ext + attribute_start + i * attribute_size;
            let name_index = u32_at(chunk, at + 4)?;
            let raw_value = u32_at(chunk, at + 8)?;
            let data_type = u8_at(chunk, at + 15)?;
            let data = u32_at(chunk, at + 16)?;

            let value = if raw_value != NO_INDEX {
                AttributeValue::String(strings.get(raw_value, budget)?)
            } else {
                match data_type {
                    TYPE_STRING => AttributeValue::String(strings.get(data, budget)?),
                    TYPE_INT_DEC | TYPE_INT_HEX => AttributeValue::Integer(data as i32),
                    TYPE_INT_BOOLEAN => AttributeValue::Boolean(data != 0),
                    TYPE_REFERENCE => AttributeValue::Reference(data),
                    _ => AttributeValue::Other { data_type, data },
                }
            };

            Ok(Attribute {
                name: strings.get(name_index, budget)?,
                resource_id: resource_ids.get(name_index as usize).copied(),
                value,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Element { name, attributes })
}
