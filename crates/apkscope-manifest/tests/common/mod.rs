#![allow(dead_code)]

//! Binary manifest and archive builders for tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

const NO_INDEX: u32 = 0xFFFF_FFFF;

/// Framework attributes placed first in the pool so the resource map lines up.
const ANDROID_ATTRS: [(&str, u32); 3] = [
    ("label", 0x0101_0001),
    ("name", 0x0101_0003),
    ("versionName", 0x0101_021c),
];

pub enum Value<'a> {
    Str(&'a str),
    Int(i32),
    Ref(u32),
}

pub struct AxmlBuilder {
    strings: Vec<String>,
    chunks: Vec<u8>,
    utf8: bool,
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

impl AxmlBuilder {
    pub fn new() -> Self {
        Self {
            strings: ANDROID_ATTRS.iter().map(|(n, _)| n.to_string()).collect(),
            chunks: Vec::new(),
            utf8: false,
        }
    }

    /// Blank out framework attribute names, as shrinkers do.
    pub fn stripped() -> Self {
        let mut builder = Self::new();
        for name in builder.strings.iter_mut() {
            name.clear();
        }
        builder
    }

    pub fn utf8(mut self) -> Self {
        self.utf8 = true;
        self
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(i) = self.strings[ANDROID_ATTRS.len()..].iter().position(|x| x == s) {
            return (i + ANDROID_ATTRS.len()) as u32;
        }
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u32
    }

    fn attr_name(&mut self, name: &str) -> u32 {
        match ANDROID_ATTRS.iter().position(|(n, _)| *n == name) {
            Some(i) => i as u32,
            None => self.intern(name),
        }
    }

    pub fn start(mut self, tag: &str, attrs: &[(&str, Value<'_>)]) -> Self {
        let tag = self.intern(tag);
        let mut encoded = Vec::new();
        for (name, value) in attrs {
            let name = self.attr_name(name);
            let (raw, data_type, data) = match value {
                Value::Str(s) => {
                    let index = self.intern(s);
                    (index, 0x03u8, index)
                }
                Value::Int(i) => (NO_INDEX, 0x10, *i as u32),
                Value::Ref(id) => (NO_INDEX, 0x01, *id),
            };
            put_u32(&mut encoded, NO_INDEX);
            put_u32(&mut encoded, name);
            put_u32(&mut encoded, raw);
            put_u16(&mut encoded, 8);
            encoded.push(0);
            encoded.push(data_type);
            put_u32(&mut encoded, data);
        }

        let chunk = &mut self.chunks;
        put_u16(chunk, 0x0102);
        put_u16(chunk, 16);
        put_u32(chunk, (16 + 20 + encoded.len()) as u32);
        put_u32(chunk, 1);
        put_u32(chunk, NO_INDEX);
        put_u32(chunk, NO_INDEX);
        put_u32(chunk, tag);
        put_u16(chunk, 20);
        put_u16(chunk, 20);
        put_u16(chunk, attrs.len() as u16);
        put_u16(chunk, 0);
        put_u16(chunk, 0);
        put_u16(chunk, 0);
        chunk.extend_from_slice(&encoded);
        self
    }

    pub fn end(mut self, tag: &str) -> Self {
        let tag = self.intern(tag);
        let chunk = &mut self.chunks;
        put_u16(chunk, 0x0103);
        put_u16(chunk, 16);
        put_u32(chunk, 24);
        put_u32(chunk, 1);
        put_u32(chunk, NO_INDEX);
        put_u32(chunk, NO_INDEX);
        put_u32(chunk, tag);
        self
    }

    fn string_pool(&self) -> Vec<u8> {
        string_pool(&self.strings, self.utf8)
    }

    fn resource_map() -> Vec<u8> {
        let mut map = Vec::new();
        put_u16(&mut map, 0x0180);
        put_u16(&mut map, 8);
        put_u32(&mut map, 8 + 4 * ANDROID_ATTRS.len() as u32);
        for (_, id) in ANDROID_ATTRS {
            put_u32(&mut map, id);
        }
        map
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = self.string_pool();
        body.extend(Self::resource_map());
        body.extend_from_slice(&self.chunks);

        let mut document = Vec::new();
        put_u16(&mut document, 0x0003);
        put_u16(&mut document, 8);
        put_u32(&mut document, 8 + body.len() as u32);
        document.extend(body);
        document
    }
}

/// String pool chunk holding `strings` in order.
pub fn string_pool(strings: &[String], utf8: bool) -> Vec<u8> {
    let mut data = Vec::new();
    let mut offsets = Vec::new();
    for s in strings {
        offsets.push(data.len() as u32);
        if utf8 {
            data.push(s.chars().count() as u8);
            data.push(s.len() as u8);
            data.extend_from_slice(s.as_bytes());
            data.push(0);
        } else {
            let units: Vec<u16> = s.encode_utf16().collect();
            put_u16(&mut data, units.len() as u16);
            for unit in units {
                put_u16(&mut data, unit);
            }
            put_u16(&mut data, 0);
        }
    }
    while data.len() % 4 != 0 {
        data.push(0);
    }

    let header_size = 28u32;
    let strings_start = header_size + 4 * strings.len() as u32;
    let mut pool = Vec::new();
    put_u16(&mut pool, 0x0001);
    put_u16(&mut pool, header_size as u16);
    put_u32(&mut pool, strings_start + data.len() as u32);
    put_u32(&mut pool, strings.len() as u32);
    put_u32(&mut pool, 0);
    put_u32(&mut pool, if utf8 { 1 << 8 } else { 0 });
    put_u32(&mut pool, strings_start);
    put_u32(&mut pool, 0);
    for offset in offsets {
        put_u32(&mut pool, offset);
    }
    pool.extend_from_slice(&data);
    pool
}

/// Value of a simple resource entry.
pub enum Res<'a> {
    Str(&'a str),
    Ref(u32),
    Int(u32),
}

const PACKAGE_ID: u32 = 0x7f;
const CONFIG_SIZE: usize = 64;

/// Resource table with one package (`0x7f`) and any number of type chunks.
pub struct ArscBuilder {
    strings: Vec<String>,
    types: Vec<u8>,
}

impl ArscBuilder {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            types: Vec::new(),
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if let Some(i) = self.strings.iter().position(|x| x == s) {
            return i as u32;
        }
        self.strings.push(s.to_string());
        (self.strings.len() - 1) as u32
    }

    /// Entries of type `type_id`, indexed from zero; `None` leaves a hole.
    /// `language` selects a non-default configuration.
    pub fn entries(mut self, type_id: u8, language: Option<&str>, entries: &[Option<Res<'_>>]) -> Self {
        let header_size = 20 + CONFIG_SIZE;
        let entries_start = header_size + 4 * entries.len();

        let mut offsets = Vec::new();
        let mut data = Vec::new();
        for entry in entries {
            let Some(entry) = entry else {
                put_u32(&mut offsets, 0xFFFF_FFFF);
                continue;
            };
            put_u32(&mut offsets, data.len() as u32);
            let (data_type, value) = match entry {
                Res::Str(s) => (0x03u8, self.intern(s)),
                Res::Ref(id) => (0x01, *id),
                Res::Int(i) => (0x10, *i),
            };
            // ResTable_entry
            put_u16(&mut data, 8);
            put_u16(&mut data, 0);
            put_u32(&mut data, 0);
            // Res_value
            put_u16(&mut data, 8);
            data.push(0);
            data.push(data_type);
            put_u32(&mut data, value);
        }

        let mut config = vec![0u8; CONFIG_SIZE];
        config[..4].copy_from_slice(&(CONFIG_SIZE as u32).to_le_bytes());
        if let Some(language) = language {
            config[8..10].copy_from_slice(&language.as_bytes()[..2]);
        }

        let chunk = &mut self.types;
        put_u16(chunk, 0x0201);
        put_u16(chunk, header_size as u16);
        put_u32(chunk, (entries_start + data.len()) as u32);
        chunk.push(type_id);
        chunk.push(0);
        put_u16(chunk, 0);
        put_u32(chunk, entries.len() as u32);
        put_u32(chunk, entries_start as u32);
        chunk.extend_from_slice(&config);
        chunk.extend_from_slice(&offsets);
        chunk.extend_from_slice(&data);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let package_header = 288usize;
        let mut package = Vec::new();
        put_u16(&mut package, 0x0200);
        put_u16(&mut package, package_header as u16);
        put_u32(&mut package, (package_header + self.types.len()) as u32);
        put_u32(&mut package, PACKAGE_ID);
        package.extend_from_slice(&[0u8; 256]);
        for _ in 0..5 {
            put_u32(&mut package, 0);
        }
        package.extend_from_slice(&self.types);

        let pool = string_pool(&self.strings, false);
        let mut table = Vec::new();
        put_u16(&mut table, 0x0002);
        put_u16(&mut table, 12);
        put_u32(&mut table, (12 + pool.len() + package.len()) as u32);
        put_u32(&mut table, 1);
        table.extend(pool);
        table.extend(package);
        table
    }
}

pub fn write_archive(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let mut writer = zip::ZipWriter::new(File::create(path).expect("create archive"));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(content).expect("write entry");
    }
    writer.finish().expect("finish archive");
}
