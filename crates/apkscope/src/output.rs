use apkscope_archive::EntryInfo;
use apkscope_manifest::PackageMetadata;
use apkscope_scan::{ObfuscationVerdict, UrlSet};
use serde::Serialize;
use tabled::{
    Table, Tabled,
    settings::{Panel, Remove, Style, object::Rows},
};

#[derive(Debug, Clone, Default)]
pub struct Formatter {
    pub header: Option<String>,
    pub footer: Option<String>,
    pub hide_columns: bool,
}

impl Formatter {
    pub fn build<T: Tabled, I: IntoIterator<Item = T>>(self, data: I) -> Table {
        let mut table = Table::new(data);
        // column names are the first row until a header panel is inserted
        if self.hide_columns {
            table.with(Remove::row(Rows::first()));
        }
        if let Some(header) = self.header {
            table.with(Panel::header(header));
        }
        if let Some(footer) = self.footer {
            table.with(Panel::footer(footer));
        }

        table.with(Style::blank());
        table
    }
}

#[derive(Debug, Tabled)]
struct Field {
    field: &'static str,
    value: String,
}

impl Field {
    fn new(field: &'static str, value: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
struct Url<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct EntryRow {
    pub name: String,
    pub size: u64,
    #[tabled(rename = "compressed")]
    pub compressed_size: u64,
    #[tabled(rename = "kind")]
    #[serde(skip)]
    kind: &'static str,
}

impl From<EntryInfo> for EntryRow {
    fn from(info: EntryInfo) -> Self {
        Self {
            kind: if info.is_dir { "dir" } else { "file" },
            name: info.name,
            size: info.size,
            compressed_size: info.compressed_size,
        }
    }
}

pub fn metadata(metadata: &PackageMetadata) -> Table {
    let mut fields = vec![
        Field::new("package", &metadata.package_name),
        Field::new("label", &metadata.label),
        Field::new("version", &metadata.version),
        Field::new("path", metadata.path.display()),
    ];
    fields.extend(
        metadata
            .permissions
            .iter()
            .map(|permission| Field::new("permission", permission)),
    );
    Formatter {
        hide_columns: true,
        ..Default::default()
    }
    .build(fields)
}

pub fn endpoints(urls: &UrlSet) -> Table {
    Formatter {
        hide_columns: !urls.is_empty(),
        footer: Some(format!("{} url(s)", urls.len())),
        ..Default::default()
    }
    .build(urls.iter().map(|url| Url { url }))
}

pub fn verdict(verdict: &ObfuscationVerdict) -> Table {
    Formatter {
        hide_columns: true,
        ..Default::default()
    }
    .build([
        Field::new("total entropy", format!("{:.4}", verdict.total_entropy)),
        Field::new("payload entropy", format!("{:.4}", verdict.payload_entropy)),
        Field::new("obfuscated", verdict.is_obfuscated),
    ])
}

pub fn entries(rows: &[EntryRow]) -> Table {
    Formatter {
        footer: Some(format!("{} entries", rows.len())),
        ..Default::default()
    }
    .build(rows)
}
