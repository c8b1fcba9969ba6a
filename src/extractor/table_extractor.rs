use crate::error::{AggregatorError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

pub const TABLE_DATA_PREFIX: &str = "Table data";
pub const CSV_EXTENSION: &str = ".csv";

/// The parsed "Table data" CSV of one export archive, header row included.
#[derive(Debug, Clone)]
pub struct TableData {
    pub entry_name: String,
    pub records: Vec<StringRecord>,
}

impl TableData {
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }
}

/// Opens a zip export and parses its "Table data" CSV entry.
pub fn read_table_data<P: AsRef<Path>>(archive_path: P) -> Result<TableData> {
    let path = archive_path.as_ref();
    let display = path.display().to_string();

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file).map_err(|source| AggregatorError::BadArchive {
        path: display.clone(),
        source,
    })?;

    let csv_entries: Vec<String> = archive
        .file_names()
        .filter(|name| name.ends_with(CSV_EXTENSION))
        .map(str::to_string)
        .collect();

    if csv_entries.is_empty() {
        return Err(AggregatorError::NoCsvEntries { path: display });
    }

    let Some(entry_name) = csv_entries
        .iter()
        .find(|name| name.starts_with(TABLE_DATA_PREFIX))
        .cloned()
    else {
        return Err(AggregatorError::TableDataNotFound {
            path: display,
            csv_entries,
        });
    };

    let mut bytes = Vec::new();
    {
        let mut entry = archive
            .by_name(&entry_name)
            .map_err(|source| AggregatorError::BadArchive {
                path: display.clone(),
                source,
            })?;
        entry.read_to_end(&mut bytes)?;
    }

    let text = String::from_utf8(bytes).map_err(|source| AggregatorError::Decode {
        path: display.clone(),
        entry: entry_name.clone(),
        source,
    })?;

    let records = parse_records(&text).map_err(|source| AggregatorError::Csv {
        path: display,
        source,
    })?;

    Ok(TableData { entry_name, records })
}

/// Parses standard comma-separated text into raw records. Rows may differ in length.
pub fn parse_records(text: &str) -> std::result::Result<Vec<StringRecord>, csv::Error> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .into_records()
        .collect()
}
