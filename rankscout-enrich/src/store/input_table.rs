//! Uploaded input table
//!
//! The whole table is read and validated before a run starts, so a malformed
//! upload fails without touching the result store.

use serde_json::Value;
use std::io::Read;
use std::path::Path;

use rankscout_common::{Error, Record, Result};

/// One input row; immutable once read
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    identifier: String,
    fields: Record,
}

impl InputRow {
    /// Trimmed identifier, `None` when empty
    pub fn identifier(&self) -> Option<&str> {
        if self.identifier.is_empty() {
            None
        } else {
            Some(&self.identifier)
        }
    }

    /// All cells as read, in column order
    pub fn fields(&self) -> &Record {
        &self.fields
    }
}

/// Parsed CSV table with a required identifier column
#[derive(Debug, Clone)]
pub struct InputTable {
    headers: Vec<String>,
    rows: Vec<InputRow>,
}

impl InputTable {
    pub fn from_path(path: &Path, identifier_column: &str) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Input(format!("Cannot open {}: {}", path.display(), e)))?;
        Self::from_reader(file, identifier_column)
    }

    pub fn from_reader<R: Read>(reader: R, identifier_column: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| Error::Input(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let id_index = headers
            .iter()
            .position(|h| h.trim() == identifier_column)
            .ok_or_else(|| {
                Error::Input(format!("Missing identifier column `{}`", identifier_column))
            })?;

        let mut rows = Vec::new();
        for (line, result) in rdr.records().enumerate() {
            let record =
                result.map_err(|e| Error::Input(format!("Bad CSV row {}: {}", line + 1, e)))?;

            // Short rows leave their trailing columns absent; cells without a
            // header have nowhere to go
            if record.len() > headers.len() {
                return Err(Error::Input(format!(
                    "Bad CSV row {}: {} fields, header has {}",
                    line + 1,
                    record.len(),
                    headers.len()
                )));
            }

            let fields: Record = headers
                .iter()
                .zip(record.iter())
                .map(|(h, cell)| (h.clone(), Value::String(cell.to_string())))
                .collect();

            rows.push(InputRow {
                identifier: record.get(id_index).unwrap_or("").trim().to_string(),
                fields,
            });
        }

        tracing::debug!(rows = rows.len(), columns = headers.len(), "Input table parsed");
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[InputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
