//! Persisted result table
//!
//! Every flush rewrites the whole accumulated table into a sibling temporary
//! file and renames it over the store, so readers only ever see a complete,
//! well-formed table.

use std::path::{Path, PathBuf};

use rankscout_common::record::{cell_text, parse_cell, text_cell};
use rankscout_common::{Record, Result};

/// File name of the result table inside the uploads folder
pub const RESULTS_FILE: &str = "results.csv";

/// CSV-backed result table
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
    identifier_column: Option<String>,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            identifier_column: None,
        }
    }

    /// Store at `<folder>/results.csv`
    pub fn in_folder(folder: &Path) -> Self {
        Self::new(folder.join(RESULTS_FILE))
    }

    /// Read `column` back as text, never as a number
    pub fn with_identifier_column(mut self, column: &str) -> Self {
        self.identifier_column = Some(column.to_string());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the stored table with `records`
    ///
    /// Columns are the union of all record keys in first-seen order; missing
    /// cells are written empty. No records → empty file.
    pub fn write_all(&self, records: &[Record]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            let columns = columns(records);

            if !columns.is_empty() {
                writer.write_record(&columns)?;
                for record in records {
                    writer.write_record(
                        columns
                            .iter()
                            .map(|c| record.get(c).map(cell_text).unwrap_or_default()),
                    )?;
                }
            }
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &self.path)?;

        tracing::info!(path = %self.path.display(), rows = records.len(), "Results saved");
        Ok(())
    }

    /// All stored records in table order
    ///
    /// Missing or empty store → no records. Cells are type-inferred (except
    /// the identifier column) and empty cells are left out of the record.
    pub fn read_all(&self) -> Result<Vec<Record>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let headers = rdr.headers()?.clone();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let record: Record = headers
                .iter()
                .zip(row.iter())
                .filter_map(|(h, cell)| {
                    let value = if self.identifier_column.as_deref() == Some(h) {
                        text_cell(cell)
                    } else {
                        parse_cell(cell)
                    };
                    value.map(|v| (h.to_string(), v))
                })
                .collect();
            records.push(record);
        }

        if records.is_empty() {
            tracing::debug!(path = %self.path.display(), "No data found in results file");
        }
        Ok(records)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| RESULTS_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Union of record keys in first-seen order
pub fn columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, serde_json::Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_store_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_folder(dir.path());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_empty_write_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_folder(dir.path());

        store.write_all(&[]).unwrap();

        assert!(store.path().exists());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_column_union_first_seen() {
        let records = vec![
            record(&[("productId", json!("B001")), ("title", json!("Lamp"))]),
            record(&[
                ("productId", json!("B002")),
                ("title", json!("Desk")),
                ("rank", json!(4)),
                ("monthly_sales", json!(2)),
            ]),
        ];

        assert_eq!(columns(&records), vec!["productId", "title", "rank", "monthly_sales"]);
    }

    #[test]
    fn test_write_then_read_infers_types() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_folder(dir.path());

        let records = vec![
            record(&[("productId", json!("B001")), ("title", json!("Lamp"))]),
            record(&[
                ("productId", json!("B002")),
                ("title", json!("Desk, oak")),
                ("rank", json!(4)),
                ("price", json!(12.5)),
                ("monthly_sales", json!(20)),
            ]),
        ];
        store.write_all(&records).unwrap();

        let read = store.read_all().unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0], records[0]);
        assert_eq!(read[1], records[1]);
        assert!(!read[0].contains_key("rank"));
    }

    #[test]
    fn test_identifier_column_read_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_folder(dir.path()).with_identifier_column("productId");

        let records = vec![
            record(&[("productId", json!("012345678905")), ("rank", json!(3))]),
            record(&[("productId", json!("4006381333931")), ("rank", json!(8))]),
        ];
        store.write_all(&records).unwrap();

        let read = store.read_all().unwrap();
        assert_eq!(read, records);
        assert!(std::fs::read_to_string(store.path())
            .unwrap()
            .contains("012345678905"));
    }

    #[test]
    fn test_rewrite_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::in_folder(dir.path());

        let first = vec![record(&[("productId", json!("B001"))])];
        let second = vec![
            record(&[("productId", json!("B001"))]),
            record(&[("productId", json!("B002"))]),
        ];

        store.write_all(&first).unwrap();
        store.write_all(&second).unwrap();

        assert_eq!(store.read_all().unwrap().len(), 2);
        assert!(!dir.path().join("results.csv.tmp").exists());
    }
}
