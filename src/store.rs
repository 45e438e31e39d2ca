//! CSV-backed measurement store.
//!
//! The first row of the file is always a header. Column 0 holds the date,
//! column 1 the weight and column 2 an optional comment; any further
//! columns are carried through untouched.

use chrono::NaiveDate;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const WEIGHT_COLUMN: usize = 1;
/// Header written when appending to an empty store.
pub const DEFAULT_HEADERS: [&str; 3] = ["date", "weight", "comment"];

/// A single weight entry as collected by the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub date: NaiveDate,
    pub weight: String,
    pub comment: String,
}

impl Measurement {
    /// Positional record fitted to exactly `width` columns: padded with
    /// empty fields, or cut short when the store has fewer columns. Cutting
    /// off a non-empty field is an error.
    fn to_record(&self, width: usize) -> Result<Vec<String>> {
        let mut fields = vec![
            self.date.format(DATE_FORMAT).to_string(),
            self.weight.clone(),
            self.comment.clone(),
        ];
        if let Some(column) = fields.iter().skip(width).position(|f| !f.is_empty()) {
            return Err(AppError::NoColumnFor {
                field: DEFAULT_HEADERS[width + column],
                width,
            });
        }
        fields.resize(width, String::new());
        Ok(fields)
    }
}

/// Rows-by-columns copy of the store, every cell kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MeasurementTable {
    /// Parse CSV with a header row. Ragged rows and invalid UTF-8 fail.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.iter().map(str::to_owned).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// Overwrite one cell verbatim. Returns `false` when `(row, column)`
    /// lies outside the table, leaving it unchanged.
    pub fn set_cell(&mut self, row: usize, column: usize, text: &str) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            Some(cell) => {
                cell.clear();
                cell.push_str(text);
                true
            }
            None => false,
        }
    }
}

/// Handle to the measurement CSV file named in the settings.
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    path: PathBuf,
}

impl MeasurementStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole store into memory.
    pub fn load(&self) -> Result<MeasurementTable> {
        MeasurementTable::from_reader(File::open(&self.path)?)
    }

    /// Most recent non-blank weight, or an empty string when there is none.
    pub fn last_measurement(&self) -> Result<String> {
        last_weight(File::open(&self.path)?)
    }

    /// Append `entry` as a new terminal row.
    ///
    /// The row is fitted to the width of the existing header. A store without
    /// a header (no bytes, or blank lines only) receives [`DEFAULT_HEADERS`]
    /// first. The store must already exist.
    pub fn append(&self, entry: &Measurement) -> Result<()> {
        let existing = std::fs::read(&self.path)?;
        let header_width = csv::Reader::from_reader(existing.as_slice())
            .headers()?
            .len();
        let needs_header = header_width == 0;
        let width = if needs_header {
            DEFAULT_HEADERS.len()
        } else {
            header_width
        };
        let record = entry.to_record(width)?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if !existing.is_empty() && !existing.ends_with(b"\n") {
            file.write_all(b"\n")?;
        }
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            wtr.write_record(DEFAULT_HEADERS)?;
        }
        wtr.write_record(record)?;
        wtr.flush()?;
        Ok(())
    }
}

fn last_weight<R: Read>(reader: R) -> Result<String> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut last = String::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(weight) = record.get(WEIGHT_COLUMN) {
            if !weight.trim().is_empty() {
                last = weight.to_owned();
            }
        }
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date,weight,comment\n\
2024-01-01,70.1,\n\
2024-01-02,,\n\
2024-01-03,70.5,note\n";

    fn store_with(contents: &str) -> (tempfile::TempDir, MeasurementStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body_weight_db.csv");
        std::fs::write(&path, contents).unwrap();
        (dir, MeasurementStore::new(path))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn last_measurement_skips_blank_weights() {
        let (_dir, store) = store_with(SAMPLE);
        assert_eq!(store.last_measurement().unwrap(), "70.5");

        let (_dir, store) = store_with("date,weight,comment\n2024-01-01,70.1,\n2024-01-02,,\n");
        assert_eq!(store.last_measurement().unwrap(), "70.1");
    }

    #[test]
    fn last_measurement_empty_when_no_weights() {
        let (_dir, store) = store_with("date,weight,comment\n2024-01-01,,\n2024-01-02, ,x\n");
        assert_eq!(store.last_measurement().unwrap(), "");

        let (_dir, store) = store_with("date,weight,comment\n");
        assert_eq!(store.last_measurement().unwrap(), "");

        let (_dir, store) = store_with("");
        assert_eq!(store.last_measurement().unwrap(), "");
    }

    #[test]
    fn last_measurement_ignores_header_and_short_rows() {
        let (_dir, store) = store_with("date,weight\n2024-01-01\n");
        assert_eq!(store.last_measurement().unwrap(), "");
    }

    #[test]
    fn last_measurement_missing_store_is_an_error() {
        let store = MeasurementStore::new("/nonexistent/dir/db.csv");
        assert!(matches!(store.last_measurement(), Err(AppError::Io(_))));
    }

    #[test]
    fn load_keeps_file_order_and_duplicates() {
        let (_dir, store) = store_with(
            "date,weight,comment\n2024-01-03,70.5,\n2024-01-01,70.1,\n2024-01-01,70.2,again\n",
        );
        let table = store.load().unwrap();
        assert_eq!(table.headers, vec!["date", "weight", "comment"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.cell(0, 0), Some("2024-01-03"));
        assert_eq!(table.cell(2, 2), Some("again"));
        assert_eq!(table.cell(3, 0), None);
    }

    #[test]
    fn load_rejects_ragged_rows() {
        let (_dir, store) = store_with("date,weight,comment\n2024-01-01,70.1\n");
        assert!(matches!(store.load(), Err(AppError::Store(_))));
    }

    #[test]
    fn load_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.csv");
        std::fs::write(&path, b"date,weight,comment\n2024-01-01,\xff\xfe,\n").unwrap();
        let store = MeasurementStore::new(path);
        assert!(matches!(store.load(), Err(AppError::Store(_))));
    }

    #[test]
    fn set_cell_overwrites_verbatim() {
        let (_dir, store) = store_with(SAMPLE);
        let mut table = store.load().unwrap();
        assert!(table.set_cell(0, WEIGHT_COLUMN, "not a number"));
        assert_eq!(table.cell(0, WEIGHT_COLUMN), Some("not a number"));
        assert!(!table.set_cell(10, 0, "x"));
        assert!(!table.set_cell(0, 10, "x"));
    }

    #[test]
    fn append_adds_terminal_row() {
        let (_dir, store) = store_with(SAMPLE);
        store
            .append(&Measurement {
                date: date("2024-01-04"),
                weight: "70.4".into(),
                comment: "after run, tired".into(),
            })
            .unwrap();

        let table = store.load().unwrap();
        assert_eq!(table.row_count(), 4);
        assert_eq!(
            table.rows[3],
            vec!["2024-01-04", "70.4", "after run, tired"]
        );
        assert_eq!(store.last_measurement().unwrap(), "70.4");
    }

    #[test]
    fn append_pads_to_header_width() {
        let (_dir, store) = store_with("date,weight,comment,bodyfat\n2024-01-01,70.1,,18\n");
        store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "70.0".into(),
                comment: String::new(),
            })
            .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.rows[1], vec!["2024-01-02", "70.0", "", ""]);
    }

    #[test]
    fn append_handles_missing_trailing_newline() {
        let (_dir, store) = store_with("date,weight,comment\n2024-01-01,70.1,");
        store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "69.9".into(),
                comment: String::new(),
            })
            .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 1), Some("70.1"));
        assert_eq!(table.cell(1, 1), Some("69.9"));
    }

    #[test]
    fn append_to_empty_store_writes_header() {
        let (_dir, store) = store_with("");
        store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "69.9".into(),
                comment: "first".into(),
            })
            .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.headers, DEFAULT_HEADERS);
        assert_eq!(table.rows, vec![vec!["2024-01-02", "69.9", "first"]]);
    }

    #[test]
    fn append_to_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = MeasurementStore::new(dir.path().join("missing.csv"));
        let err = store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "69.9".into(),
                comment: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn append_to_two_column_store() {
        let (_dir, store) = store_with("date,weight\n2024-01-01,70.1\n");
        store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "70.0".into(),
                comment: String::new(),
            })
            .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.headers, vec!["date", "weight"]);
        assert_eq!(table.rows[1], vec!["2024-01-02", "70.0"]);
        assert_eq!(store.last_measurement().unwrap(), "70.0");
    }

    #[test]
    fn append_comment_without_comment_column_is_refused() {
        let contents = "date,weight\n2024-01-01,70.1\n";
        let (_dir, store) = store_with(contents);
        let err = store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "70.0".into(),
                comment: "note".into(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::NoColumnFor {
                field: "comment",
                width: 2
            }
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), contents);
        assert_eq!(store.load().unwrap().row_count(), 1);
    }

    #[test]
    fn append_to_blank_line_store_writes_header() {
        let (_dir, store) = store_with("\n");
        store
            .append(&Measurement {
                date: date("2024-01-02"),
                weight: "70.0".into(),
                comment: String::new(),
            })
            .unwrap();
        let table = store.load().unwrap();
        assert_eq!(table.headers, DEFAULT_HEADERS);
        assert_eq!(table.rows, vec![vec!["2024-01-02", "70.0", ""]]);
        assert_eq!(store.last_measurement().unwrap(), "70.0");
    }
}
