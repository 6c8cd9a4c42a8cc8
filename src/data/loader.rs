use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{CellValue, TabularDataset};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures while loading or querying an exported table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed CSV in {path}: expected {expected} fields on line {line}, saw {found}")]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Empty file: {path} has no data rows")]
    Empty { path: PathBuf },

    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },
}

impl TableError {
    pub fn missing_column(column: &str, dataset: &TabularDataset) -> Self {
        TableError::MissingColumn {
            column: column.to_string(),
            available: dataset.column_names().join(", "),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Load an engine CSV export.
///
/// The first row holds the column names; every other row is a record whose
/// cells are typed one by one (integer, float, empty, text). Short records
/// are padded with nulls; records wider than the header and files with a
/// header but no records are rejected.
pub fn load_csv(path: &Path) -> Result<TabularDataset, TableError> {
    let file = std::fs::File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        if record.len() > headers.len() {
            return Err(TableError::TooManyFields {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record.iter().map(CellValue::parse).collect::<Vec<_>>());
    }

    let dataset = TabularDataset::from_rows(headers, records);
    if dataset.is_empty() {
        return Err(TableError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names(),
        path.display()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_drillhole_export() {
        let file = write_csv(
            "BHID,FROM,TO,LENGTH,ZONE,AU\n\
             DH1,0,1.5,1.5,1,0.25\n\
             DH1,1.5,3,1.5,2,\n",
        );
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.column_names(),
            vec!["BHID", "FROM", "TO", "LENGTH", "ZONE", "AU"]
        );
        assert_eq!(ds.column("LENGTH").unwrap().numeric_values(), vec![1.5, 1.5]);
        assert_eq!(ds.column("AU").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn header_only_file_is_empty() {
        let file = write_csv("BHID,FROM,TO,LENGTH\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, TableError::Empty { .. }), "got {err:?}");
    }

    #[test]
    fn zero_byte_file_is_empty() {
        let file = write_csv("");
        assert!(matches!(
            load_csv(file.path()),
            Err(TableError::Empty { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let file = write_csv("BHID,LENGTH,AU\nDH1,1.5,0.2\nDH1,2.0\n");
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("AU").unwrap().values[1], CellValue::Null);
        assert_eq!(ds.column("LENGTH").unwrap().numeric_values(), vec![1.5, 2.0]);
    }

    #[test]
    fn header_names_are_trimmed() {
        let file = write_csv("BHID, AU \nDH1,0.5\n");
        let ds = load_csv(file.path()).unwrap();
        assert_eq!(ds.column_names(), vec!["BHID", "AU"]);
        assert!(ds.column(" AU ").is_none());
    }

    #[test]
    fn long_rows_are_rejected() {
        let file = write_csv("A,B\n1,2\n3,4,5\n");
        match load_csv(file.path()) {
            Err(TableError::TooManyFields {
                line,
                expected,
                found,
                ..
            }) => assert_eq!((line, expected, found), (3, 2, 3)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
