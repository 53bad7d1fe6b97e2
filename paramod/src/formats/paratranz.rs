//! Support for the Paratranz raw JSON export.
//!
//! Each file is a JSON array of `{ "key", "original", "translation" }` objects;
//! other fields of the export are ignored.

use std::{io::BufRead, path::Path};

use crate::{error::Error, traits::Parser, types::TranslationRecord};

impl Parser for Vec<TranslationRecord> {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        serde_json::from_reader(reader).map_err(Error::Parse)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Error::Parse)
    }
}

/// Reads the records of one export file, attaching the path to schema errors.
pub fn read_records(path: &Path) -> Result<Vec<TranslationRecord>, Error> {
    Vec::<TranslationRecord>::read_from(path).map_err(|e| match e {
        Error::Parse(source) => Error::schema_error(path, source),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_records_in_array_order() {
        let json = r#"[
            {"key": "B", "original": "b", "translation": "bb"},
            {"key": "A", "original": "a", "translation": ""}
        ]"#;
        let records = Vec::<TranslationRecord>::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key, "B");
        assert_eq!(records[1].key, "A");
        assert!(records[1].is_untranslated());
    }

    #[test]
    fn test_empty_array() {
        let records = Vec::<TranslationRecord>::from_str("[]").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_non_array_is_rejected() {
        let result = Vec::<TranslationRecord>::from_str(r#"{"key": "A"}"#);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_read_records_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.csv.json");
        std::fs::write(&path, r#"[{"key": "A", "original": "a"}]"#).unwrap();

        match read_records(&path).unwrap_err() {
            Error::Schema { path: p, source } => {
                assert_eq!(p, path);
                assert!(source.to_string().contains("translation"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        let records = vec![TranslationRecord::new("TXT_WELCOME", "Hello", "Bonjour")];
        records.write_to(&path).unwrap();
        assert_eq!(read_records(&path).unwrap(), records);
    }
}
