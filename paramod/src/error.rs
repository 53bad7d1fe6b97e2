//! All error types for the paramod crate.
//!
//! Every stage of the build pipeline returns these. Nothing is recovered locally:
//! an error aborts the whole run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("schema error in {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("folder `raw/{folder}/` not found in archive {}", archive.display())]
    MissingFolder { folder: String, archive: PathBuf },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("upload error: {0}")]
    Upload(String),

    #[error("cannot encode U+{code_point:04X} at position {position}: {reason}")]
    Encoding {
        code_point: u32,
        position: usize,
        reason: &'static str,
    },

    #[error("invalid exclusion pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates a schema error for the JSON file at `path`.
    pub fn schema_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::Schema {
            path: path.into(),
            source,
        }
    }

    /// Creates an encoding error for the value at `position` of a code point sequence.
    pub fn encoding_error(code_point: u32, position: usize, reason: &'static str) -> Self {
        Error::Encoding {
            code_point,
            position,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("hoi4".to_string());
        assert_eq!(error.to_string(), "unknown format `hoi4`");
    }

    #[test]
    fn test_schema_error_names_file() {
        let json_error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::schema_error("raw/localisation/text.csv.json", json_error);
        let display = error.to_string();
        assert!(display.starts_with("schema error in raw/localisation/text.csv.json"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_missing_folder_error() {
        let error = Error::MissingFolder {
            folder: "localisation".to_string(),
            archive: PathBuf::from("tmp/paratranz.zip"),
        };
        assert_eq!(
            error.to_string(),
            "folder `raw/localisation/` not found in archive tmp/paratranz.zip"
        );
    }

    #[test]
    fn test_encoding_error_formats_code_point() {
        let error = Error::encoding_error(0x1F600, 3, "outside the basic multilingual plane");
        assert_eq!(
            error.to_string(),
            "cannot encode U+1F600 at position 3: outside the basic multilingual plane"
        );
    }

    #[test]
    fn test_status_error() {
        let error = Error::Status {
            url: "https://example.invalid/api".to_string(),
            status: 500,
        };
        assert_eq!(
            error.to_string(),
            "request to https://example.invalid/api failed with status 500"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Auth("PARATRANZ_SECRET is not set".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Auth"));
        assert!(debug.contains("PARATRANZ_SECRET"));
    }
}
