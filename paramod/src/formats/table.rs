//! Support for the semicolon-delimited localisation table read by the games.
//!
//! A table is a fixed header line followed by one `KEY;TEXT;;;;;;;;;;;;;x` row per
//! record, joined by CRLF. Fields are never quoted.

use std::{
    fmt::{Display, Formatter},
    io::BufRead,
};

use encoding_rs::WINDOWS_1252;

use crate::{error::Error, traits::Parser};

/// Column header naming the locale columns. Always the first line.
pub const HEADER: &str = "#CODE;ENGLISH;FRENCH;GERMAN;;SPANISH;;;;;;;;;x";

/// Empty locale columns and end-of-row marker following the text column.
const ROW_TAIL: &str = ";;;;;;;;;;;;x";

pub const LINE_ENDING: &str = "\r\n";

/// One serialized record: its key and the text chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub key: String,
    pub text: String,
}

impl OutputRow {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

impl Display for OutputRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{};{};{}", self.key, self.text, ROW_TAIL)
    }
}

/// A whole localisation table in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<OutputRow>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<OutputRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The header and every row joined by CRLF, without a trailing line ending.
    pub fn to_text(&self) -> String {
        std::iter::once(HEADER.to_string())
            .chain(self.rows.iter().map(OutputRow::to_string))
            .collect::<Vec<_>>()
            .join(LINE_ENDING)
    }

    /// The text as one code point per character, ready for an [`crate::traits::Encoder`].
    pub fn code_points(&self) -> Vec<u32> {
        self.to_text().chars().map(u32::from).collect()
    }

    /// Read back a printed table, taking every byte as a Windows-1252 character.
    ///
    /// Escape sequences stay as their marker and payload characters.
    pub fn from_cp1252_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        Self::from_str(&text)
    }
}

impl Parser for Table {
    /// Parse from any reader. The first line is taken as the header and skipped.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .quoting(false)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            match (record.get(0), record.get(1)) {
                (Some(key), Some(text)) => rows.push(OutputRow::new(key, text)),
                _ => {
                    return Err(Error::DataMismatch(format!(
                        "row {} has fewer than two fields",
                        rows.len() + 1
                    )));
                }
            }
        }
        Ok(Table { rows })
    }

    /// Write the unencoded table text as UTF-8.
    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
