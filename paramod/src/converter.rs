//! Conversion of Paratranz JSON exports into encoded localisation tables.
//!
//! Row composition is independent of the target: the encoder and printer are
//! looked up by [`FormatPair`] and only ever see the composed table text.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    error::Error,
    formats::{FormatPair, OutputRow, Table, encoder_for, paratranz::read_records, printer_for},
    redaction::RedactionPolicy,
    traits::{Encoder, Printer},
    types::TranslationRecord,
};

/// Composes the table for `records`: one row per record, in input order.
///
/// # Example
///
/// ```rust
/// use paramod::{RedactionPolicy, TranslationRecord, converter::compose_table};
///
/// let records = vec![TranslationRecord::new("PROV12", "Paris", "Paris-FR")];
/// let table = compose_table(&records, &RedactionPolicy::default());
/// assert_eq!(table.rows[0].to_string(), "PROV12;Paris;;;;;;;;;;;;;x");
/// ```
pub fn compose_table(records: &[TranslationRecord], policy: &RedactionPolicy) -> Table {
    let rows = records
        .iter()
        .map(|record| {
            let text = policy.select(record);
            if text.contains([';', '\r', '\n']) {
                warn!(key = %record.key, "text contains a delimiter or line break");
            }
            OutputRow::new(record.key.clone(), text)
        })
        .collect();
    Table::with_rows(rows)
}

/// Output file name for an export file: the name with its `.json` extension stripped.
pub fn output_file_name(input: &Path) -> Option<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// Lists the `*.json` files directly inside `dir`, sorted by file name.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Converts translation exports with a fixed redaction policy and transcoding pair.
pub struct Converter {
    policy: RedactionPolicy,
    encoder: Box<dyn Encoder>,
    printer: Box<dyn Printer>,
}

impl Converter {
    /// Creates a converter using the strategies registered for the given pairs.
    pub fn new(
        policy: RedactionPolicy,
        encoder: FormatPair,
        printer: FormatPair,
    ) -> Result<Self, Error> {
        Ok(Self::with_strategies(
            policy,
            encoder_for(encoder)?,
            printer_for(printer)?,
        ))
    }

    /// Creates a converter from explicit strategy objects.
    pub fn with_strategies(
        policy: RedactionPolicy,
        encoder: Box<dyn Encoder>,
        printer: Box<dyn Printer>,
    ) -> Self {
        Self {
            policy,
            encoder,
            printer,
        }
    }

    /// Composes the table for `records` under this converter's policy.
    pub fn compose(&self, records: &[TranslationRecord]) -> Table {
        compose_table(records, &self.policy)
    }

    /// Composes, encodes and renders `records` to the bytes of one output file.
    pub fn render(&self, records: &[TranslationRecord]) -> Result<Vec<u8>, Error> {
        let table = self.compose(records);
        let encoded = self.encoder.encode(&table.code_points())?;
        self.printer.render(&encoded)
    }

    /// Converts one export file into `out_dir`, returning the written path.
    pub fn convert_file(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, Error> {
        let records = read_records(input)?;
        let table = self.compose(&records);
        let encoded = self.encoder.encode(&table.code_points())?;
        let out_path = out_dir.join(Self::output_name(input)?);
        fs::create_dir_all(out_dir)?;
        self.printer.print(&encoded, &out_path)?;
        debug!(input = %input.display(), output = %out_path.display(), rows = table.len(), "converted");
        Ok(out_path)
    }

    /// Converts every `*.json` file in `in_dir` into `out_dir`.
    ///
    /// All files are parsed and rendered before anything is written, so a failure
    /// in any file leaves `out_dir` untouched.
    pub fn convert_dir(&self, in_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, Error> {
        let inputs = json_files(in_dir)?;

        let mut staged = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let records = read_records(input)?;
            let bytes = self.render(&records)?;
            debug!(input = %input.display(), records = records.len(), "rendered");
            staged.push((out_dir.join(Self::output_name(input)?), bytes));
        }

        fs::create_dir_all(out_dir)?;
        let mut written = Vec::with_capacity(staged.len());
        for (path, bytes) in staged {
            fs::write(&path, bytes)?;
            written.push(path);
        }

        info!(
            input = %in_dir.display(),
            output = %out_dir.display(),
            files = written.len(),
            "converted translation directory"
        );
        Ok(written)
    }

    fn output_name(input: &Path) -> Result<String, Error> {
        output_file_name(input).ok_or_else(|| {
            Error::DataMismatch(format!("invalid input file name: {}", input.display()))
        })
    }
}
