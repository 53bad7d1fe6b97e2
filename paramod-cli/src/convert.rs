use std::{fs, path::Path};

use paramod::{Converter, Error, PipelineConfig, RedactionPolicy, Table, formats::FormatPair};

/// Command-line overrides of the `[convert]` configuration.
#[derive(Debug, Default)]
pub struct ConvertOptions {
    pub encoder: Option<String>,
    pub printer: Option<String>,
    /// Added to the configured key list.
    pub exclude_keys: Vec<String>,
    pub exclude_pattern: Option<String>,
}

pub fn run_convert(
    config: &PipelineConfig,
    options: ConvertOptions,
    input: &Path,
    output: &Path,
) -> Result<(), Error> {
    let encoder: FormatPair = options
        .encoder
        .as_deref()
        .unwrap_or(config.convert.encoder.as_str())
        .parse()?;
    let printer: FormatPair = options
        .printer
        .as_deref()
        .unwrap_or(config.convert.printer.as_str())
        .parse()?;
    let policy = RedactionPolicy::new(
        options
            .exclude_pattern
            .as_deref()
            .unwrap_or(config.convert.exclude_pattern.as_str()),
        config
            .convert
            .exclude_keys
            .iter()
            .cloned()
            .chain(options.exclude_keys),
    )?;

    let written = Converter::new(policy, encoder, printer)?.convert_dir(input, output)?;
    for path in &written {
        println!("{}", path.display());
    }
    println!("✅ Converted {} file(s)", written.len());
    Ok(())
}

/// Print a converted table, one `KEY = TEXT` line per row.
pub fn run_inspect(input: &Path) -> Result<(), Error> {
    let table = Table::from_cp1252_bytes(&fs::read(input)?)?;
    for row in &table.rows {
        println!("{} = {}", row.key, visible(&row.text));
    }
    println!("✅ Found {} row(s)", table.len());
    Ok(())
}

/// Control characters, escape markers included, shown as `\u{..}`.
fn visible(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_unicode().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
