//! Printers serializing encoded sequences in a game's on-disk text convention.

use encoding_rs::WINDOWS_1252;

use crate::{error::Error, traits::Printer};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

fn to_bytes(src: &[u32]) -> Result<Vec<u8>, Error> {
    src.iter()
        .enumerate()
        .map(|(position, &value)| {
            u8::try_from(value)
                .map_err(|_| Error::encoding_error(value, position, "not an 8-bit value"))
        })
        .collect()
}

/// Writes every value as one raw byte (`.txt`/`.csv` localisation tables).
#[derive(Debug, Clone, Copy, Default)]
pub struct BytePrinter;

impl Printer for BytePrinter {
    fn render(&self, src: &[u32]) -> Result<Vec<u8>, Error> {
        to_bytes(src)
    }
}

/// Writes a UTF-8 file with a byte order mark in which every value is the
/// Windows-1252 character of that byte (`.yml` localisation).
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8BomPrinter;

impl Printer for Utf8BomPrinter {
    fn render(&self, src: &[u32]) -> Result<Vec<u8>, Error> {
        let bytes = to_bytes(src)?;
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
        let mut out = Vec::with_capacity(UTF8_BOM.len() + text.len());
        out.extend_from_slice(&UTF8_BOM);
        out.extend_from_slice(text.as_bytes());
        Ok(out)
    }
}
