//! Traits for reading source files and for the two-stage text transcoding in paramod.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one file of a textual format.
///
/// # Example
///
/// ```rust,no_run
/// use paramod::{TranslationRecord, traits::Parser};
/// let records = Vec::<TranslationRecord>::read_from("raw/localisation/text.csv.json")?;
/// println!("{} records", records.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// First transcoding stage: remaps source code points into the value space of a
/// game's text engine.
///
/// The input holds one value per source character; the output may be longer when
/// characters are expanded into escape sequences.
pub trait Encoder {
    fn encode(&self, src: &[u32]) -> Result<Vec<u32>, Error>;
}

/// Second transcoding stage: serializes an encoded sequence in a file convention.
pub trait Printer {
    /// Render the sequence to the exact bytes that [`Printer::print`] writes.
    fn render(&self, src: &[u32]) -> Result<Vec<u8>, Error>;

    /// Write the rendered sequence to `out_file_path`, replacing any existing file.
    fn print(&self, src: &[u32], out_file_path: &Path) -> Result<(), Error> {
        let bytes = self.render(src)?;
        std::fs::write(out_file_path, bytes)?;
        Ok(())
    }
}
