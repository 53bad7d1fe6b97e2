//! File formats handled by paramod and the encode/print strategy registry.
//!
//! The two transcoding stages are looked up independently by a [`FormatPair`]
//! so the row composition in [`crate::converter`] never branches on the target.

pub mod escape;
pub mod paratranz;
pub mod printer;
pub mod table;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

pub use escape::SpecialEscapeEncoder;
pub use printer::{BytePrinter, Utf8BomPrinter};
pub use table::{HEADER, OutputRow, Table};

use crate::{
    error::Error,
    traits::{Encoder, Printer},
};

/// Games whose text engines have an encoder or printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    /// Europa Universalis IV.
    Eu4,
    /// Crusader Kings II.
    Ck2,
}

/// File conventions a game reads localisation from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Semicolon tables stored as 8-bit text.
    Txt,
    /// YAML localisation stored as UTF-8 with a byte order mark.
    Yml,
}

/// Key selecting one encoder or printer, written as `game:file` (e.g. `eu4:txt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatPair {
    pub game: Game,
    pub file: FileKind,
}

impl FormatPair {
    pub const fn new(game: Game, file: FileKind) -> Self {
        Self { game, file }
    }
}

impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Game::Eu4 => write!(f, "eu4"),
            Game::Ck2 => write!(f, "ck2"),
        }
    }
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FileKind::Txt => write!(f, "txt"),
            FileKind::Yml => write!(f, "yml"),
        }
    }
}

impl Display for FormatPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.game, self.file)
    }
}

impl FromStr for Game {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu4" => Ok(Game::Eu4),
            "ck2" => Ok(Game::Ck2),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl FromStr for FileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Ok(FileKind::Txt),
            "yml" | "yaml" => Ok(FileKind::Yml),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Accepts `game:file`, `game-file` or `game_file`, case-insensitive.
impl FromStr for FormatPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (game, file) = s
            .split_once([':', '-', '_'])
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))?;
        Ok(FormatPair {
            game: game.parse()?,
            file: file.parse()?,
        })
    }
}

/// Returns the encoder registered for `pair`.
pub fn encoder_for(pair: FormatPair) -> Result<Box<dyn Encoder>, Error> {
    match (pair.game, pair.file) {
        (Game::Eu4, FileKind::Txt) | (Game::Eu4, FileKind::Yml) | (Game::Ck2, FileKind::Txt) => {
            Ok(Box::new(SpecialEscapeEncoder::new()))
        }
        _ => Err(Error::UnsupportedFormat(format!("no encoder for {}", pair))),
    }
}

/// Returns the printer registered for `pair`.
pub fn printer_for(pair: FormatPair) -> Result<Box<dyn Printer>, Error> {
    match (pair.game, pair.file) {
        (Game::Eu4, FileKind::Txt) | (Game::Ck2, FileKind::Txt) => Ok(Box::new(BytePrinter)),
        (Game::Eu4, FileKind::Yml) => Ok(Box::new(Utf8BomPrinter)),
        _ => Err(Error::UnsupportedFormat(format!("no printer for {}", pair))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_pair() {
        assert_eq!(
            "eu4:txt".parse::<FormatPair>().unwrap(),
            FormatPair::new(Game::Eu4, FileKind::Txt)
        );
        assert_eq!(
            "CK2-TXT".parse::<FormatPair>().unwrap(),
            FormatPair::new(Game::Ck2, FileKind::Txt)
        );
        assert_eq!(
            "eu4_yaml".parse::<FormatPair>().unwrap(),
            FormatPair::new(Game::Eu4, FileKind::Yml)
        );
    }

    #[test]
    fn test_parse_unknown_format_pair() {
        assert!(matches!(
            "hoi4:txt".parse::<FormatPair>(),
            Err(Error::UnknownFormat(_))
        ));
        assert!(matches!(
            "eu4".parse::<FormatPair>(),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let pair = FormatPair::new(Game::Ck2, FileKind::Txt);
        assert_eq!(pair.to_string(), "ck2:txt");
        assert_eq!(pair.to_string().parse::<FormatPair>().unwrap(), pair);
    }

    #[test]
    fn test_registry_rejects_unregistered_pairs() {
        let ck2_yml = FormatPair::new(Game::Ck2, FileKind::Yml);
        assert!(matches!(
            encoder_for(ck2_yml),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            printer_for(ck2_yml),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_registry_resolves_default_pipeline_pairs() {
        let encoder = encoder_for(FormatPair::new(Game::Eu4, FileKind::Txt)).unwrap();
        let printer = printer_for(FormatPair::new(Game::Ck2, FileKind::Txt)).unwrap();
        let encoded = encoder.encode(&[u32::from('A'), u32::from(';')]).unwrap();
        assert_eq!(printer.render(&encoded).unwrap(), b"A;");
    }
}
