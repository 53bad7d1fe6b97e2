#![forbid(unsafe_code)]
//! Build pipeline for Paradox game translation mods.
//!
//! Fetches a Paratranz translation artifact, converts its JSON exports into
//! escaped semicolon localisation tables, packs them with a `.mod` descriptor, and
//! publishes the package next to a distribution manifest.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paramod::{Converter, RedactionPolicy, formats::FormatPair};
//! use std::path::Path;
//!
//! let converter = Converter::new(
//!     RedactionPolicy::default(),
//!     "eu4:txt".parse::<FormatPair>()?,
//!     "ck2:txt".parse::<FormatPair>()?,
//! )?;
//! converter.convert_dir(Path::new("json/localisation"), Path::new("out/localisation"))?;
//! # Ok::<(), paramod::Error>(())
//! ```
//!
//! # Stages
//!
//! - **fetch**: authenticated artifact download
//! - **archive**: extraction of `raw/<folder>/` subtrees, directory zipping
//! - **converter**: JSON records to encoded tables, with key-based redaction
//! - **package**: `.mod` descriptor and package assembly
//! - **publish**: object store upload and distribution manifest
//! - **pipeline**: the stages above, run in order from a [`PipelineConfig`]

pub mod archive;
pub mod config;
pub mod converter;
pub mod error;
pub mod fetch;
pub mod formats;
pub mod package;
pub mod pipeline;
pub mod publish;
pub mod redaction;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    config::{PipelineConfig, Secrets},
    converter::{Converter, compose_table},
    error::Error,
    formats::{FormatPair, OutputRow, Table},
    package::ModDescriptor,
    pipeline::{Pipeline, PipelineOutcome, Stage},
    publish::{DirectoryStore, DistributionManifest, ObjectStore},
    redaction::RedactionPolicy,
    types::TranslationRecord,
};

#[cfg(feature = "s3")]
pub use crate::publish::S3Store;
