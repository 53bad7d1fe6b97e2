//! The build pipeline as explicit, strictly sequential stages.
//!
//! Stages only share file paths. Each one blocks until it is done, and any error
//! aborts the run before later stages start, so the manifest is only written once
//! the package has been uploaded.

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
};

use chrono::Local;
use tracing::info;

use crate::{
    config::{PipelineConfig, Secrets},
    converter::Converter,
    error::Error,
    fetch::download_artifact,
    package::{ImageAsset, assemble_content_archive, pack_mod},
    publish::{DistributionManifest, ObjectStore, object_name, publish},
};

/// A pipeline stage, labelled the way status lines name its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Assemble,
    Pack,
    Publish,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fetch => write!(f, "p_file_path"),
            Stage::Assemble => write!(f, "app_mod_zip_file_path"),
            Stage::Pack => write!(f, "mod_pack_file_path"),
            Stage::Publish => write!(f, "cdn_url"),
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub translations: PathBuf,
    pub content_archive: PathBuf,
    pub package: PathBuf,
    pub manifest: DistributionManifest,
    pub manifest_path: PathBuf,
}

pub struct Pipeline {
    config: PipelineConfig,
    secrets: Secrets,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, secrets: Secrets) -> Self {
        Self { config, secrets }
    }

    /// Downloads the translation artifact, or reuses the cached copy when allowed.
    pub fn fetch(&self) -> Result<PathBuf, Error> {
        let path = self.config.download_path();
        if self.config.source.reuse_download && path.is_file() {
            info!(path = %path.display(), "reusing downloaded artifact");
            return Ok(path);
        }
        download_artifact(&self.config.fetch_request(&self.secrets), &path)
    }

    /// Converts the artifact's folders into the content archive.
    pub fn assemble(&self, translations: &Path) -> Result<PathBuf, Error> {
        let converter = Converter::new(
            self.config.redaction_policy()?,
            self.config.encoder_pair()?,
            self.config.printer_pair()?,
        )?;
        let package = &self.config.package;
        let image = package.image.as_deref().map(|source| ImageAsset {
            source,
            name: &package.picture,
        });
        assemble_content_archive(
            translations,
            &self.config.source.folders,
            &converter,
            image,
            &self.config.content_archive_path(),
        )
    }

    /// Packs the descriptor and content archive into the distributable package.
    pub fn pack(&self, content_archive: &Path) -> Result<PathBuf, Error> {
        pack_mod(
            &self.config.descriptor(),
            content_archive,
            &self.config.package.output,
        )
    }

    /// Uploads the package under a timestamped name and writes the manifest.
    pub fn publish(
        &self,
        store: &dyn ObjectStore,
        package: &Path,
    ) -> Result<(DistributionManifest, PathBuf), Error> {
        let name = object_name(&Local::now(), &self.config.publish.object_suffix);
        let manifest = publish(store, package, &name)?;
        let manifest_path = manifest.write_to(&self.config.publish.manifest)?;
        Ok((manifest, manifest_path))
    }

    /// Runs every stage in order, reporting each stage's output as it completes.
    pub fn run<F>(&self, store: &dyn ObjectStore, mut report: F) -> Result<PipelineOutcome, Error>
    where
        F: FnMut(Stage, &str),
    {
        let translations = self.fetch()?;
        report(Stage::Fetch, &translations.display().to_string());

        let content_archive = self.assemble(&translations)?;
        report(Stage::Assemble, &content_archive.display().to_string());

        let package = self.pack(&content_archive)?;
        report(Stage::Pack, &package.display().to_string());

        let (manifest, manifest_path) = self.publish(store, &package)?;
        report(Stage::Publish, &manifest.url);

        Ok(PipelineOutcome {
            translations,
            content_archive,
            package,
            manifest,
            manifest_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_labels() {
        assert_eq!(Stage::Fetch.to_string(), "p_file_path");
        assert_eq!(Stage::Publish.to_string(), "cdn_url");
    }

    #[test]
    fn test_fetch_reuses_cached_artifact() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig {
            work_dir: temp_dir.path().to_path_buf(),
            ..PipelineConfig::default()
        };
        std::fs::write(config.download_path(), b"cached").unwrap();

        let pipeline = Pipeline::new(config.clone(), Secrets::default());
        assert_eq!(pipeline.fetch().unwrap(), config.download_path());
    }

    #[test]
    fn test_fetch_without_cache_or_token_fails() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = PipelineConfig {
            work_dir: temp_dir.path().to_path_buf(),
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(config, Secrets::default());
        assert!(matches!(pipeline.fetch(), Err(Error::Auth(_))));
    }
}
