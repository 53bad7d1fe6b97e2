//! Pipeline configuration.
//!
//! Loaded from TOML; every section and field is optional and falls back to the
//! values of the JPMOD English map names sub-mod. Secrets are never part of the
//! file, only the names of the environment variables holding them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    fetch::{DEFAULT_BASE_URL, FetchRequest},
    formats::{FileKind, FormatPair, Game},
    package::ModDescriptor,
    redaction::{DEFAULT_EXCLUDE_PATTERN, RedactionPolicy},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory for the download cache and intermediate archives.
    pub work_dir: PathBuf,
    pub source: SourceConfig,
    pub convert: ConvertConfig,
    pub package: PackageConfig,
    pub publish: PublishConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    pub project_id: u64,
    /// Environment variable holding the API token.
    pub secret_env: String,
    /// Folders below `raw/` in the artifact to convert.
    pub folders: Vec<String>,
    /// Skip the download when the cached artifact already exists.
    pub reuse_download: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub encoder: String,
    pub printer: String,
    pub exclude_pattern: String,
    pub exclude_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub title: String,
    pub file_name: String,
    pub user_dir: Option<String>,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    pub picture: String,
    /// Image file copied into the content archive as `picture`.
    pub image: Option<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_env: String,
    pub secret_key_env: String,
    pub cdn_base_url: String,
    pub object_suffix: String,
    pub manifest: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("tmp"),
            source: SourceConfig::default(),
            convert: ConvertConfig::default(),
            package: PackageConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: 2543,
            secret_env: "PARATRANZ_SECRET".to_string(),
            folders: vec!["localisation".to_string()],
            reuse_download: true,
        }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            encoder: FormatPair::new(Game::Eu4, FileKind::Txt).to_string(),
            printer: FormatPair::new(Game::Ck2, FileKind::Txt).to_string(),
            exclude_pattern: DEFAULT_EXCLUDE_PATTERN.to_string(),
            exclude_keys: Vec::new(),
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            title: "JPMOD Sub 2: English Map Names".to_string(),
            file_name: "jpmod_ap3_mod".to_string(),
            user_dir: Some("JLM".to_string()),
            tags: vec!["Translation".to_string(), "Localisation".to_string()],
            dependencies: vec!["JPMOD Main 2: Text".to_string()],
            picture: "title.jpg".to_string(),
            image: Some(PathBuf::from("resource/title.jpg")),
            output: PathBuf::from("out/vic2_ap3_mod.zip"),
        }
    }
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            bucket: "triela-file".to_string(),
            region: "ap-northeast-1".to_string(),
            access_key_env: "AWS_S3_ACCESS_KEY".to_string(),
            secret_key_env: "AWS_S3_SECRET_ACCESS_KEY".to_string(),
            cdn_base_url: "https://d3fxmsw7mhzbqi.cloudfront.net".to_string(),
            object_suffix: "vic2-ap3".to_string(),
            manifest: PathBuf::from("out/dist.v2.json"),
        }
    }
}

impl PipelineConfig {
    /// Parses a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Cached location of the downloaded artifact.
    pub fn download_path(&self) -> PathBuf {
        self.work_dir.join("paratranz.zip")
    }

    /// Location of the intermediate content archive.
    pub fn content_archive_path(&self) -> PathBuf {
        self.work_dir.join("mod.zip")
    }

    pub fn encoder_pair(&self) -> Result<FormatPair, Error> {
        self.convert.encoder.parse()
    }

    pub fn printer_pair(&self) -> Result<FormatPair, Error> {
        self.convert.printer.parse()
    }

    pub fn redaction_policy(&self) -> Result<RedactionPolicy, Error> {
        RedactionPolicy::new(
            &self.convert.exclude_pattern,
            self.convert.exclude_keys.iter().cloned(),
        )
    }

    pub fn descriptor(&self) -> ModDescriptor {
        let package = &self.package;
        let mut descriptor = ModDescriptor::new(&package.title, &package.file_name)
            .with_tags(package.tags.iter().cloned())
            .with_dependencies(package.dependencies.iter().cloned())
            .with_picture(&package.picture);
        if let Some(user_dir) = &package.user_dir {
            descriptor = descriptor.with_user_dir(user_dir);
        }
        descriptor
    }

    pub fn fetch_request(&self, secrets: &Secrets) -> FetchRequest {
        FetchRequest::new(self.source.project_id, secrets.paratranz_token.clone())
            .with_base_url(&self.source.base_url)
    }

    /// The configured bucket, authenticated with the storage key pair from `secrets`.
    #[cfg(feature = "s3")]
    pub fn s3_store(&self, secrets: &Secrets) -> crate::publish::S3Store {
        crate::publish::S3Store {
            bucket: self.publish.bucket.clone(),
            region: self.publish.region.clone(),
            credentials: secrets.storage_key_pair(),
            cdn_base_url: self.publish.cdn_base_url.clone(),
        }
    }
}

/// Credentials read from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub paratranz_token: Option<String>,
    pub storage_access_key: Option<String>,
    pub storage_secret_key: Option<String>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Secrets")
            .field("paratranz_token", &mask(&self.paratranz_token))
            .field("storage_access_key", &mask(&self.storage_access_key))
            .field("storage_secret_key", &mask(&self.storage_secret_key))
            .finish()
    }
}

impl Secrets {
    /// Reads the variables named in `config`. Unset or empty variables are `None`.
    pub fn from_env(config: &PipelineConfig) -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            paratranz_token: var(&config.source.secret_env),
            storage_access_key: var(&config.publish.access_key_env),
            storage_secret_key: var(&config.publish.secret_key_env),
        }
    }

    /// The storage key pair, when both halves are present.
    pub fn storage_key_pair(&self) -> Option<(String, String)> {
        Some((
            self.storage_access_key.clone()?,
            self.storage_secret_key.clone()?,
        ))
    }
}
