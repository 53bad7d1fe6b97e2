//! Publication of finished packages and their distribution manifest.

#[cfg(feature = "s3")]
mod s3;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Error;

#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Checksum, size and location of a published package, for client-side verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionManifest {
    /// Lowercase hex MD5 digest of the package bytes.
    pub file_md5: String,
    pub url: String,
    /// Package size in bytes.
    pub file_size: u64,
}

impl DistributionManifest {
    /// Describes the file at `path` as it is on disk now.
    pub fn for_file(path: &Path, url: impl Into<String>) -> Result<Self, Error> {
        let bytes = fs::read(path)?;
        Ok(Self {
            file_md5: format!("{:x}", md5::compute(&bytes)),
            url: url.into(),
            file_size: bytes.len() as u64,
        })
    }

    /// Writes the manifest as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<PathBuf, Error> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(path.to_path_buf())
    }
}

/// Object name for an upload: `%Y-%m-%d_%H-%M-%S-<suffix>`.
///
/// Names are never checked for collisions; each run gets its own object.
pub fn object_name<Tz: TimeZone>(timestamp: &DateTime<Tz>, suffix: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}-{}", timestamp.format("%Y-%m-%d_%H-%M-%S"), suffix)
}

/// Remote storage for published packages.
pub trait ObjectStore {
    /// Uploads the file at `path` under `key`.
    fn put(&self, key: &str, path: &Path) -> Result<(), Error>;

    /// Publicly resolvable URL of the object stored under `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Stores objects as files in a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    base_url: String,
}

impl DirectoryStore {
    /// Objects are copied below `root` and addressed as `<base_url>/<key>`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ObjectStore for DirectoryStore {
    fn put(&self, key: &str, path: &Path) -> Result<(), Error> {
        fs::create_dir_all(&self.root)?;
        fs::copy(path, self.root.join(key))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Uploads `package` under `object_name` and describes the uploaded bytes.
pub fn publish(
    store: &dyn ObjectStore,
    package: &Path,
    object_name: &str,
) -> Result<DistributionManifest, Error> {
    store.put(object_name, package)?;
    let url = store.public_url(object_name);
    let manifest = DistributionManifest::for_file(package, url)?;
    info!(url = %manifest.url, size = manifest.file_size, md5 = %manifest.file_md5, "published package");
    Ok(manifest)
}
