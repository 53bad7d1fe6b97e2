//! Assembly of the distributable mod package.
//!
//! A package is a zip holding a `<name>.mod` descriptor next to `<name>.zip`,
//! the archive with the converted localisation the game loads.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::{
    archive::{RAW_DIR, extract_folders, zip_dir},
    converter::Converter,
    error::Error,
};

/// Metadata written to the `.mod` descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModDescriptor {
    /// Display name in the launcher.
    pub title: String,
    /// Base name of the mod archive and descriptor, without extension.
    pub file_name: String,
    /// User directory name. Defaults to `file_name`.
    pub user_dir: Option<String>,
    pub tags: BTreeSet<String>,
    /// Titles of mods that must be loaded first.
    pub dependencies: BTreeSet<String>,
    /// Picture path relative to the mod archive.
    pub picture: String,
}

fn quoted_set(values: &BTreeSet<String>) -> String {
    let items: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    format!("{{{}}}", items.join(" "))
}

impl ModDescriptor {
    pub fn new(title: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            file_name: file_name.into(),
            user_dir: None,
            tags: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            picture: String::new(),
        }
    }

    pub fn with_user_dir(mut self, user_dir: impl Into<String>) -> Self {
        self.user_dir = Some(user_dir.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = picture.into();
        self
    }

    pub fn user_dir(&self) -> &str {
        self.user_dir.as_deref().unwrap_or(&self.file_name)
    }

    /// Name of the content archive inside the package.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.file_name)
    }

    /// Name of the descriptor file inside the package.
    pub fn descriptor_file_name(&self) -> String {
        format!("{}.mod", self.file_name)
    }

    /// The descriptor text: one assignment per line, no trailing newline.
    pub fn render(&self) -> String {
        [
            format!("name=\"{}\"", self.title),
            format!("archive=\"mod/{}\"", self.archive_file_name()),
            format!("user_dir=\"{}\"", self.user_dir()),
            format!("tags={}", quoted_set(&self.tags)),
            format!("picture=\"{}\"", self.picture),
            format!("dependencies={}", quoted_set(&self.dependencies)),
        ]
        .join("\n")
    }

    /// Writes `<file_name>.mod` into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, Error> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.descriptor_file_name());
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// An image shipped at the root of the content archive.
#[derive(Debug, Clone)]
pub struct ImageAsset<'a> {
    pub source: &'a Path,
    /// Name inside the archive, matching the descriptor's `picture`.
    pub name: &'a str,
}

/// Rewrites a schema error's path from the scratch directory to its `raw/` entry.
fn in_archive_terms(error: Error, json_dir: &Path) -> Error {
    match error {
        Error::Schema { path, source } => {
            let path = path
                .strip_prefix(json_dir)
                .map(|relative| Path::new(RAW_DIR).join(relative))
                .unwrap_or(path);
            Error::schema_error(path, source)
        }
        other => other,
    }
}

/// Builds the content archive the game loads.
///
/// Extracts each export folder from `translations_zip`, converts it into a folder
/// of the same name, adds the image when present, and zips the result to
/// `out_file`. Intermediate files live in a temporary directory removed on return.
pub fn assemble_content_archive<S: AsRef<str>>(
    translations_zip: &Path,
    folders: &[S],
    converter: &Converter,
    image: Option<ImageAsset<'_>>,
    out_file: &Path,
) -> Result<PathBuf, Error> {
    let temp_dir = TempDir::new()?;
    let json_dir = temp_dir.path().join("json");
    let out_dir = temp_dir.path().join("out");
    fs::create_dir_all(&out_dir)?;

    for folder in extract_folders(translations_zip, folders, &json_dir)? {
        let Some(name) = folder.file_name() else {
            continue;
        };
        let converted = converter
            .convert_dir(&folder, &out_dir.join(name))
            .map_err(|e| in_archive_terms(e, &json_dir))?;
        debug!(folder = %folder.display(), files = converted.len(), "converted folder");
    }

    if let Some(image) = image {
        if image.source.is_file() {
            fs::copy(image.source, out_dir.join(image.name))?;
        } else {
            warn!(image = %image.source.display(), "image asset not found, skipping");
        }
    }

    let archive = zip_dir(&out_dir, out_file)?;
    info!(archive = %archive.display(), "assembled content archive");
    Ok(archive)
}

/// Packs the descriptor and the content archive into the distributable `out_file`.
pub fn pack_mod(
    descriptor: &ModDescriptor,
    content_archive: &Path,
    out_file: &Path,
) -> Result<PathBuf, Error> {
    let temp_dir = TempDir::new()?;
    descriptor.write_to(temp_dir.path())?;
    fs::copy(
        content_archive,
        temp_dir.path().join(descriptor.archive_file_name()),
    )?;

    let package = zip_dir(temp_dir.path(), out_file)?;
    info!(package = %package.display(), "packed mod");
    Ok(package)
}
