//! Zip handling: selective extraction of export folders and directory archiving.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::FileOptions};

use crate::error::Error;

/// Top-level directory of a Paratranz artifact holding the raw JSON exports.
pub const RAW_DIR: &str = "raw";

/// Copies the subtree of each `raw/<folder>/` in `archive` into `out_dir/<folder>/`.
///
/// Entries outside the named folders are ignored. A folder without any entry
/// fails with [`Error::MissingFolder`]. Returns the extracted folder paths.
pub fn extract_folders<S: AsRef<str>>(
    archive: &Path,
    folders: &[S],
    out_dir: &Path,
) -> Result<Vec<PathBuf>, Error> {
    let mut zip = ZipArchive::new(File::open(archive)?)?;
    let mut extracted = Vec::with_capacity(folders.len());

    for folder in folders {
        let folder = folder.as_ref().trim_matches('/');
        let prefix = Path::new(RAW_DIR).join(folder);
        let target = out_dir.join(folder);
        let mut matched = 0usize;

        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            let Some(name) = entry.enclosed_name() else {
                warn!(entry = entry.name(), "skipping entry with unsafe path");
                continue;
            };
            let Ok(relative) = name.strip_prefix(&prefix) else {
                continue;
            };
            matched += 1;

            let dest = target.join(relative);
            if entry.is_dir() {
                fs::create_dir_all(&dest)?;
                continue;
            }
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&dest)?;
            io::copy(&mut entry, &mut outfile)?;
            debug!(entry = %name.display(), dest = %dest.display(), "extracted");
        }

        if matched == 0 {
            return Err(Error::MissingFolder {
                folder: folder.to_string(),
                archive: archive.to_path_buf(),
            });
        }
        fs::create_dir_all(&target)?;
        info!(folder, entries = matched, "extracted folder");
        extracted.push(target);
    }

    Ok(extracted)
}

/// Writes a deflate-compressed archive of everything below `src_dir` to `out_file`.
///
/// Entry names are relative to `src_dir`, use `/` separators, and are written in
/// sorted order.
pub fn zip_dir(src_dir: &Path, out_file: &Path) -> Result<PathBuf, Error> {
    if let Some(parent) = out_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(out_file)?);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Io(io::Error::other(e)))?;
        let relative = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|e| Error::Io(io::Error::other(e)))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
        } else {
            zip.start_file(name, options)?;
            let mut reader = File::open(entry.path())?;
            io::copy(&mut reader, &mut zip)?;
        }
    }

    zip.finish()?;
    debug!(src = %src_dir.display(), archive = %out_file.display(), "archived directory");
    Ok(out_file.to_path_buf())
}
