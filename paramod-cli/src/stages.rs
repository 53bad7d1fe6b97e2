//! Subcommands running one or all pipeline stages.

use std::path::Path;

use paramod::{
    DirectoryStore, DistributionManifest, Error, ObjectStore, Pipeline, PipelineConfig,
    Secrets, Stage, archive::extract_folders, fetch::download_artifact, package::pack_mod,
};
use paramod_cli::report::{announce_download_url, print_status};
use tracing::info;

/// Runs every stage, publishing to `dry_run` when given or to the configured bucket.
pub fn run_build(config: PipelineConfig, dry_run: Option<&Path>) -> Result<(), Error> {
    let secrets = Secrets::from_env(&config);
    let store: Box<dyn ObjectStore> = match dry_run {
        Some(dir) => Box::new(directory_store(dir)?),
        None => remote_store(&config, &secrets)?,
    };

    let outcome = Pipeline::new(config, secrets)
        .run(store.as_ref(), |stage, value| print_status(stage, value))?;
    announce_download_url(&outcome.manifest.url)?;
    println!(
        "✅ Published {} ({} bytes, md5 {})",
        outcome.manifest.url, outcome.manifest.file_size, outcome.manifest.file_md5
    );
    Ok(())
}

/// A local store serving its files as `file://` URLs.
fn directory_store(dir: &Path) -> Result<DirectoryStore, Error> {
    let root = std::path::absolute(dir)?;
    let base_url = format!("file://{}", root.display());
    info!(root = %root.display(), "dry run, publishing to a local directory");
    Ok(DirectoryStore::new(root, base_url))
}

#[cfg(feature = "s3")]
fn remote_store(
    config: &PipelineConfig,
    secrets: &Secrets,
) -> Result<Box<dyn ObjectStore>, Error> {
    Ok(Box::new(config.s3_store(secrets)))
}

#[cfg(not(feature = "s3"))]
fn remote_store(_: &PipelineConfig, _: &Secrets) -> Result<Box<dyn ObjectStore>, Error> {
    Err(Error::Upload(
        "built without S3 support, use --dry-run <dir>".to_string(),
    ))
}

pub fn run_fetch(config: &PipelineConfig, output: Option<&Path>) -> Result<(), Error> {
    let secrets = Secrets::from_env(config);
    let out_file = output.map_or_else(|| config.download_path(), Path::to_path_buf);
    let path = download_artifact(&config.fetch_request(&secrets), &out_file)?;
    print_status(Stage::Fetch, &path.display().to_string());
    Ok(())
}

pub fn run_extract(
    config: &PipelineConfig,
    input: &Path,
    output: &Path,
    folders: &[String],
) -> Result<(), Error> {
    let folders = if folders.is_empty() {
        config.source.folders.as_slice()
    } else {
        folders
    };
    let extracted = extract_folders(input, folders, output)?;
    for path in &extracted {
        println!("{}", path.display());
    }
    println!("✅ Extracted {} folder(s)", extracted.len());
    Ok(())
}

pub fn run_pack(
    config: &PipelineConfig,
    content: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Error> {
    let content = content.map_or_else(|| config.content_archive_path(), Path::to_path_buf);
    let output = output.unwrap_or(config.package.output.as_path());
    let package = pack_mod(&config.descriptor(), &content, output)?;
    print_status(Stage::Pack, &package.display().to_string());
    Ok(())
}

pub fn run_manifest(
    config: &PipelineConfig,
    package: &Path,
    url: &str,
    output: Option<&Path>,
) -> Result<(), Error> {
    let manifest = DistributionManifest::for_file(package, url)?;
    let path = manifest.write_to(output.unwrap_or(config.publish.manifest.as_path()))?;
    println!(
        "✅ Wrote {} (md5 {}, {} bytes)",
        path.display(),
        manifest.file_md5,
        manifest.file_size
    );
    Ok(())
}
