//! Download of translation artifacts from a Paratranz project.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{StatusCode, blocking::Client, header::AUTHORIZATION};
use tracing::{debug, info};

use crate::error::Error;

pub const DEFAULT_BASE_URL: &str = "https://paratranz.cn";

/// An authenticated artifact download.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub base_url: String,
    pub project_id: u64,
    /// API token sent verbatim as the `Authorization` header.
    pub secret: Option<String>,
}

impl FetchRequest {
    pub fn new(project_id: u64, secret: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id,
            secret,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/api/projects/{id}/artifacts/download`
    pub fn url(&self) -> String {
        format!(
            "{}/api/projects/{}/artifacts/download",
            self.base_url.trim_end_matches('/'),
            self.project_id
        )
    }
}

/// Downloads the project's artifact archive and writes the body verbatim to `out_file`.
///
/// There is no timeout and no retry; the file is only created once the whole
/// body has been received.
pub fn download_artifact(request: &FetchRequest, out_file: &Path) -> Result<PathBuf, Error> {
    let secret = request
        .secret
        .as_deref()
        .ok_or_else(|| Error::Auth("no translation service token provided".to_string()))?;

    let url = request.url();
    debug!(%url, "downloading translation artifact");

    let client = Client::builder().timeout(None::<Duration>).build()?;
    let response = client.get(&url).header(AUTHORIZATION, secret).send()?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(Error::Auth(format!("{} rejected the token ({})", url, status)));
    }
    if !status.is_success() {
        return Err(Error::Status {
            url,
            status: status.as_u16(),
        });
    }

    let body = response.bytes()?;
    if let Some(parent) = out_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(out_file, &body)?;

    info!(path = %out_file.display(), bytes = body.len(), "downloaded translation artifact");
    Ok(out_file.to_path_buf())
}
