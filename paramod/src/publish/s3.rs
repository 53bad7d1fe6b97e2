//! S3 upload through the AWS SDK, served through a CDN domain.

use std::{fs, path::Path};

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    Client,
    config::Credentials,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    primitives::ByteStream,
};
use tracing::debug;

use super::ObjectStore;
use crate::error::Error;

const AUTH_ERROR_CODES: [&str; 3] = ["InvalidAccessKeyId", "SignatureDoesNotMatch", "AccessDenied"];

/// An S3 bucket whose objects are served as `<cdn_base_url>/<key>`.
#[derive(Debug, Clone)]
pub struct S3Store {
    pub bucket: String,
    pub region: String,
    /// Access key id and secret access key.
    pub credentials: Option<(String, String)>,
    pub cdn_base_url: String,
}

impl S3Store {
    async fn upload(
        &self,
        access_key: &str,
        secret_key: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), Error> {
        let credentials = Credentials::new(access_key, secret_key, None, None, "paramod");
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;
        let client = Client::new(&sdk_config);

        client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                let message = format!(
                    "put s3://{}/{} failed: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                );
                if e.code().is_some_and(|code| AUTH_ERROR_CODES.contains(&code)) {
                    Error::Auth(message)
                } else {
                    Error::Upload(message)
                }
            })?;
        Ok(())
    }
}

impl ObjectStore for S3Store {
    fn put(&self, key: &str, path: &Path) -> Result<(), Error> {
        let (access_key, secret_key) = self
            .credentials
            .as_ref()
            .ok_or_else(|| Error::Auth("no cloud storage key pair provided".to_string()))?;

        let body = fs::read(path)?;
        debug!(bucket = %self.bucket, key, bytes = body.len(), "uploading to s3");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.upload(access_key, secret_key, key, body))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base_url.trim_end_matches('/'), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(credentials: Option<(String, String)>) -> S3Store {
        S3Store {
            bucket: "triela-file".to_string(),
            region: "ap-northeast-1".to_string(),
            credentials,
            cdn_base_url: "https://d3fxmsw7mhzbqi.cloudfront.net".to_string(),
        }
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            store(None).public_url("2024-03-09_07-05-01-vic2-ap3"),
            "https://d3fxmsw7mhzbqi.cloudfront.net/2024-03-09_07-05-01-vic2-ap3"
        );
    }

    #[test]
    fn test_missing_credentials_fail_before_upload() {
        let err = store(None)
            .put("key", Path::new("does-not-exist.zip"))
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }
}
