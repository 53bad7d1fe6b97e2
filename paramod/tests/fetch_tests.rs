use paramod::Error;
use paramod::fetch::{FetchRequest, download_artifact};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The blocking client must not run on the async runtime's worker threads.
async fn download(request: FetchRequest, out: PathBuf) -> Result<PathBuf, Error> {
    tokio::task::spawn_blocking(move || download_artifact(&request, &out))
        .await
        .expect("download task panicked")
}

#[tokio::test]
async fn test_download_writes_body_verbatim() {
    let server = MockServer::start().await;
    let body: Vec<u8> = vec![0x50, 0x4B, 0x03, 0x04, 0x00, 0xFF];
    Mock::given(method("GET"))
        .and(path("/api/projects/2543/artifacts/download"))
        .and(header("Authorization", "token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("tmp/paratranz.zip");
    let request =
        FetchRequest::new(2543, Some("token-123".to_string())).with_base_url(server.uri());

    let written = download(request, out.clone()).await.unwrap();
    assert_eq!(written, out);
    assert_eq!(std::fs::read(&out).unwrap(), body);
}

#[tokio::test]
async fn test_rejected_token_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("paratranz.zip");
    let request = FetchRequest::new(1, Some("wrong".to_string())).with_base_url(server.uri());

    let err = download(request, out.clone()).await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_server_error_is_reported_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let request = FetchRequest::new(1, Some("token".to_string())).with_base_url(server.uri());

    let err = download(request, temp_dir.path().join("paratranz.zip"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Status { status: 503, .. }));
}
