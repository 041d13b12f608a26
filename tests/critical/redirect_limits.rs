//! Redirect hop bound, loops, and redirects that cannot be followed.

use receive_file::{DownloadError, DownloadSettings, ErrorKind, MAX_REDIRECTS, receive_file};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::raw_server::{AfterBody, serve_once};
use crate::support::socket_guard::start_mock_server_or_skip;

/// Mounts `/r0 -> /r1 -> ... -> /r{hops}` redirects and a 200 at `/r{hops}`.
async fn mount_chain(mock_server: &MockServer, hops: u8) {
    for i in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/r{i}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("/r{}", i + 1)),
            )
            .mount(mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path(format!("/r{hops}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"end of chain"))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn p0_chain_of_exactly_max_hops_succeeds() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_chain(&mock_server, MAX_REDIRECTS).await;

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("{}/r0", mock_server.uri());
    let settings = DownloadSettings::new()
        .with_directory(temp_dir.path())
        .with_filename("chain.txt");

    let file_path = receive_file(&url, &settings).await.expect("3 hops allowed");
    assert_eq!(std::fs::read(file_path).expect("read"), b"end of chain");
}

#[tokio::test]
async fn p0_chain_longer_than_max_hops_fails_without_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_chain(&mock_server, MAX_REDIRECTS + 1).await;

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("{}/r0", mock_server.uri());
    let settings = DownloadSettings::new()
        .with_directory(temp_dir.path())
        .with_filename("chain.txt");

    let error = receive_file(&url, &settings).await.expect_err("4 hops refused");

    assert!(matches!(error, DownloadError::Redirect { status: 302, .. }));
    assert_eq!(error.kind(), ErrorKind::RedirectError);
    assert_eq!(error.to_string(), "302 - Found");
    assert!(!temp_dir.path().join("chain.txt").exists());
}

#[tokio::test]
async fn p0_self_redirect_loop_is_bounded_by_hop_count() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    // Initial request plus three followed hops.
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(307).insert_header("Location", "/loop"))
        .expect(u64::from(MAX_REDIRECTS) + 1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("{}/loop", mock_server.uri());
    let settings = DownloadSettings::new().with_directory(temp_dir.path());

    let error = receive_file(&url, &settings).await.expect_err("loop refused");

    assert_eq!(error.to_string(), "307 - Temporary Redirect");
    assert!(!temp_dir.path().join("loop").exists());
}

#[tokio::test]
async fn p0_redirect_without_location_is_redirect_error() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/nowhere"))
        .respond_with(ResponseTemplate::new(302))
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("{}/nowhere", mock_server.uri());
    let settings = DownloadSettings::new().with_directory(temp_dir.path());

    let error = receive_file(&url, &settings).await.expect_err("no Location");

    assert_eq!(error.kind(), ErrorKind::RedirectError);
    assert_eq!(error.to_string(), "302 - Found");
}

#[tokio::test]
async fn p1_not_modified_without_location_is_redirect_error() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("{}/cached", mock_server.uri());
    let settings = DownloadSettings::new().with_directory(temp_dir.path());

    let error = receive_file(&url, &settings).await.expect_err("304");
    assert_eq!(error.to_string(), "304 - Not Modified");
    assert_eq!(error.kind(), ErrorKind::RedirectError);
}

#[tokio::test]
async fn p1_unfollowable_redirect_keeps_server_reason_phrase() {
    let Some(addr) = serve_once(
        "HTTP/1.1 302 Moved Elsewhere\r\nContent-Length: 0",
        Vec::new(),
        AfterBody::Close,
    )
    .await
    else {
        return;
    };

    let temp_dir = TempDir::new().expect("temp dir");
    let url = format!("http://{addr}/moved");
    let settings = DownloadSettings::new().with_directory(temp_dir.path());

    let error = receive_file(&url, &settings).await.expect_err("no Location");

    assert_eq!(error.kind(), ErrorKind::RedirectError);
    assert_eq!(error.to_string(), "302 - Moved Elsewhere");
}
