//! Download tests
//!
//! Extension resolution, file naming and downloader invocation.

mod common;

use std::path::PathBuf;

use common::{audio, record, ScriptedRunner};
use invidplay::stream::process::is_on_path;
use invidplay::stream::{DownloadError, Downloader, ProcessError, SystemRunner};
use invidplay::VideoFormat;
use mockito::Server;

fn out_dir() -> PathBuf {
    std::env::temp_dir().join("invidplay-download-test")
}

#[tokio::test]
async fn test_audio_webm_gets_webm_extension() {
    let video = record("abc", vec![audio("http://a")]);
    let runner = ScriptedRunner::new();
    let downloader = Downloader::new("curl", out_dir());

    let path = downloader.download(&video, 0, &runner).await.unwrap();

    assert_eq!(path, out_dir().join("Title abc.webm"));
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "curl");
    assert_eq!(
        calls[0].args,
        vec![
            "http://a".to_string(),
            "-L".to_string(),
            "--fail".to_string(),
            "--create-dirs".to_string(),
            "-o".to_string(),
            path.to_string_lossy().to_string(),
        ]
    );
}

#[tokio::test]
async fn test_mp4_formats_get_mp4_extension() {
    let video = record(
        "abc",
        vec![
            VideoFormat::new("http://v", "video/mp4; codecs=\"avc1\"", "1080p"),
            VideoFormat::new("http://a", "audio/mp4; codecs=\"mp4a.40.2\"", "medium"),
        ],
    );
    let runner = ScriptedRunner::new();
    let downloader = Downloader::new("curl", out_dir());

    let video_path = downloader.download(&video, 0, &runner).await.unwrap();
    let audio_path = downloader.download(&video, 1, &runner).await.unwrap();

    assert_eq!(video_path.extension().unwrap(), "mp4");
    assert_eq!(audio_path.extension().unwrap(), "mp4");
}

#[tokio::test]
async fn test_unmapped_mime_fails_without_spawning() {
    let video = record(
        "abc",
        vec![VideoFormat::new("http://x", "application/x-not-a-media-type", "")],
    );
    let runner = ScriptedRunner::new();
    let downloader = Downloader::new("curl", out_dir());

    let err = downloader.download(&video, 0, &runner).await.unwrap_err();

    assert!(matches!(err, DownloadError::UnknownMimeType(ref m) if m == "application/x-not-a-media-type"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_format_index_out_of_range() {
    let video = record("abc", vec![audio("http://a")]);
    let runner = ScriptedRunner::new();
    let downloader = Downloader::new("curl", out_dir());

    let err = downloader.download(&video, 3, &runner).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::NoSuchFormat {
            index: 3,
            available: 1
        }
    ));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_downloader_failure_is_a_process_error() {
    let video = record("abc", vec![audio("http://a")]);
    let runner = ScriptedRunner::new().failing("http://a");
    let downloader = Downloader::new("curl", out_dir());

    let err = downloader.download(&video, 0, &runner).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Process(ProcessError::Failed { .. })
    ));
    // Same format is never retried
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_title_with_slash_stays_in_output_dir() {
    let mut video = record("abc", vec![audio("http://a")]);
    video.title = "AC/DC - Back In Black".to_string();
    let runner = ScriptedRunner::new();
    let downloader = Downloader::new("curl", out_dir());

    let path = downloader.download(&video, 0, &runner).await.unwrap();

    assert_eq!(path.parent().unwrap(), out_dir());
    assert_eq!(path.file_name().unwrap(), "AC_DC - Back In Black.webm");
}

// =============================================================================
// Real Downloader Tests
// =============================================================================

#[tokio::test]
async fn test_http_error_fails_and_writes_nothing() {
    if !is_on_path("curl") {
        eprintln!("curl not installed, skipping");
        return;
    }

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/stream")
        .with_status(403)
        .with_body("Forbidden")
        .create_async()
        .await;

    let dir = out_dir().join("http-error");
    let mut video = record("abc", vec![audio(&format!("{}/stream", server.url()))]);
    video.title = "Forbidden Song".to_string();
    let downloader = Downloader::new("curl", &dir);

    let err = downloader
        .download(&video, 0, &SystemRunner)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Process(ProcessError::Failed { .. })
    ));
    assert!(!dir.join("Forbidden Song.webm").exists());
}

#[tokio::test]
async fn test_successful_download_creates_missing_dir() {
    if !is_on_path("curl") {
        eprintln!("curl not installed, skipping");
        return;
    }

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/stream")
        .with_status(200)
        .with_body("audio bytes")
        .create_async()
        .await;

    let dir = out_dir().join(format!("fresh-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let video = record("abc", vec![audio(&format!("{}/stream", server.url()))]);
    let downloader = Downloader::new("curl", &dir);

    let path = downloader.download(&video, 0, &SystemRunner).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "audio bytes");
    let _ = std::fs::remove_dir_all(&dir);
}
