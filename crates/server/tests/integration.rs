use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use mkvconv_server::routes::build_router;
use mkvconv_server::state::AppState;
use mkvconv_transcoder::ConverterConfig;
use serde_json::Value;
use tempfile::TempDir;

/// Test server whose scratch files land in `scratch` and which runs `ffmpeg`.
fn test_app(ffmpeg: PathBuf, scratch: &Path) -> TestServer {
    let state = AppState::new(ConverterConfig {
        ffmpeg_path: ffmpeg,
        temp_dir: scratch.to_path_buf(),
    });
    TestServer::new(build_router(state)).unwrap()
}

fn mkv_form(name: &str, bytes: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes.to_vec())
            .file_name(name)
            .mime_type("video/x-matroska"),
    )
}

fn scratch_entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[cfg(unix)]
fn fake_ffmpeg(dir: &Path, body: &str) -> PathBuf {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    {
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "#!/bin/sh").unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Writes "converted:" followed by the input to the output path, and checks
/// that it was called with the fixed argument template.
#[cfg(unix)]
const COPYING_FFMPEG: &str = r#"
[ "$1" = "-i" ] || exit 9
[ "$3 $4 $5 $6 $7 $8" = "-c:v copy -c:a aac -strict experimental" ] || exit 9
case "$2" in *.mkv) ;; *) exit 9 ;; esac
case "$9" in *.mp4) ;; *) exit 9 ;; esac
printf 'converted:' > "$9"
cat "$2" >> "$9"
echo "frame=1 done" >&2
"#;

#[cfg(unix)]
const FAILING_FFMPEG: &str = r#"
echo "$2: Invalid data found when processing input" >&2
exit 1
"#;

fn dirs() -> (TempDir, TempDir) {
    (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap())
}

#[tokio::test]
async fn index_page_served() {
    let (bin, scratch) = dirs();
    let server = test_app(bin.path().join("ffmpeg"), scratch.path());

    let resp = server.get("/").await;
    resp.assert_status_ok();
    let html = resp.text();
    assert!(html.contains("MKV to MP4 Converter"));
    assert!(html.contains("Convert to MP4"));
}

#[tokio::test]
async fn health_without_ffmpeg() {
    let (bin, scratch) = dirs();
    let server = test_app(bin.path().join("ffmpeg"), scratch.path());

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert!(body["ffmpeg"].is_null());
}

#[cfg(unix)]
#[tokio::test]
async fn health_reports_ffmpeg_version() {
    let (bin, scratch) = dirs();
    let ffmpeg = fake_ffmpeg(bin.path(), "echo 'ffmpeg version 9.9-test'\n");
    let server = test_app(ffmpeg, scratch.path());

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["ffmpeg"], "ffmpeg version 9.9-test");
}

#[cfg(unix)]
#[tokio::test]
async fn converts_movie_mkv_to_movie_mp4() {
    let (bin, scratch) = dirs();
    let server = test_app(fake_ffmpeg(bin.path(), COPYING_FFMPEG), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("movie.mkv", b"matroska bytes"))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.header("content-type"), "video/mp4");
    assert_eq!(
        resp.header("content-disposition"),
        "attachment; filename=\"movie.mp4\"; filename*=UTF-8''movie.mp4"
    );
    assert_eq!(resp.as_bytes().as_ref(), b"converted:matroska bytes");

    assert!(scratch_entries(scratch.path()).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn download_name_keeps_inner_dots() {
    let (bin, scratch) = dirs();
    let server = test_app(fake_ffmpeg(bin.path(), COPYING_FFMPEG), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("Show.S01E02.1080p.MKV", b"x"))
        .await;

    resp.assert_status_ok();
    assert_eq!(
        resp.header("content-disposition"),
        "attachment; filename=\"Show.S01E02.1080p.mp4\"; filename*=UTF-8''Show.S01E02.1080p.mp4"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn download_name_keeps_non_ascii_characters() {
    let (bin, scratch) = dirs();
    let server = test_app(fake_ffmpeg(bin.path(), COPYING_FFMPEG), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("Amélie.mkv", b"x"))
        .await;

    resp.assert_status_ok();
    let disposition = resp.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.contains("filename=\"Am_lie.mp4\""));
    assert!(disposition.ends_with("filename*=UTF-8''Am%C3%A9lie.mp4"));
}

#[cfg(unix)]
#[tokio::test]
async fn ffmpeg_failure_shows_diagnostics_and_cleans_up() {
    let (bin, scratch) = dirs();
    let server = test_app(fake_ffmpeg(bin.path(), FAILING_FFMPEG), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("movie.mkv", b"not a matroska file"))
        .await;

    resp.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "conversion_failed");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("ffmpeg error:\n"));
    assert!(message.contains("Invalid data found when processing input"));

    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn missing_ffmpeg_is_execution_error() {
    let (bin, scratch) = dirs();
    let server = test_app(bin.path().join("not-installed"), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("movie.mkv", b"matroska bytes"))
        .await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "execution_error");
    assert!(scratch_entries(scratch.path()).is_empty());

    // The server keeps serving after a failed conversion.
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn rejects_other_extensions() {
    let (bin, scratch) = dirs();
    let server = test_app(bin.path().join("ffmpeg"), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("movie.avi", b"riff"))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(scratch_entries(scratch.path()).is_empty());
}

#[tokio::test]
async fn rejects_form_without_file() {
    let (bin, scratch) = dirs();
    let server = test_app(bin.path().join("ffmpeg"), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(MultipartForm::new().add_text("note", "hello"))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing 'file' field")
    );
}

#[cfg(unix)]
#[tokio::test]
async fn large_upload_is_not_limited() {
    let big = vec![7u8; 4 * 1024 * 1024];

    let (bin, scratch) = dirs();
    let server = test_app(fake_ffmpeg(bin.path(), COPYING_FFMPEG), scratch.path());

    let resp = server
        .post("/api/v1/convert")
        .multipart(mkv_form("big.mkv", &big))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.as_bytes().len(), "converted:".len() + big.len());
    assert!(scratch_entries(scratch.path()).is_empty());
}
