//! End-to-end route tests against mocked platform services.

use std::{fs, path::PathBuf, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bridge_engine::{
    Bridge, MESSAGE_FILE_NAME, Settings,
    test_support::{Launched, TestRig},
};
use bridge_server::{Server, router};
use http_body_util::BodyExt;
use relaykey::{Chord, Key};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use winops::MockWinOps;

struct Harness {
    rig: TestRig,
    app: Router,
    dir: TempDir,
    file: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.rs");
        fs::write(&file, "fn main() {}\n").unwrap();
        let rig = TestRig::new();
        let settings = Settings {
            message_path: dir.path().join(MESSAGE_FILE_NAME),
            ..Settings::default()
        };
        let app = router(Arc::new(Bridge::new(settings, rig.services())));
        Self {
            rig,
            app,
            dir,
            file,
        }
    }

    fn editor_running(&self, title: &str) {
        self.rig
            .winops
            .set_windows(vec![MockWinOps::window(0x42, title)]);
    }

    fn file_str(&self) -> String {
        self.file.to_string_lossy().into_owned()
    }

    async fn post(&self, uri: &str, body: impl Into<String>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::from(body.into()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

#[tokio::test]
async fn missing_file_path_is_rejected_before_launch() {
    let h = Harness::new();
    let (status, body) = h.post("/open", json!({"comment": "hi"}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Missing 'filePath'"}));
    assert!(h.rig.launcher.launched().is_empty());
}

#[tokio::test]
async fn malformed_bodies_are_invalid_json() {
    let h = Harness::new();
    for body in ["{not json", "[1,2,3]", ""] {
        let (status, resp) = h.post("/open-file", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(resp, json!({"error": "Invalid JSON"}));
    }
}

#[tokio::test]
async fn nonexistent_file_reports_normalized_path() {
    let h = Harness::new();
    let raw = h.dir.path().join("sub").join("..").join("gone.rs");
    let (status, body) = h
        .post("/open", json!({"filePath": raw}).to_string())
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "File does not exist");
    assert_eq!(
        body["filePath"],
        &*h.dir.path().join("gone.rs").to_string_lossy()
    );
    assert!(h.rig.launcher.launched().is_empty());
}

#[tokio::test]
async fn hot_path_pastes_and_submits() {
    let h = Harness::new();
    h.editor_running("main.rs - proj - Cursor");
    let (status, body) = h
        .post(
            "/open",
            json!({
                "filePath": h.file_str(),
                "comment": "hello",
                "codeSnippet": "print(1)",
                "autoSubmit": true,
            })
            .to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let saved_to = h.dir.path().join(MESSAGE_FILE_NAME);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "openedWorkspace": null,
            "openedFile": h.file_str(),
            "messageSavedTo": saved_to.to_string_lossy(),
            "autoSubmitted": true,
            "note": "Pasted and submitted",
            "warnings": [],
        })
    );
    let saved = fs::read_to_string(&saved_to).unwrap();
    assert_eq!(saved, "hello\n\n--- CODE SNIPPET ---\n\nprint(1)");
    assert_eq!(h.rig.clipboard.copies(), vec![saved]);
    assert_eq!(
        h.rig.poster.taps().last(),
        Some(&Chord::plain(Key::Enter))
    );
}

#[tokio::test]
async fn cold_path_with_no_editor_still_succeeds() {
    let h = Harness::new();
    let (status, body) = h
        .post(
            "/open",
            json!({"file_path": h.file_str(), "comment": "hello"}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["autoSubmitted"], false);
    assert_eq!(body["note"], "Pasted (press Enter to submit)");
    let warnings: Vec<&str> = body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(warnings.iter().any(|w| w.contains("startup timeout")), "{warnings:?}");
    assert!(warnings.iter().any(|w| w.contains("File load timeout")), "{warnings:?}");
    assert!(h.rig.poster.events().is_empty());
}

#[tokio::test]
async fn open_file_focuses_without_pasting() {
    let h = Harness::new();
    h.editor_running("main.rs - proj - Cursor");
    let ws = h.dir.path().to_string_lossy().into_owned();
    let (status, body) = h
        .post(
            "/open-file",
            json!({"filePath": h.file_str(), "repo_path": ws}).to_string(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "openedWorkspace": ws,
            "openedFile": h.file_str(),
            "note": "File opened in Cursor",
            "warnings": [],
        })
    );
    assert_eq!(
        h.rig.launcher.launched(),
        vec![Launched::Spawn {
            program: "cursor".into(),
            args: vec![h.dir.path().to_path_buf(), h.file.clone()],
        }]
    );
    assert!(h.rig.clipboard.copies().is_empty());
    assert!(h.rig.poster.events().is_empty());
    assert!(h.rig.winops.calls_contains("set_foreground"));
    assert!(!h.dir.path().join(MESSAGE_FILE_NAME).exists());
}

#[tokio::test]
async fn launch_failure_is_a_server_error() {
    let h = Harness::new();
    h.rig.launcher.set_fail_spawn(true);
    h.rig.launcher.set_fail_default(true);
    let (status, body) = h
        .post("/open", json!({"filePath": h.file_str()}).to_string())
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to open file");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Failed to open file: ")
    );
}

#[tokio::test]
async fn unwritable_message_file_is_a_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.rs");
    fs::write(&file, "").unwrap();
    let rig = TestRig::new();
    let settings = Settings {
        message_path: dir.path().join("missing").join(MESSAGE_FILE_NAME),
        ..Settings::default()
    };
    let app = router(Arc::new(Bridge::new(settings, rig.services())));
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/open")
                .body(Body::from(
                    json!({"filePath": file.to_string_lossy()}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Failed to write message to temp");
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn server_binds_ephemeral_port_and_shuts_down() {
    let rig = TestRig::new();
    let bridge = Bridge::new(Settings::default(), rig.services());
    let bound = Server::new(bridge).with_port(0).bind().await.unwrap();
    assert_ne!(bound.local_addr().port(), 0);
    assert!(bound.local_addr().ip().is_loopback());
    bound.serve_with_shutdown(async {}).await.unwrap();
}
