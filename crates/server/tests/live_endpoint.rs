//! End-to-end tests for the live data endpoint.
//!
//! A producer appends to files in a temp directory while the router is
//! driven with `oneshot` requests; responses are folded into a
//! `StreamCursor` exactly as a poller would.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use signal_view_core::{ClientConfig, SignalSnapshot, SourceConfig, StreamCursor};
use signal_view_server::{create_app, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

/// Helper: GET /data against a fresh router over `dir`.
async fn poll(dir: &Path) -> SignalSnapshot {
    let app = create_app(AppState::new(
        SourceConfig::new(dir, "txt"),
        ClientConfig::default(),
    ));
    let response = app
        .oneshot(Request::builder().uri("/data").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn append(path: &Path, lines: &[&str]) {
    let mut f = OpenOptions::new().create(true).append(true).open(path).unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

fn set_mtime(path: &Path, secs: u64) {
    let f = File::options().write(true).open(path).unwrap();
    f.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

#[tokio::test]
async fn producer_append_is_delivered_as_suffix_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.txt");
    let mut cursor = StreamCursor::new(1000);

    append(&path, &["1.0", "2.0", "3.0"]);
    let first = poll(dir.path()).await;
    assert_eq!(first, SignalSnapshot::file("s.txt", vec![1.0, 2.0, 3.0]));
    let update = cursor.apply(&first);
    assert_eq!(update.appended, 0..3);
    assert_eq!(cursor.window(), vec![1.0, 2.0, 3.0]);
    assert_eq!(cursor.next_index(), 3);

    append(&path, &["4.0"]);
    let second = poll(dir.path()).await;
    assert_eq!(second.values, vec![1.0, 2.0, 3.0, 4.0]);
    let update = cursor.apply(&second);
    assert!(!update.reset);
    assert_eq!(&second.values[update.appended.clone()], &[4.0]);
    assert_eq!(cursor.next_index(), 4);
}

#[tokio::test]
async fn rotation_to_newer_file_resets_client() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let mut cursor = StreamCursor::new(1000);

    append(&a, &["1", "2", "3", "4", "5"]);
    set_mtime(&a, 1_000);
    cursor.apply(&poll(dir.path()).await);
    assert_eq!(cursor.observed(), "a.txt");

    append(&b, &["10", "20"]);
    set_mtime(&b, 2_000);
    let update = cursor.apply(&poll(dir.path()).await);
    assert!(update.reset);
    assert_eq!(cursor.observed(), "b.txt");
    assert_eq!(cursor.window(), vec![10.0, 20.0]);
}

#[tokio::test]
async fn truncation_resets_client() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.txt");
    let mut cursor = StreamCursor::new(1000);

    append(&path, &["1", "2", "3", "4", "5"]);
    cursor.apply(&poll(dir.path()).await);

    std::fs::write(&path, "9\n8\n").unwrap();
    let update = cursor.apply(&poll(dir.path()).await);
    assert!(update.reset);
    assert_eq!(cursor.window(), vec![9.0, 8.0]);
    assert_eq!(cursor.next_index(), 2);
}

#[tokio::test]
async fn partial_line_degrades_then_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("s.txt");
    append(&path, &["1.0", "2.0"]);
    {
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        write!(f, "-0.").unwrap();
        write!(f, "5e").unwrap();
    }
    assert_eq!(poll(dir.path()).await, SignalSnapshot::read_error());

    {
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(f, "1").unwrap();
    }
    assert_eq!(
        poll(dir.path()).await,
        SignalSnapshot::file("s.txt", vec![1.0, 2.0, -5.0])
    );
}

#[tokio::test]
async fn concurrent_polls_see_consistent_snapshots() {
    let dir = TempDir::new().unwrap();
    append(&dir.path().join("s.txt"), &["1", "2", "3"]);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let root = dir.path().to_path_buf();
            tokio::spawn(async move { poll(&root).await })
        })
        .collect();

    for handle in handles {
        let snap = handle.await.unwrap();
        assert_eq!(snap, SignalSnapshot::file("s.txt", vec![1.0, 2.0, 3.0]));
    }
}
