// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the development server.

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use bliz::EntryDescriptor;
use bliz_cli::server::http::{router, AppState, RELOAD_CLIENT_SCRIPT};
use bliz_cli::server::{DevServer, ReloadNotifier, RequestHandler};
use bliz_cli::watcher::FileWatcher;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn test_server(root: &Path, entry: Option<EntryDescriptor>) -> TestServer {
    let state = Arc::new(AppState {
        handler: RequestHandler::new(root, entry),
        notifier: ReloadNotifier::new(),
    });
    TestServer::new(router(state)).unwrap()
}

/// Waits until `notifier` has `count` clients.
async fn wait_for_clients(notifier: &ReloadNotifier, count: usize) {
    timeout(Duration::from_secs(5), async {
        while notifier.client_count() != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("client count never settled");
}

/// Sends a bare HTTP/1.1 GET and returns the raw response.
async fn http_get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    let request = format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path);
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

#[tokio::test]
async fn test_root_serves_entry_with_reload_client() {
    let dir = tempdir().unwrap();
    write(dir.path(), "src/home.html", b"<html><body><h1>Home</h1></body></html>");
    let entry = EntryDescriptor::from_file(dir.path().join("src/home.html"));

    let server = test_server(dir.path(), Some(entry));
    let response = server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");
    let body = response.text();
    assert!(body.contains("<h1>Home</h1>"));
    assert!(body.contains(RELOAD_CLIENT_SCRIPT));
    assert!(body.ends_with("</script>\n</body></html>"));
}

#[tokio::test]
async fn test_html_without_body_is_served_unchanged() {
    let dir = tempdir().unwrap();
    write(dir.path(), "fragment.html", b"<p>partial</p>");

    let server = test_server(dir.path(), None);
    let response = server.get("/fragment.html").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "<p>partial</p>");
}

#[tokio::test]
async fn test_non_html_files_are_byte_identical() {
    let dir = tempdir().unwrap();
    let image: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe, b'<', b'/', b'b', b'o', b'd', b'y', b'>'];
    write(dir.path(), "img/logo.png", &image);
    write(dir.path(), "app.js", b"console.log('</body>')");

    let server = test_server(dir.path(), None);

    let png = server.get("/img/logo.png").await;
    png.assert_status_ok();
    assert_eq!(png.header("content-type"), "image/png");
    assert_eq!(&png.as_bytes()[..], image.as_slice());

    let js = server.get("/app.js").await;
    assert_eq!(js.text(), "console.log('</body>')");
}

#[tokio::test]
async fn test_directory_serves_its_index() {
    let dir = tempdir().unwrap();
    write(dir.path(), "docs/index.html", b"<body>docs</body>");

    let server = test_server(dir.path(), None);
    let response = server.get("/docs/").await;

    response.assert_status_ok();
    assert!(response.text().starts_with("<body>docs<script>"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let server = test_server(dir.path(), None);

    let response = server.get("/nope.css").await;
    response.assert_status_not_found();
    assert_eq!(response.text(), "Not Found");

    // No entry and no index.html
    server.get("/").await.assert_status_not_found();
}

#[tokio::test]
async fn test_busy_port_is_substituted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.html", b"<body>hello</body>");
    let entry = EntryDescriptor::from_file(dir.path().join("index.html"));

    let busy = TcpListener::bind("127.0.0.1:0").unwrap();
    let busy_port = busy.local_addr().unwrap().port();

    let server = DevServer::new(dir.path(), Some(entry))
        .with_port(busy_port)
        .with_watch(false)
        .start()
        .await
        .unwrap();

    assert!(server.port_substituted());
    assert_eq!(server.requested_port(), busy_port);
    assert_ne!(server.port(), busy_port);
    assert_eq!(server.url(), format!("http://localhost:{}", server.port()));

    let response = http_get(server.port(), "/").await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("hello"));
    assert!(response.contains("new WebSocket"));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_file_change_reaches_connected_clients() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.html", b"<body>v1</body>");
    write(dir.path(), "css/site.css", b"body {}");

    let server = DevServer::new(dir.path(), None).with_port(0).start().await.unwrap();
    assert!(server.is_watching());

    let notifier = server.notifier();
    let (_id, mut rx) = notifier.connect();
    let (gone, mut gone_rx) = notifier.connect();
    notifier.disconnect(gone);

    tokio::time::sleep(Duration::from_millis(200)).await;
    write(dir.path(), "css/site.css", b"body { color: red }");

    let message = timeout(Duration::from_secs(10), async {
        loop {
            let message = rx.recv().await.unwrap();
            if message.contains("site.css") {
                return message;
            }
        }
    })
    .await
    .expect("no reload event within 10s");

    assert_eq!(message, r#"{"type":"reload","path":"/css/site.css"}"#);
    assert!(gone_rx.recv().await.is_none());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_websocket_client_receives_file_changes() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.html", b"<body>v1</body>");

    let notifier = ReloadNotifier::new();
    let state = Arc::new(AppState {
        handler: RequestHandler::new(dir.path(), None),
        notifier: notifier.clone(),
    });
    let server = TestServer::builder().http_transport().build(router(state)).unwrap();

    let broadcaster = notifier.clone();
    let _watcher = FileWatcher::new(dir.path(), move |events| {
        for event in &events {
            broadcaster.broadcast(event);
        }
    })
    .unwrap();

    // Upgrades are accepted on any path, next to ordinary file requests
    server.get("/index.html").await.assert_status_ok();
    let mut socket = server.get_websocket("/some/page").await.into_websocket().await;
    wait_for_clients(&notifier, 1).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    write(dir.path(), "index.html", b"<body>v2</body>");

    let message = timeout(Duration::from_secs(10), async {
        loop {
            let message = socket.receive_text().await;
            if message.contains("index.html") {
                return message;
            }
        }
    })
    .await
    .expect("no reload frame within 10s");
    assert_eq!(message, r#"{"type":"reload","path":"/index.html"}"#);

    socket.close().await;
    wait_for_clients(&notifier, 0).await;
}

#[tokio::test]
async fn test_existing_files_produce_no_events() {
    let dir = tempdir().unwrap();
    write(dir.path(), "index.html", b"<body></body>");
    write(dir.path(), "a/b/c.js", b"");

    let server = DevServer::new(dir.path(), None).with_port(0).start().await.unwrap();
    let (_id, mut rx) = server.notifier().connect();

    let quiet = timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(quiet.is_err(), "unexpected event: {:?}", quiet);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_closes_clients() {
    let dir = tempdir().unwrap();
    let server = DevServer::new(dir.path(), None)
        .with_port(0)
        .with_watch(false)
        .start()
        .await
        .unwrap();

    let notifier = server.notifier();
    let (_id, mut rx) = notifier.connect();

    server.shutdown().await.unwrap();

    assert_eq!(notifier.client_count(), 0);
    assert!(rx.recv().await.is_none());
}
