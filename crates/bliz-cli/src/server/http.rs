// Copyright 2026 Bliz Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP side of the development server.
//!
//! Every request goes to one fallback handler. WebSocket upgrades become
//! live-reload connections; everything else is served from the project root
//! by [`RequestHandler`], with the reload client injected into HTML pages.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{State, WebSocketUpgrade},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use bliz::EntryDescriptor;
use tower_http::trace::TraceLayer;

use super::livereload::{handle_websocket, ReloadNotifier};

/// Client snippet inserted before `</body>` of served HTML.
///
/// Connects back to the serving host and port and reloads the page on a
/// `reload` message. Other message types and malformed frames are ignored.
pub const RELOAD_CLIENT_SCRIPT: &str = r#"<script>
(function() {
    const protocol = window.location.protocol === 'https:' ? 'wss:' : 'ws:';
    const ws = new WebSocket(protocol + '//' + window.location.host);
    ws.onmessage = function(event) {
        let data;
        try {
            data = JSON.parse(event.data);
        } catch (e) {
            return;
        }
        if (data && data.type === 'reload') {
            console.log('[bliz] Reloading after change to ' + data.path);
            window.location.reload();
        }
    };
    ws.onclose = function() {
        console.log('[bliz] Live reload disconnected');
    };
})();
</script>
"#;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Content types by lowercase extension.
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", HTML_CONTENT_TYPE),
    ("htm", HTML_CONTENT_TYPE),
    ("js", "application/javascript; charset=utf-8"),
    ("mjs", "application/javascript; charset=utf-8"),
    ("cjs", "application/javascript; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("json", "application/json"),
    ("map", "application/json"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
    ("xml", "application/xml"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("ttf", "font/ttf"),
    ("otf", "font/otf"),
    ("wasm", "application/wasm"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("pdf", "application/pdf"),
];

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type for `path`, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    CONTENT_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}

/// Inserts the reload client immediately before the last `</body>`.
///
/// The closing tag is matched case-insensitively. Documents without one are
/// returned unchanged.
pub fn inject_reload_script(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with the input
    match html.to_ascii_lowercase().rfind("</body>") {
        Some(pos) => {
            let mut result = String::with_capacity(html.len() + RELOAD_CLIENT_SCRIPT.len());
            result.push_str(&html[..pos]);
            result.push_str(RELOAD_CLIENT_SCRIPT);
            result.push_str(&html[pos..]);
            result
        }
        None => html.to_string(),
    }
}

/// Serves project files for the development server.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    root: PathBuf,
    entry: Option<EntryDescriptor>,
}

impl RequestHandler {
    /// Creates a handler serving `root`. An HTML `entry` is served for `/`.
    pub fn new(root: impl Into<PathBuf>, entry: Option<EntryDescriptor>) -> Self {
        Self {
            root: root.into(),
            entry,
        }
    }

    /// Directory files are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a request path to a file on disk.
    ///
    /// `/` maps to the entry when it is an HTML page. Other paths are joined
    /// onto the root; directories map to their `index.html`. No check is made
    /// that the result stays inside the root.
    pub fn resolve_path(&self, request_path: &str) -> PathBuf {
        if request_path == "/" {
            if let Some(entry) = self.entry.as_ref().filter(|entry| entry.is_html()) {
                return entry.path.clone();
            }
        }

        let path = self.root.join(request_path.trim_start_matches('/'));
        if path.is_dir() {
            path.join("index.html")
        } else {
            path
        }
    }

    /// Produces the response for `request_path`.
    ///
    /// Unreadable or missing files give a plain 404. HTML that is valid UTF-8
    /// gets the reload client injected; every other file is sent unchanged.
    pub async fn handle(&self, request_path: &str) -> Response {
        let path = self.resolve_path(request_path);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!("{} -> {}: {}", request_path, path.display(), e);
                return not_found();
            }
        };

        let content_type = content_type_for(&path);
        let body = if content_type == HTML_CONTENT_TYPE {
            match String::from_utf8(bytes) {
                Ok(html) => Body::from(inject_reload_script(&html)),
                Err(e) => Body::from(e.into_bytes()),
            }
        } else {
            Body::from(bytes)
        };

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .body(body)
            .unwrap_or_else(|_| (StatusCode::INTERNAL_SERVER_ERROR, "Failed to build response").into_response())
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Not Found",
    )
        .into_response()
}

/// Shared state for request handling.
pub struct AppState {
    /// File server for the project root.
    pub handler: RequestHandler,
    /// Live-reload client set.
    pub notifier: ReloadNotifier,
}

/// Builds the router. WebSocket upgrades are accepted on any path.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(serve)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn serve(State(state): State<Arc<AppState>>, ws: Option<WebSocketUpgrade>, uri: Uri) -> Response {
    if let Some(ws) = ws {
        let notifier = state.notifier.clone();
        return ws.on_upgrade(move |socket| handle_websocket(socket, notifier));
    }

    state.handler.handle(uri.path()).await
}
