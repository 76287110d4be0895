//! Embedded browser client

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

/// Serve a file from `ui/assets`
pub async fn serve_asset(Path(path): Path<String>) -> Response {
    let path = format!("assets/{}", path.trim_start_matches('/'));

    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Serve the chat page
pub async fn serve_index() -> Response {
    match Assets::get("index.html").and_then(|c| String::from_utf8(c.data.into_owned()).ok()) {
        Some(html) => Html(html).into_response(),
        None => (StatusCode::NOT_FOUND, Html("<h1>404 - UI not found</h1>")).into_response(),
    }
}
