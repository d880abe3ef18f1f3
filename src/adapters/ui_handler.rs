use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

const INDEX: &str = "index.html";

pub struct UIHandler;

impl UIHandler {
    fn asset(path: &str) -> Option<Response> {
        let content = Asset::get(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let cache = if path == INDEX {
            "no-cache"
        } else {
            "public, max-age=3600"
        };
        Some(
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache.to_string()),
                ],
                content.data,
            )
                .into_response(),
        )
    }

    /// Serve an embedded asset; unknown paths get `index.html` so the client router can take over
    pub async fn serve(uri: Uri) -> Response {
        let path = uri.path().trim_start_matches('/');
        let path = if path.is_empty() { INDEX } else { path };

        if path.starts_with("api/") {
            return (StatusCode::NOT_FOUND, "404 Not Found").into_response();
        }

        Self::asset(path)
            .or_else(|| Self::asset(INDEX))
            .unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
    }
}
