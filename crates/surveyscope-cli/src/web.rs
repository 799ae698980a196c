//! Embedded static files for the dashboard page.

use axum::{
    body::Body,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/assets/"]
pub struct Assets;

/// Serve embedded static files, with fallback to index.html.
pub async fn static_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if let Some(content) = Assets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return (
            [(header::CONTENT_TYPE, mime.as_ref().to_string())],
            Body::from(content.data.into_owned()),
        )
            .into_response();
    }

    if let Some(content) = Assets::get("index.html") {
        return (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
            Body::from(content.data.into_owned()),
        )
            .into_response();
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_page() -> String {
        let content = Assets::get("index.html").unwrap();
        String::from_utf8(content.data.into_owned()).unwrap()
    }

    #[test]
    fn test_page_never_parses_survey_text_as_html() {
        let page = index_page();
        assert!(!page.contains("innerHTML"));
        assert!(!page.contains("insertAdjacentHTML"));
        assert!(page.contains("textContent"));
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_index() {
        let response = static_handler(Uri::from_static("/no/such/page")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
