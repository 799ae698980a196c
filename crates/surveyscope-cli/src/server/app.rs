//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use crate::web::static_handler;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Survey upload and preview
        .route("/upload", post(handlers::upload_survey))
        .route("/data", get(handlers::get_data_preview))
        .route("/options", get(handlers::get_options))
        // Views
        .route("/chart", get(handlers::get_chart))
        .route("/wordcloud", get(handlers::get_word_cloud))
        .route("/export/:format", get(handlers::export_view))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}

/// Start the web server; returns after Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "dashboard server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use surveyscope::{FontResolution, SurveyConfig};
    use tower::ServiceExt;

    const SURVEY: &str = "\
사용 여부,사용자 유형,감정,사용 빈도,유용성 점수,신뢰도 점수,의견
예,학생,기쁨,매일,4,3,수업에 도움
아니오,교사,불안,없음,1,1,
예,교사,불안,가끔,5,4,
";

    fn state() -> AppState {
        AppState::new(SurveyConfig::default(), FontResolution::builtin())
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn get(state: &AppState, uri: &str) -> (StatusCode, Vec<u8>) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn upload(state: &AppState) {
        let request = Request::post("/api/upload?name=survey.csv")
            .body(Body::from(SURVEY))
            .unwrap();
        let (status, _) = send(state, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_views_need_an_upload() {
        let (status, body) = get(&state(), "/api/chart?kind=bar").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_upload_then_chart() {
        let state = state();
        upload(&state).await;

        let (status, body) = get(&state, "/api/chart?kind=pie").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["no_data"], false);
        assert_eq!(json["figure"]["data"][0]["type"], "pie");

        let (_, body) = get(&state, "/api/data").await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total_rows"], 3);
        assert_eq!(json["filtered_rows"], 2);
        // The preview shows the upload as read, non-users included
        assert_eq!(json["rows"].as_array().unwrap().len(), 3);
        assert_eq!(json["rows"][1][0], "아니오");
    }

    #[tokio::test]
    async fn test_preview_without_usage_column() {
        let state = state();
        let request = Request::post("/api/upload?name=partial.csv")
            .body(Body::from("사용자 유형,유용성 점수\n학생,4\n교사,2\n"))
            .unwrap();
        let (status, _) = send(&state, request).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&state, "/api/data").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert!(json["filtered_rows"].is_null());
    }

    #[tokio::test]
    async fn test_missing_metric_is_schema_error() {
        let state = state();
        upload(&state).await;

        let (status, body) = get(&state, "/api/chart?kind=bar&metric=%EB%A7%8C%EC%A1%B1%EB%8F%84").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "schema_error");
    }

    #[tokio::test]
    async fn test_export_download() {
        let state = state();
        upload(&state).await;

        let response = create_router(state.clone())
            .oneshot(
                Request::get("/api/export/xlsx?kind=bar")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("survey_dashboard.xlsx"));
    }

    #[tokio::test]
    async fn test_word_cloud_endpoint() {
        let state = state();
        upload(&state).await;

        let (status, body) = get(&state, "/api/wordcloud").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["words"]["words"].as_array().unwrap().len(), 2);
        assert_eq!(json["config"]["width"], 800);
    }
}
