//! Export download handler.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use surveyscope::{ChartRequest, ExportFormat};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /api/export/:format?kind=bar&metric=...
pub async fn export_view(
    State(state): State<AppState>,
    Path(format): Path<ExportFormat>,
    Query(request): Query<ChartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;

    let bytes = dash.export(format, &request)?;
    let file_name = format!(
        "{}.{}",
        dash.config().export.file_stem,
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    ))
}
