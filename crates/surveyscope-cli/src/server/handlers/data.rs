//! Upload, data preview and dashboard option handlers.

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use surveyscope::schema::{ColumnSummary, FieldReport};
use surveyscope::{ChartKind, SurveyError};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters of an upload.
#[derive(Deserialize)]
pub struct UploadQuery {
    /// Original file name, recorded in the source metadata.
    pub name: Option<String>,
}

/// Response after an upload.
#[derive(Serialize)]
pub struct UploadResponse {
    pub file: String,
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub fields: FieldReport,
}

/// Response for the data preview endpoint.
#[derive(Serialize)]
pub struct DataPreviewResponse {
    /// Column headers.
    pub headers: Vec<String>,
    /// Uploaded rows as read (first N rows).
    pub rows: Vec<Vec<String>>,
    /// Rows in the uploaded file.
    pub total_rows: usize,
    /// Rows of respondents who used the tool; `None` without a usage column.
    pub filtered_rows: Option<usize>,
    /// Whether the data was truncated.
    pub truncated: bool,
    /// Per-column summaries of the upload.
    pub columns: Vec<ColumnSummary>,
}

/// One entry of the chart menu.
#[derive(Serialize)]
pub struct ChartOption {
    pub kind: ChartKind,
    pub label: &'static str,
    /// Whether the chart can be exported as an image.
    pub exportable: bool,
}

/// Response for the options endpoint.
#[derive(Serialize)]
pub struct OptionsResponse {
    pub charts: Vec<ChartOption>,
    pub metrics: Vec<String>,
    pub has_opinions: bool,
    pub fields: FieldReport,
}

/// Maximum number of rows to return in preview.
const MAX_PREVIEW_ROWS: usize = 100;

/// POST /api/upload
pub async fn upload_survey(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Upload body is empty".to_string()));
    }

    let name = query.name.unwrap_or_else(|| "upload.csv".to_string());
    state.load(&name, &body).await?;

    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;
    let source = dash.source();

    Ok(Json(UploadResponse {
        file: source.file.clone(),
        format: source.format.clone(),
        row_count: source.row_count,
        column_count: source.column_count,
        fields: dash.field_report(),
    }))
}

/// GET /api/data
pub async fn get_data_preview(
    State(state): State<AppState>,
) -> Result<Json<DataPreviewResponse>, ApiError> {
    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;

    let total_rows = dash.table().row_count();
    let filtered_rows = match dash.filtered() {
        Ok(filtered) => Some(filtered.row_count()),
        Err(SurveyError::Schema { .. }) => None,
        Err(e) => return Err(e.into()),
    };
    let head = dash.table().head(MAX_PREVIEW_ROWS);

    Ok(Json(DataPreviewResponse {
        headers: head.headers,
        rows: head.rows,
        total_rows,
        filtered_rows,
        truncated: total_rows > MAX_PREVIEW_ROWS,
        columns: dash.summaries(),
    }))
}

/// GET /api/options
pub async fn get_options(
    State(state): State<AppState>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;

    let charts = ChartKind::ALL
        .into_iter()
        .map(|kind| ChartOption {
            kind,
            label: kind.label(),
            exportable: kind.is_static(),
        })
        .collect();

    let has_opinions = dash
        .config()
        .fields
        .opinion
        .as_deref()
        .is_some_and(|field| dash.table().has_column(field));

    Ok(Json(OptionsResponse {
        charts,
        metrics: dash.metrics().into_iter().map(str::to_string).collect(),
        has_opinions,
        fields: dash.field_report(),
    }))
}
