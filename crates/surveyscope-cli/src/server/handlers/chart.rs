//! Chart and word-cloud handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use surveyscope::{ChartRequest, WordCloudRequest};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response for a chart request.
#[derive(Serialize)]
pub struct ChartResponse {
    pub request: ChartRequest,
    /// Plotly figure; `null` when no respondent used the tool.
    pub figure: Option<Value>,
    pub no_data: bool,
}

/// GET /api/chart?kind=bar&metric=...
pub async fn get_chart(
    State(state): State<AppState>,
    Query(request): Query<ChartRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;

    let figure = dash.figure(&request)?;
    Ok(Json(ChartResponse {
        no_data: figure.is_none(),
        figure,
        request,
    }))
}

/// GET /api/wordcloud
///
/// `null` when there are no opinions to draw.
pub async fn get_word_cloud(
    State(state): State<AppState>,
) -> Result<Json<Option<WordCloudRequest>>, ApiError> {
    let guard = state.dashboard.read().await;
    let dash = guard.as_ref().ok_or_else(ApiError::no_survey)?;

    Ok(Json(dash.word_cloud()?))
}
