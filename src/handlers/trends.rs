use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::Identity;
use crate::error::AppResult;
use crate::models::chart::{ChartQuery, ChartResponse};
use crate::models::trend::{TrendAnalysis, TrendQuery};
use crate::services::{charts, trends, window};
use crate::AppState;

pub async fn get_trends(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<TrendAnalysis>> {
    let range = query.range.unwrap_or_default();
    let today = Utc::now().date_naive();

    let analysis =
        trends::analyze_mood_trends(state.moods.as_ref(), &identity.user_id, range, today).await?;
    Ok(Json(analysis))
}

pub async fn get_chart(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ChartQuery>,
) -> AppResult<Json<ChartResponse>> {
    let range = query.range.unwrap_or_default();
    let mode = query.mode.unwrap_or_default();
    let period = window::trailing_window(Utc::now().date_naive(), range.days());

    let entries = state.moods.query(&identity.user_id, period).await?;
    let series = charts::project(&entries, range, mode);

    Ok(Json(ChartResponse {
        range,
        period_start: period.start,
        period_end: period.end,
        series,
    }))
}
