use axum::{Router, routing::get, Json, extract::{State, Query}};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{CycleRecord, Prediction};
use crate::prediction::predict_next_cycle;
use crate::AppState;

#[derive(Deserialize)]
pub struct PredictQuery {
    pub user_id: Option<Uuid>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cycle/predict", get(predict))
        .with_state(state)
}

async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictQuery>,
) -> Result<Json<Prediction>, (StatusCode, String)> {
    let Some(user_id) = params.user_id.or(state.default_user_id) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "user_id required (no default user configured)".into(),
        ));
    };

    // Most recent first; the engine relies on this ordering.
    let history = sqlx::query_as::<_, CycleRecord>(
        "SELECT id, user_id, start_date, cycle_length, symptoms, flow_intensity, mood, notes, created_at, updated_at
         FROM cycle_records
         WHERE user_id = $1
         ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("❌ DB error in predict: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "DB error".into())
    })?;

    Ok(Json(predict_next_cycle(&history)))
}
