use axum::{Router, routing::get, Json, extract::{State, Query}};
use serde::Deserialize;
use uuid::Uuid;
use axum::http::StatusCode;

use crate::models::{CycleRecord, NewCycleRecord};
use crate::AppState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<Uuid>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/cycle", get(get_cycle_history).post(save_cycle_record))
        .with_state(state)
}

async fn save_cycle_record(
    State(state): State<AppState>,
    Json(body): Json<NewCycleRecord>,
) -> Result<(StatusCode, Json<CycleRecord>), (StatusCode, String)> {
    if body.cycle_length < 1 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "cycle_length must be a positive number of days".into(),
        ));
    }

    let Some(user_id) = body.user_id.or(state.default_user_id) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "user_id required (no default user configured)".into(),
        ));
    };

    let record = sqlx::query_as::<_, CycleRecord>(
        "INSERT INTO cycle_records (user_id, start_date, cycle_length, symptoms, flow_intensity, mood, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, user_id, start_date, cycle_length, symptoms, flow_intensity, mood, notes, created_at, updated_at",
    )
    .bind(user_id)
    .bind(body.start_date)
    .bind(body.cycle_length)
    .bind(body.symptoms)
    .bind(body.flow_intensity)
    .bind(body.mood)
    .bind(body.notes)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            tracing::error!("❌ DB insert failed: {}", db_err.message());

            if let Some(code) = db_err.code() {
                tracing::info!("ℹ️ SQLSTATE code: {}", code);
            }

            if let Some(constraint) = db_err.constraint() {
                tracing::info!("🔒 Constraint violated: {}", constraint);
            }
        } else {
            tracing::error!("❌ Unknown DB error: {}", e);
        }

        (StatusCode::UNPROCESSABLE_ENTITY, "could not store cycle record".into())
    })?;

    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_cycle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<CycleRecord>>, StatusCode> {
    let records = match params.user_id {
        Some(user_id) => {
            sqlx::query_as::<_, CycleRecord>(
                "SELECT id, user_id, start_date, cycle_length, symptoms, flow_intensity, mood, notes, created_at, updated_at
                 FROM cycle_records
                 WHERE user_id = $1
                 ORDER BY start_date DESC",
            )
            .bind(user_id)
            .fetch_all(&state.pool)
            .await
        }
        // admin/demo path: every record in the store
        None => {
            sqlx::query_as::<_, CycleRecord>(
                "SELECT id, user_id, start_date, cycle_length, symptoms, flow_intensity, mood, notes, created_at, updated_at
                 FROM cycle_records
                 ORDER BY start_date DESC",
            )
            .fetch_all(&state.pool)
            .await
        }
    }
    .map_err(|e| {
        tracing::error!("❌ DB error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(records))
}
