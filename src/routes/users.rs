use axum::{
    Router,
    routing::{get, post},
    extract::{State, Path},
    Json,
    http::StatusCode,
};

use crate::models::{NewUser, User};
use crate::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/users", post(create_user).get(get_all_users))
        .route("/api/users/email/:email", get(get_user_by_email))
        .with_state(state)
}

async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<User>), (StatusCode, String)> {
    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
    )
    .bind(&body.email)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("❌ DB error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "DB error".into())
    })?;

    if email_taken {
        return Err((StatusCode::CONFLICT, "Email already exists".into()));
    }

    // password is never echoed back
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password)
         VALUES ($1, $2, $3)
         RETURNING id, name, email, created_at",
    )
    .bind(&body.name)
    .bind(&body.email)
    .bind(&body.password)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        if let Some(db_err) = e.as_database_error() {
            tracing::error!("❌ DB insert failed: {}", db_err.message());

            if let Some(constraint) = db_err.constraint() {
                tracing::info!("🔒 Constraint violated: {}", constraint);
            }
        } else {
            tracing::error!("❌ Unknown DB error: {}", e);
        }

        (StatusCode::UNPROCESSABLE_ENTITY, "could not create user".into())
    })?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, StatusCode> {
    let users = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users ORDER BY created_at ASC",
    )
    .fetch_all(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("❌ DB error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(users))
}

async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let Some(user) = sqlx::query_as::<_, User>(
        "SELECT id, name, email, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.pool)
    .await
    .map_err(|e| {
        tracing::error!("❌ DB error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })? else {
        return Err(StatusCode::NOT_FOUND);
    };

    Ok(Json(user))
}
