use axum::{routing::get, Router};
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::{env, net::SocketAddr};
use tracing_subscriber;
use uuid::Uuid;
use anyhow::Result;

mod routes;
mod models;
mod prediction;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    // demo fallback identity when a request names no user; never consulted
    // by the prediction engine itself
    pub default_user_id: Option<Uuid>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    let default_user_id = match env::var("DEFAULT_USER_ID") {
        Ok(raw) => Some(Uuid::parse_str(&raw)?),
        Err(_) => None,
    };

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3050);

    let state = AppState {
        pool,
        default_user_id,
    };

    let app = Router::new()
        .merge(routes::cycle::routes(state.clone()))
        .merge(routes::predict::routes(state.clone()))
        .merge(routes::users::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("🧠 Server running at {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
