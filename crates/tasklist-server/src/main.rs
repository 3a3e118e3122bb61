mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use tasklist_api::auth::AuthService;
use tasklist_api::password::SaltedHasher;
use tasklist_api::token::TokenService;
use tasklist_api::{AppStateInner, router};
use tasklist_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasklist=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = Arc::new(Database::open(&config.db_path)?);

    let hasher = SaltedHasher::new(&config.password_salt)?;
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);
    let auth = AuthService::new(db.clone(), hasher, tokens);

    let app = router::build(AppStateInner::new(db, auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Tasklist server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
