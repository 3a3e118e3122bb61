use std::sync::Arc;

use tracing::error;

use tasklist_db::Database;

use crate::auth::AuthService;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

/// Process-wide handles, built once at startup and never mutated.
pub struct AppStateInner {
    pub db: Arc<Database>,
    pub auth: AuthService,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, auth: AuthService) -> AppState {
        Arc::new(Self { db, auth })
    }
}

/// Runs blocking store or hashing work off the async runtime.
pub(crate) async fn blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("internal server error".to_string())
        })?
        .map_err(Into::into)
}
