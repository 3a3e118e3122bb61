pub mod auth;
pub mod error;
pub mod extract;
pub mod items;
pub mod lists;
pub mod middleware;
pub mod password;
pub mod router;
pub mod state;
pub mod token;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};
