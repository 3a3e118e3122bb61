use axum::{
    Json, Router, middleware,
    routing::{get, post},
};

use tasklist_types::api::StatusResponse;

use crate::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, items, lists};

/// All routes. `/auth/*` and `/health` are public; everything under `/api`
/// passes through `require_auth` first.
pub fn build(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/api/lists", post(lists::create_list).get(lists::get_lists))
        .route(
            "/api/lists/{id}",
            get(lists::get_list)
                .put(lists::update_list)
                .delete(lists::delete_list),
        )
        .route(
            "/api/lists/{id}/items",
            post(items::create_item).get(items::get_items),
        )
        .route(
            "/api/lists/{id}/items/{item_id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
