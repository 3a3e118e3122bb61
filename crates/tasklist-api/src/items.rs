use axum::{Json, extract::State};

use tasklist_db::{ItemChanges, ItemRow};
use tasklist_types::api::{CreateItemRequest, DataResponse, IdResponse, StatusResponse, UpdateItemRequest};
use tasklist_types::models::TodoItem;

use crate::error::ApiError;
use crate::extract::{Ids, ValidJson};
use crate::middleware::AuthUser;
use crate::state::{AppState, blocking};

fn to_item(row: ItemRow) -> TodoItem {
    TodoItem {
        id: row.id,
        title: row.title,
        description: row.description,
        done: row.done,
    }
}

/// Creating under a list the caller does not own is a 404.
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids(list_id): Ids<i64>,
    ValidJson(req): ValidJson<CreateItemRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = blocking(move || {
        state
            .db
            .create_item(user_id, list_id, &req.title, &req.description, req.done)
    })
    .await?;
    Ok(Json(IdResponse { id }))
}

pub async fn get_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids(list_id): Ids<i64>,
) -> Result<Json<DataResponse<TodoItem>>, ApiError> {
    let rows = blocking(move || state.db.get_items(user_id, list_id)).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(to_item).collect(),
    }))
}

pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids((list_id, item_id)): Ids<(i64, i64)>,
) -> Result<Json<TodoItem>, ApiError> {
    let row = blocking(move || state.db.get_item(user_id, list_id, item_id)).await?;
    Ok(Json(to_item(row)))
}

pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids((list_id, item_id)): Ids<(i64, i64)>,
    ValidJson(req): ValidJson<UpdateItemRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let changes = ItemChanges {
        title: req.title,
        description: req.description,
        done: req.done,
    };
    blocking(move || state.db.update_item(user_id, list_id, item_id, &changes)).await?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids((list_id, item_id)): Ids<(i64, i64)>,
) -> Result<Json<StatusResponse>, ApiError> {
    blocking(move || state.db.delete_item(user_id, list_id, item_id)).await?;
    Ok(Json(StatusResponse::ok()))
}
