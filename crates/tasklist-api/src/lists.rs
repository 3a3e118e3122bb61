use axum::{Json, extract::State};

use tasklist_db::{ListChanges, ListRow};
use tasklist_types::api::{CreateListRequest, DataResponse, IdResponse, StatusResponse, UpdateListRequest};
use tasklist_types::models::TodoList;

use crate::error::ApiError;
use crate::extract::{Ids, ValidJson};
use crate::middleware::AuthUser;
use crate::state::{AppState, blocking};

fn to_list(row: ListRow) -> TodoList {
    TodoList {
        id: row.id,
        title: row.title,
        description: row.description,
    }
}

pub async fn create_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ValidJson(req): ValidJson<CreateListRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    let id = blocking(move || state.db.create_list(user_id, &req.title, &req.description)).await?;
    Ok(Json(IdResponse { id }))
}

pub async fn get_lists(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<DataResponse<TodoList>>, ApiError> {
    let rows = blocking(move || state.db.get_lists(user_id)).await?;
    Ok(Json(DataResponse {
        data: rows.into_iter().map(to_list).collect(),
    }))
}

pub async fn get_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids(list_id): Ids<i64>,
) -> Result<Json<TodoList>, ApiError> {
    let row = blocking(move || state.db.get_list(user_id, list_id)).await?;
    Ok(Json(to_list(row)))
}

pub async fn update_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids(list_id): Ids<i64>,
    ValidJson(req): ValidJson<UpdateListRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let changes = ListChanges {
        title: req.title,
        description: req.description,
    };
    blocking(move || state.db.update_list(user_id, list_id, &changes)).await?;
    Ok(Json(StatusResponse::ok()))
}

pub async fn delete_list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Ids(list_id): Ids<i64>,
) -> Result<Json<StatusResponse>, ApiError> {
    blocking(move || state.db.delete_list(user_id, list_id)).await?;
    Ok(Json(StatusResponse::ok()))
}
