use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AuthUser,
    db::SearchQuery,
    error::{parse_id, AppError, AppResult, MessageBody},
    state::AppState,
    users::{
        dto::{UpdateUserRequest, UserResponse},
        repo_types::PublicUser,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users)).route(
        "/users/:id",
        get(get_user).put(update_user).delete(delete_user),
    )
}

fn not_found() -> AppError {
    AppError::not_found("User not found")
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<PublicUser>>> {
    let users = state.users.list(query.term()).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    let id = parse_id(&id, "user")?;
    let user = state.users.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller, payload), fields(caller = caller.id))]
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id(&id, "user")?;
    let Json(payload) = payload?;
    let changes = payload.into_changes()?;

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or_else(not_found)?;

    info!(user_id = id, "user updated");
    Ok(Json(UserResponse {
        message: "User updated".into(),
        user: user.into(),
    }))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    let id = parse_id(&id, "user")?;
    if !state.users.delete(id).await? {
        return Err(not_found());
    }

    info!(user_id = id, "user deleted");
    Ok(Json(MessageBody::new("User deleted")))
}
