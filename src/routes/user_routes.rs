use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UpdateUserStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{UserFilters, UserResponse};
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/status", patch(update_user_status))
}

async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<UserFilters>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let users = controller.list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(users)))
}

async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(user)))
}

async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.update(&auth, id, request).await?;
    Ok(Json(response))
}

async fn update_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateUserStatusRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let response = controller.update_status(&auth, id, request).await?;
    Ok(Json(response))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = UserController::new(state.pool.clone());
    controller.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Usuario eliminado exitosamente")))
}
