use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::client_controller::ClientController;
use crate::dto::client_dto::{CreateClientRequest, UpdateClientRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::{Client, ClientFilters};
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_client_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route("/:id", get(get_client).put(update_client).delete(delete_client))
        .route("/:id/approve", patch(approve_client))
}

async fn list_clients(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<ClientFilters>,
) -> Result<Json<ApiResponse<Vec<Client>>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    let clients = controller.list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(clients)))
}

async fn get_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    let client = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(client)))
}

async fn create_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), AppError> {
    let controller = ClientController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateClientRequest>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    let response = controller.update(&auth, id, request).await?;
    Ok(Json(response))
}

async fn approve_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<Client>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    let response = controller.approve(&auth, id).await?;
    Ok(Json(response))
}

async fn delete_client(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ClientController::new(state.pool.clone());
    controller.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Cliente eliminado exitosamente")))
}
