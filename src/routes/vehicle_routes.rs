use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, UpdateVehicleStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::vehicle::{AvailabilityQuery, VehicleFilters, VehicleResponse};
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/disponibles", get(available_vehicles))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/status", patch(update_vehicle_status))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<VehicleFilters>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicles = controller.list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn available_vehicles(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(query): QueryParams<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<VehicleResponse>>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicles = controller.available(&auth, query).await?;
    Ok(Json(ApiResponse::success(vehicles)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(vehicle)))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleResponse>>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update(&auth, id, request).await?;
    Ok(Json(response))
}

async fn update_vehicle_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateVehicleStatusRequest>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let response = controller.update_status(&auth, id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Vehículo eliminado exitosamente")))
}
