use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::damage_report_controller::DamageReportController;
use crate::dto::damage_report_dto::CreateDamageReportRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::damage_report::{DamageReportFilters, DamageReportResponse};
use crate::models::vehicle::VehicleResponse;
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_damage_report_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route("/:id", get(get_report).delete(delete_report))
        .route("/vehiculo/:vehicle_id", get(list_vehicle_reports))
        .route("/vehiculo/:vehicle_id/liberar", patch(release_vehicle))
}

async fn list_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<DamageReportFilters>,
) -> Result<Json<ApiResponse<Vec<DamageReportResponse>>>, AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    let reports = controller.list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(reports)))
}

async fn get_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<DamageReportResponse>>, AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    let report = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(report)))
}

async fn list_vehicle_reports(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(vehicle_id): PathParam<i64>,
) -> Result<Json<ApiResponse<Vec<DamageReportResponse>>>, AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    let reports = controller.list_for_vehicle(&auth, vehicle_id).await?;
    Ok(Json(ApiResponse::success(reports)))
}

async fn create_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateDamageReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DamageReportResponse>>), AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn release_vehicle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(vehicle_id): PathParam<i64>,
) -> Result<Json<ApiResponse<VehicleResponse>>, AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    Ok(Json(controller.release_vehicle(&auth, vehicle_id).await?))
}

async fn delete_report(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DamageReportController::new(state.pool.clone());
    controller.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Reporte eliminado exitosamente")))
}
