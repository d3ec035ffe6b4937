use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::reservation_controller::ReservationController;
use crate::dto::reservation_dto::CreateReservationRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::reservation::{Reservation, ReservationDetail, ReservationFilters};
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/:id", get(get_reservation).delete(delete_reservation))
        .route("/:id/approve", patch(approve_reservation))
        .route("/:id/reject", patch(reject_reservation))
        .route("/:id/cancel", patch(cancel_reservation))
        .route("/:id/complete", patch(complete_reservation))
}

type ReservationResult = Result<Json<ApiResponse<Reservation>>, AppError>;

async fn list_reservations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<ReservationFilters>,
) -> Result<Json<ApiResponse<Vec<ReservationDetail>>>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    let reservations = controller.list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(reservations)))
}

async fn get_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ReservationResult {
    let controller = ReservationController::new(state.pool.clone());
    let reservation = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(reservation)))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), AppError> {
    let controller = ReservationController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn approve_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ReservationResult {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.approve(&auth, id).await?))
}

async fn reject_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ReservationResult {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.reject(&auth, id).await?))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ReservationResult {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.cancel(&auth, id).await?))
}

async fn complete_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ReservationResult {
    let controller = ReservationController::new(state.pool.clone());
    Ok(Json(controller.complete(&auth, id).await?))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = ReservationController::new(state.pool.clone());
    controller.delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Reserva eliminada exitosamente")))
}
