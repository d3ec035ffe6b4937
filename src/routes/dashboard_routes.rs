use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::dashboard::DashboardStats;
use crate::models::reservation::ReservationDetail;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/recientes", get(recent_reservations))
}

async fn get_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let stats = controller.stats(&auth).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn recent_reservations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<ReservationDetail>>>, AppError> {
    let controller = DashboardController::new(state.pool.clone());
    let reservations = controller.recent_reservations(&auth).await?;
    Ok(Json(ApiResponse::success(reservations)))
}
