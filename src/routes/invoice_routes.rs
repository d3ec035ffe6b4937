use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{CreateInvoiceRequest, UpdateInvoiceStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::invoice::{Invoice, InvoiceFilters};
use crate::routes::{JsonBody, PathParam, QueryParams};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice).delete(delete_invoice))
        .route("/:id/status", patch(update_invoice_status))
}

fn controller(state: &AppState) -> InvoiceController {
    InvoiceController::new(state.pool.clone(), &state.config)
}

async fn list_invoices(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    QueryParams(filters): QueryParams<InvoiceFilters>,
) -> Result<Json<ApiResponse<Vec<Invoice>>>, AppError> {
    let invoices = controller(&state).list(&auth, filters).await?;
    Ok(Json(ApiResponse::success(invoices)))
}

async fn get_invoice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let invoice = controller(&state).get(&auth, id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

async fn create_invoice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Invoice>>), AppError> {
    let response = controller(&state).create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_invoice_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<UpdateInvoiceStatusRequest>,
) -> Result<Json<ApiResponse<Invoice>>, AppError> {
    let response = controller(&state).update_status(&auth, id, request).await?;
    Ok(Json(response))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    controller(&state).delete(&auth, id).await?;
    Ok(Json(ApiResponse::message("Factura eliminada exitosamente")))
}
