use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};

use crate::controllers::contract_controller::ContractController;
use crate::dto::contract_dto::{CreateContractRequest, SignContractRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::contract::ContractResponse;
use crate::routes::{JsonBody, PathParam};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_contract_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contracts).post(create_contract))
        .route("/:id", get(get_contract))
        .route("/:id/sign", post(sign_contract))
        .route("/:id/complete", patch(complete_contract))
        .route("/:id/terminate", patch(terminate_contract))
}

type ContractResult = Result<Json<ApiResponse<ContractResponse>>, AppError>;

async fn list_contracts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<ContractResponse>>>, AppError> {
    let controller = ContractController::new(state.pool.clone());
    let contracts = controller.list(&auth).await?;
    Ok(Json(ApiResponse::success(contracts)))
}

async fn get_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ContractResult {
    let controller = ContractController::new(state.pool.clone());
    let contract = controller.get(&auth, id).await?;
    Ok(Json(ApiResponse::success(contract)))
}

async fn create_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<CreateContractRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContractResponse>>), AppError> {
    let controller = ContractController::new(state.pool.clone());
    let response = controller.create(&auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn sign_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
    JsonBody(request): JsonBody<SignContractRequest>,
) -> ContractResult {
    let controller = ContractController::new(state.pool.clone());
    Ok(Json(controller.sign(&auth, id, request).await?))
}

async fn complete_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ContractResult {
    let controller = ContractController::new(state.pool.clone());
    Ok(Json(controller.complete(&auth, id).await?))
}

async fn terminate_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    PathParam(id): PathParam<i64>,
) -> ContractResult {
    let controller = ContractController::new(state.pool.clone());
    Ok(Json(controller.terminate(&auth, id).await?))
}
