use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};

use crate::dto::auth_dto::{LoginRequest, LoginResponse, PermissionsResponse, RegisterRequest, UpdateProfileRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::user::UserResponse;
use crate::routes::JsonBody;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación; login y registro son públicos
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/permissions", get(permissions))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .merge(protected)
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), state.jwt.clone())
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let response = auth_service(&state).login(request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), AppError> {
    let response = auth_service(&state).register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Cuenta creada exitosamente")),
    ))
}

async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service(&state).me(&auth).await?;
    Ok(Json(ApiResponse::success(user)))
}

async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service(&state).update_profile(&auth, request).await?;
    Ok(Json(ApiResponse::success_with_message(user, "Perfil actualizado exitosamente")))
}

/// Matriz de permisos del rol autenticado; el frontend arma el menú con ella
async fn permissions(Extension(auth): Extension<AuthenticatedUser>) -> Json<ApiResponse<PermissionsResponse>> {
    Json(ApiResponse::success(PermissionsResponse::from(auth.role)))
}
