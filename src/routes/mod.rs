//! Rutas HTTP
//!
//! Cada módulo expone un `create_*_router()` que se monta bajo `/api`.
//! Todo excepto login y registro pasa por el middleware de autenticación.

pub mod auth_routes;
pub mod client_routes;
pub mod contract_routes;
pub mod damage_report_routes;
pub mod dashboard_routes;
pub mod invoice_routes;
pub mod reservation_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    middleware, Json, Router,
};
use serde::de::DeserializeOwned;

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router de la API completa
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/users", user_routes::create_user_router())
        .nest("/vehiculos", vehicle_routes::create_vehicle_router())
        .nest("/clientes", client_routes::create_client_router())
        .nest("/reservas", reservation_routes::create_reservation_router())
        .nest("/facturas", invoice_routes::create_invoice_router())
        .nest("/contratos", contract_routes::create_contract_router())
        .nest("/mantenimiento", damage_report_routes::create_damage_report_router())
        .nest("/dashboard", dashboard_routes::create_dashboard_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/auth", auth_routes::create_auth_router(state))
        .merge(protected)
}

/// Body JSON cuyo rechazo se responde con el formato de error de la API
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Parámetro de ruta (`/:id`) con el mismo formato de error que `JsonBody`
pub struct PathParam<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Query string de filtros con el mismo formato de error que `JsonBody`
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(Self(value))
    }
}
