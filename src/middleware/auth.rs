//! Middleware de autenticación JWT
//!
//! Este módulo maneja la extracción y verificación del token Bearer
//! y expone el usuario autenticado a los handlers.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    models::role::{Action, Module, Role},
    services::jwt_service::extract_bearer_token,
    state::AppState,
    utils::errors::AppError,
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Exige el permiso `action` sobre `module` según la tabla de roles
    pub fn require(&self, module: Module, action: Action) -> Result<(), AppError> {
        if self.role.can(module, action) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "El rol {} no puede {} en {}",
                self.role, action, module
            )))
        }
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_bearer_token(auth_header)?;
    let claims = state.jwt.validate_token(token)?;

    let authenticated_user = AuthenticatedUser {
        user_id: claims.user_id()?,
        email: claims.email,
        role: claims.role,
    };

    tracing::debug!(
        user_id = authenticated_user.user_id,
        role = %authenticated_user.role,
        "request autenticada"
    );

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: 1,
            email: "test@rentacar.mx".to_string(),
            role,
        }
    }

    #[test]
    fn test_require_follows_role_table() {
        assert!(user(Role::Admin).require(Module::Usuarios, Action::Delete).is_ok());
        assert!(user(Role::Operador).require(Module::Reservas, Action::Create).is_ok());

        match user(Role::Operador).require(Module::Reservas, Action::Approve) {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "El rol OPERADOR no puede approve en reservas"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cliente_is_not_staff() {
        assert!(!user(Role::Cliente).is_staff());
        assert!(user(Role::Operador).is_staff());
    }
}
