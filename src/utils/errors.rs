//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: code.to_string(),
        }
    }

    fn server_error() -> Self {
        Self::new("Server error", "Server error".to_string(), "INTERNAL_ERROR")
    }
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(e) if is_unique_violation(e) || is_foreign_key_violation(e) => {
                StatusCode::CONFLICT
            }
            AppError::Database(_) | AppError::Internal(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

/// Violación de clave única (MySQL 1062)
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

/// Violación de clave foránea (MySQL 1451/1452)
fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::Database(e) if is_unique_violation(&e) => {
                warn!("Unique constraint violated: {}", e);
                ErrorResponse::new(
                    "Conflict",
                    "El registro ya existe".to_string(),
                    "DUPLICATE_ENTRY",
                )
            }

            AppError::Database(e) if is_foreign_key_violation(&e) => {
                warn!("Foreign key constraint violated: {}", e);
                ErrorResponse::new(
                    "Conflict",
                    "El registro tiene datos relacionados".to_string(),
                    "RELATED_RECORDS",
                )
            }

            AppError::Database(e) => {
                error!("Database error: {}", e);
                ErrorResponse::server_error()
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                ErrorResponse {
                    details: Some(json!(e)),
                    ..ErrorResponse::new(
                        "Validation Error",
                        "Los datos enviados no son válidos".to_string(),
                        "VALIDATION_ERROR",
                    )
                }
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED")
            }

            AppError::Forbidden(msg) => {
                warn!("Forbidden access: {}", msg);
                ErrorResponse::new("Forbidden", msg, "FORBIDDEN")
            }

            AppError::NotFound(msg) => ErrorResponse::new("Not Found", msg, "NOT_FOUND"),

            AppError::Conflict(msg) => ErrorResponse::new("Conflict", msg, "CONFLICT"),

            AppError::BadRequest(msg) => ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                ErrorResponse::new("Unauthorized", "Token inválido o expirado".to_string(), "JWT_ERROR")
            }

            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ErrorResponse::server_error()
            }

            AppError::Hash(msg) => {
                error!("Hash error: {}", msg);
                ErrorResponse::server_error()
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} con id {} no encontrado", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} con {} '{}' ya existe", resource, field, value))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    /// Error de MySQL mínimo con el `ErrorKind` indicado
    #[derive(Debug, Error)]
    #[error("{message}")]
    struct MySqlConstraintError {
        message: String,
        kind: ErrorKind,
    }

    impl DatabaseError for MySqlConstraintError {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23000"))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.kind {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    fn constraint_error(kind: ErrorKind, message: &str) -> AppError {
        AppError::Database(sqlx::Error::Database(Box::new(MySqlConstraintError {
            message: message.to_string(),
            kind,
        })))
    }

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_conflict() {
        let error = constraint_error(
            ErrorKind::UniqueViolation,
            "Duplicate entry 'ABC-123' for key 'uq_vehicles_plate'",
        );
        assert_eq!(error.status_code(), StatusCode::CONFLICT);

        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_ENTRY");
        assert_eq!(body["message"], "El registro ya existe");
    }

    #[tokio::test]
    async fn test_foreign_key_violation_is_conflict() {
        let error = constraint_error(
            ErrorKind::ForeignKeyViolation,
            "Cannot delete or update a parent row: a foreign key constraint fails",
        );

        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "RELATED_RECORDS");
    }

    #[tokio::test]
    async fn test_other_database_errors_are_server_errors() {
        let (status, body) = body_of(constraint_error(ErrorKind::Other, "Deadlock found")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL_ERROR");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Jwt("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(not_found_error("Vehículo", 7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(conflict_error("Vehículo", "placa", "ABC-123").status_code(), StatusCode::CONFLICT);
        assert_eq!(bad_request_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response = AppError::Internal("pool exhausted".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Server error");
        assert!(!bytes.windows(4).any(|w| w == b"pool"));
    }

    #[test]
    fn test_not_found_message() {
        match not_found_error("Cliente", 3) {
            AppError::NotFound(msg) => assert_eq!(msg, "Cliente con id 3 no encontrado"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
