//! Controllers
//!
//! Reglas de negocio por recurso. Cada controller verifica permisos,
//! valida la entrada y coordina los repositories.

pub mod client_controller;
pub mod contract_controller;
pub mod damage_report_controller;
pub mod dashboard_controller;
pub mod invoice_controller;
pub mod reservation_controller;
pub mod user_controller;
pub mod vehicle_controller;

use crate::middleware::auth::AuthenticatedUser;
use crate::repositories::client_repository::ClientRepository;
use crate::utils::errors::{AppError, AppResult};

/// Cliente al que queda limitado el usuario.
/// El personal ve todo (`None`); un CLIENTE solo su propio registro.
pub(crate) async fn client_scope(
    clients: &ClientRepository,
    user: &AuthenticatedUser,
) -> AppResult<Option<i64>> {
    if user.is_staff() {
        return Ok(None);
    }

    let client = clients
        .find_by_user_id(user.user_id)
        .await?
        .ok_or_else(|| AppError::Forbidden("La cuenta no tiene un cliente asociado".to_string()))?;

    Ok(Some(client.id))
}

/// Un recurso fuera del alcance del cliente se reporta como inexistente
pub(crate) fn ensure_in_scope(scope: Option<i64>, owner_client_id: i64, not_found: AppError) -> AppResult<()> {
    match scope {
        Some(client_id) if client_id != owner_client_id => Err(not_found),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_scope_sees_everything() {
        assert!(ensure_in_scope(None, 9, AppError::NotFound("x".into())).is_ok());
    }

    #[test]
    fn test_client_scope_hides_foreign_records() {
        assert!(ensure_in_scope(Some(9), 9, AppError::NotFound("x".into())).is_ok());
        assert!(matches!(
            ensure_in_scope(Some(9), 4, AppError::NotFound("x".into())),
            Err(AppError::NotFound(_))
        ));
    }
}
