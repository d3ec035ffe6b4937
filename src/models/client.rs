//! Modelo de Client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{role::Role, text_enum};

/// Estado del cliente en el CRM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Inactive,
    Pending,
}

text_enum!(ClientStatus, "client_status", {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
});

impl ClientStatus {
    /// Estado inicial de un cliente según quién lo registra.
    /// Los operadores no pueden dar de alta clientes activos.
    pub fn initial_for(creator: Role, requested: Option<ClientStatus>) -> ClientStatus {
        match creator {
            Role::Operador => ClientStatus::Pending,
            _ => requested.unwrap_or(ClientStatus::Active),
        }
    }
}

/// Client - mapea exactamente a la tabla clients
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub country: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ClientStatus,
    pub created_by: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filtros para búsqueda de clientes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientFilters {
    pub status: Option<ClientStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operador_clients_are_always_pending() {
        for requested in [None, Some(ClientStatus::Active), Some(ClientStatus::Inactive)] {
            assert_eq!(ClientStatus::initial_for(Role::Operador, requested), ClientStatus::Pending);
        }
    }

    #[test]
    fn test_admin_chooses_status() {
        assert_eq!(ClientStatus::initial_for(Role::Admin, None), ClientStatus::Active);
        assert_eq!(
            ClientStatus::initial_for(Role::SuperAdmin, Some(ClientStatus::Pending)),
            ClientStatus::Pending
        );
    }
}
