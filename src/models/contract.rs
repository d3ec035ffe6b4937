//! Modelo de Contract
//!
//! Contrato de renta asociado a una reserva confirmada, con los términos
//! aceptados y las firmas capturadas en el portal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

use crate::models::text_enum;

/// Estado del contrato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Draft,
    Active,
    Completed,
    Terminated,
}

text_enum!(ContractStatus, "contract_status", {
    Draft => "draft",
    Active => "active",
    Completed => "completed",
    Terminated => "terminated",
});

impl ContractStatus {
    pub fn can_transition_to(self, next: ContractStatus) -> bool {
        use ContractStatus::*;

        matches!(
            (self, next),
            (Draft, Active) | (Draft, Terminated) | (Active, Completed) | (Active, Terminated)
        )
    }
}

/// Términos estándar cuando el contrato se crea sin términos propios
pub const DEFAULT_TERMS: &[&str] = &[
    "El arrendatario devolverá el vehículo en la fecha y hora pactadas.",
    "El vehículo se entrega con el tanque lleno y debe devolverse igual.",
    "Los daños no reportados al momento de la entrega serán cobrados al arrendatario.",
    "Queda prohibido fumar y transportar mascotas dentro del vehículo.",
    "El arrendatario es responsable de las multas de tránsito durante la renta.",
];

/// Contract - mapea exactamente a la tabla contracts
#[derive(Debug, Clone, FromRow)]
pub struct Contract {
    pub id: i64,
    pub reservation_id: i64,
    pub terms: Json<Vec<String>>,
    pub client_signature: Option<String>,
    pub company_signature: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContractStatus,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Términos que faltan en la lista aceptada por el cliente
    pub fn missing_terms<'a>(&'a self, accepted: &[String]) -> Vec<&'a str> {
        self.terms
            .0
            .iter()
            .filter(|term| !accepted.contains(term))
            .map(String::as_str)
            .collect()
    }
}

/// Response de contrato para la API
#[derive(Debug, Clone, Serialize)]
pub struct ContractResponse {
    pub id: i64,
    pub reservation_id: i64,
    pub terms: Vec<String>,
    pub client_signature: Option<String>,
    pub company_signature: Option<String>,
    pub status: ContractStatus,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            reservation_id: contract.reservation_id,
            terms: contract.terms.0,
            client_signature: contract.client_signature,
            company_signature: contract.company_signature,
            status: contract.status,
            signed_at: contract.signed_at,
            created_at: contract.created_at,
            updated_at: contract.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(terms: &[&str]) -> Contract {
        Contract {
            id: 1,
            reservation_id: 10,
            terms: Json(terms.iter().map(|t| t.to_string()).collect()),
            client_signature: None,
            company_signature: None,
            status: ContractStatus::Draft,
            signed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_terms() {
        let contract = contract(&["a", "b", "c"]);
        assert_eq!(contract.missing_terms(&["a".into(), "c".into()]), vec!["b"]);
        assert!(contract
            .missing_terms(&["c".into(), "b".into(), "a".into()])
            .is_empty());
    }

    #[test]
    fn test_transitions() {
        use ContractStatus::*;
        assert!(Draft.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        assert!(Active.can_transition_to(Terminated));
        assert!(!Draft.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Terminated));
        assert!(!Terminated.can_transition_to(Active));
    }
}
