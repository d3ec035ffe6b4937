use serde::Deserialize;
use validator::Validate;

/// Request para generar el contrato de una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContractRequest {
    pub reservation_id: i64,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub terms: Vec<String>,
}

/// Firma del contrato desde el portal o el mostrador
#[derive(Debug, Deserialize, Validate)]
pub struct SignContractRequest {
    #[validate(length(min = 1))]
    pub accepted_terms: Vec<String>,

    #[validate(length(min = 1))]
    pub client_signature: String,

    pub company_signature: Option<String>,
}
