use serde::Deserialize;
use validator::Validate;

use crate::models::client::ClientStatus;
use crate::utils::validation::PHONE_REGEX;

/// Request para registrar un cliente desde el CRM
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: String,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(max = 60))]
    pub country: Option<String>,

    pub status: Option<ClientStatus>,
}

/// Request para actualizar un cliente
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: Option<String>,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(max = 60))]
    pub country: Option<String>,

    pub status: Option<ClientStatus>,
}
