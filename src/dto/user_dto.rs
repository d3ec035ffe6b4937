use serde::Deserialize;
use validator::Validate;

use crate::models::role::Role;
use crate::models::user::UserStatus;
use crate::utils::validation::PHONE_REGEX;

/// Request para crear un nuevo usuario
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 100))]
    pub password: String,

    pub role: Role,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: Option<String>,
}

/// Request para actualizar un usuario existente
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,

    pub role: Option<Role>,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: Option<String>,
}

/// Request para activar o desactivar una cuenta
#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}
