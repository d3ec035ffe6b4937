use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::models::role::{Module, ModulePermissions, Role};
use crate::models::user::UserResponse;
use crate::utils::validation::PHONE_REGEX;

// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

// Registro desde el portal de clientes
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 100))]
    pub password: String,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: String,

    #[validate(length(max = 100))]
    pub company: Option<String>,

    #[validate(length(max = 60))]
    pub country: Option<String>,
}

// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

// Actualización del perfil propio
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    #[validate(regex = "PHONE_REGEX")]
    pub phone: Option<String>,

    #[validate(length(min = 8, max = 100))]
    pub password: Option<String>,
}

// Matriz de permisos del rol autenticado
#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub role: Role,
    pub permissions: BTreeMap<Module, ModulePermissions>,
}

impl From<Role> for PermissionsResponse {
    fn from(role: Role) -> Self {
        Self {
            role,
            permissions: role.permission_matrix(),
        }
    }
}
