//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un solo
//! recurso: autenticación, tokens JWT y cálculos de facturación.

pub mod auth_service;
pub mod billing_service;
pub mod jwt_service;

pub use auth_service::AuthService;
pub use jwt_service::JwtService;
