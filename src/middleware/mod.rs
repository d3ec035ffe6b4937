//! Middleware del sistema
//!
//! Este módulo contiene el middleware de autenticación y CORS.

pub mod auth;
pub mod cors;

pub use auth::{auth_middleware, AuthenticatedUser};
pub use cors::cors_layer;
