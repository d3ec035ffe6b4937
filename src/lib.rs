//! Car Rental API
//!
//! Backend del CRM de renta de autos y del portal de clientes.

pub mod app;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use app::create_app;
pub use state::AppState;
