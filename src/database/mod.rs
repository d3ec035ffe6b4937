//! Módulo de base de datos
//!
//! Maneja la conexión y migraciones de MySQL

pub mod connection;

pub use connection::DatabaseConnection;
