//! Repositorios
//!
//! Acceso a MySQL por entidad. Las transiciones que tocan más de una
//! tabla se ejecutan dentro de una transacción.

pub mod client_repository;
pub mod contract_repository;
pub mod damage_report_repository;
pub mod dashboard_repository;
pub mod invoice_repository;
pub mod reservation_repository;
pub mod user_repository;
pub mod vehicle_repository;
