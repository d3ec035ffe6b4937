//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado operativo.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

use crate::models::text_enum;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

text_enum!(VehicleStatus, "vehicle_status", {
    Available => "available",
    Reserved => "reserved",
    Rented => "rented",
    Maintenance => "maintenance",
});

impl VehicleStatus {
    /// Un vehículo en taller no acepta nuevas reservas
    pub fn accepts_reservations(&self) -> bool {
        !matches!(self, VehicleStatus::Maintenance)
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub vehicle_type: String,
    pub daily_rate: Decimal,
    #[sqlx(try_from = "String")]
    pub status: VehicleStatus,
    pub features: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response de vehículo para la API
#[derive(Debug, Clone, Serialize)]
pub struct VehicleResponse {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub vehicle_type: String,
    pub daily_rate: Decimal,
    pub status: VehicleStatus,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            brand: vehicle.brand,
            model: vehicle.model,
            year: vehicle.year,
            plate: vehicle.plate,
            vehicle_type: vehicle.vehicle_type,
            daily_rate: vehicle.daily_rate,
            status: vehicle.status,
            features: vehicle.features.0,
            created_at: vehicle.created_at,
            updated_at: vehicle.updated_at,
        }
    }
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
    pub vehicle_type: Option<String>,
    pub brand: Option<String>,
}

/// Rango de fechas para consultar disponibilidad
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
