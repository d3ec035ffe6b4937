use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::models::vehicle::VehicleStatus;
use crate::utils::validation::PLATE_REGEX;

/// Request para crear un nuevo vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 60))]
    pub brand: String,

    #[validate(length(min = 1, max = 60))]
    pub model: String,

    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,

    #[validate(regex = "PLATE_REGEX")]
    pub plate: String,

    #[validate(length(min = 2, max = 30))]
    pub vehicle_type: String,

    pub daily_rate: Decimal,

    #[serde(default)]
    pub features: Vec<String>,
}

/// Request para actualizar un vehículo existente
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 2, max = 60))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 60))]
    pub model: Option<String>,

    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,

    #[validate(regex = "PLATE_REGEX")]
    pub plate: Option<String>,

    #[validate(length(min = 2, max = 30))]
    pub vehicle_type: Option<String>,

    pub daily_rate: Option<Decimal>,

    pub features: Option<Vec<String>>,
}

/// Request para actualizar estado del vehículo
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleStatusRequest {
    pub status: VehicleStatus,
}
