use rust_decimal::Decimal;
use sqlx::{types::Json, MySqlPool};
use tracing::info;
use validator::Validate;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, UpdateVehicleStatusRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::role::{Action, Module};
use crate::models::vehicle::{AvailabilityQuery, Vehicle, VehicleFilters, VehicleResponse};
use crate::repositories::vehicle_repository::{NewVehicle, VehicleRepository};
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{normalize_plate, validate_date_range};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn list(&self, auth: &AuthenticatedUser, filters: VehicleFilters) -> AppResult<Vec<VehicleResponse>> {
        auth.require(Module::Vehiculos, Action::View)?;

        let vehicles = self.repository.list(&filters).await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    /// Vehículos disponibles y sin reservas activas en el rango
    pub async fn available(
        &self,
        auth: &AuthenticatedUser,
        query: AvailabilityQuery,
    ) -> AppResult<Vec<VehicleResponse>> {
        auth.require(Module::Vehiculos, Action::View)?;
        validate_date_range(query.start_date, query.end_date)?;

        let vehicles = self
            .repository
            .find_available(query.start_date, query.end_date)
            .await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<VehicleResponse> {
        auth.require(Module::Vehiculos, Action::View)?;

        Ok(self.find(id).await?.into())
    }

    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        auth.require(Module::Vehiculos, Action::Create)?;
        request.validate()?;
        ensure_positive_rate(request.daily_rate)?;

        // Verificar que la placa no exista
        let plate = normalize_plate(&request.plate);
        if self.repository.plate_exists(&plate, None).await? {
            return Err(conflict_error("Vehículo", "placa", &plate));
        }

        let vehicle = self
            .repository
            .create(NewVehicle {
                brand: request.brand.trim().to_string(),
                model: request.model.trim().to_string(),
                year: request.year,
                plate,
                vehicle_type: request.vehicle_type.trim().to_lowercase(),
                daily_rate: request.daily_rate,
                features: request.features,
            })
            .await?;

        info!("🚗 Vehículo {} registrado por {}", vehicle.plate, auth.email);
        Ok(ApiResponse::success_with_message(vehicle.into(), "Vehículo creado exitosamente"))
    }

    pub async fn update(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateVehicleRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        auth.require(Module::Vehiculos, Action::Edit)?;
        request.validate()?;

        let mut vehicle = self.find(id).await?;

        if let Some(plate) = request.plate {
            let plate = normalize_plate(&plate);
            if self.repository.plate_exists(&plate, Some(id)).await? {
                return Err(conflict_error("Vehículo", "placa", &plate));
            }
            vehicle.plate = plate;
        }
        if let Some(daily_rate) = request.daily_rate {
            ensure_positive_rate(daily_rate)?;
            vehicle.daily_rate = daily_rate;
        }
        if let Some(brand) = request.brand {
            vehicle.brand = brand.trim().to_string();
        }
        if let Some(model) = request.model {
            vehicle.model = model.trim().to_string();
        }
        if let Some(year) = request.year {
            vehicle.year = year;
        }
        if let Some(vehicle_type) = request.vehicle_type {
            vehicle.vehicle_type = vehicle_type.trim().to_lowercase();
        }
        if let Some(features) = request.features {
            vehicle.features = Json(features);
        }

        let vehicle = self.repository.save(&vehicle).await?;
        Ok(ApiResponse::success_with_message(vehicle.into(), "Vehículo actualizado exitosamente"))
    }

    pub async fn update_status(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: UpdateVehicleStatusRequest,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        auth.require(Module::Vehiculos, Action::Edit)?;

        let vehicle = self.find(id).await?;
        let updated = self.repository.update_status(vehicle.id, request.status).await?;

        info!("🚗 Vehículo {}: {} → {}", updated.plate, vehicle.status, updated.status);
        Ok(ApiResponse::success_with_message(updated.into(), "Estado actualizado exitosamente"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Vehiculos, Action::Delete)?;

        let vehicle = self.find(id).await?;
        if self.repository.count_active_reservations(id).await? > 0 {
            return Err(AppError::Conflict(format!(
                "El vehículo {} tiene reservas pendientes o confirmadas",
                vehicle.plate
            )));
        }

        self.repository.delete(id).await?;
        info!("🗑️ Vehículo {} eliminado por {}", vehicle.plate, auth.email);
        Ok(())
    }

    async fn find(&self, id: i64) -> AppResult<Vehicle> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", id))
    }
}

fn ensure_positive_rate(daily_rate: Decimal) -> AppResult<()> {
    if daily_rate <= Decimal::ZERO {
        return Err(bad_request_error("La tarifa diaria debe ser mayor a cero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_rate_must_be_positive() {
        assert!(ensure_positive_rate(Decimal::new(85_000, 2)).is_ok());
        assert!(ensure_positive_rate(Decimal::ZERO).is_err());
        assert!(ensure_positive_rate(Decimal::new(-1, 0)).is_err());
    }
}
