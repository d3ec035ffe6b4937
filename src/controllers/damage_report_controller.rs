use rust_decimal::Decimal;
use sqlx::MySqlPool;
use tracing::{info, warn};
use validator::Validate;

use crate::dto::damage_report_dto::CreateDamageReportRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::damage_report::{
    requires_maintenance, total_estimate, DamageItem, DamageReportFilters, DamageReportResponse,
    MAX_AMOUNT,
};
use crate::models::role::{Action, Module};
use crate::models::vehicle::{Vehicle, VehicleResponse, VehicleStatus};
use crate::repositories::damage_report_repository::{DamageReportRepository, NewDamageReport};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

pub struct DamageReportController {
    reports: DamageReportRepository,
    vehicles: VehicleRepository,
}

impl DamageReportController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            reports: DamageReportRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        auth: &AuthenticatedUser,
        filters: DamageReportFilters,
    ) -> AppResult<Vec<DamageReportResponse>> {
        auth.require(Module::Mantenimiento, Action::View)?;

        let reports = self.reports.list(&filters).await?;
        Ok(reports.into_iter().map(DamageReportResponse::from).collect())
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<DamageReportResponse> {
        auth.require(Module::Mantenimiento, Action::View)?;

        self.reports
            .find_by_id(id)
            .await?
            .map(DamageReportResponse::from)
            .ok_or_else(|| not_found_error("Reporte de daños", id))
    }

    /// Historial de daños de un vehículo
    pub async fn list_for_vehicle(
        &self,
        auth: &AuthenticatedUser,
        vehicle_id: i64,
    ) -> AppResult<Vec<DamageReportResponse>> {
        auth.require(Module::Mantenimiento, Action::View)?;

        self.find_vehicle(vehicle_id).await?;
        let filters = DamageReportFilters {
            vehicle_id: Some(vehicle_id),
        };
        let reports = self.reports.list(&filters).await?;
        Ok(reports.into_iter().map(DamageReportResponse::from).collect())
    }

    /// Registra la inspección; un daño severo manda el vehículo a taller
    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateDamageReportRequest,
    ) -> AppResult<ApiResponse<DamageReportResponse>> {
        auth.require(Module::Mantenimiento, Action::Create)?;
        request.validate()?;
        validate_items(&request.items)?;
        let estimate = total_estimate(&request.items)
            .ok_or_else(|| bad_request_error("El total estimado excede el máximo permitido"))?;

        let vehicle = self.find_vehicle(request.vehicle_id).await?;
        let send_to_maintenance = requires_maintenance(&request.items);

        let report = self
            .reports
            .create(
                NewDamageReport {
                    vehicle_id: vehicle.id,
                    client_id: request.client_id,
                    reservation_id: request.reservation_id,
                    total_estimate: estimate,
                    items: request.items,
                    notes: request.notes,
                    reported_by: Some(auth.user_id),
                },
                send_to_maintenance,
            )
            .await?;

        if send_to_maintenance {
            warn!("🔧 Vehículo {} enviado a mantenimiento por daño severo", vehicle.plate);
        }
        info!(
            "🔍 Reporte {} del vehículo {}: estimado {}",
            report.id, vehicle.plate, report.total_estimate
        );
        Ok(ApiResponse::success_with_message(report.into(), "Reporte registrado exitosamente"))
    }

    /// maintenance → available
    pub async fn release_vehicle(
        &self,
        auth: &AuthenticatedUser,
        vehicle_id: i64,
    ) -> AppResult<ApiResponse<VehicleResponse>> {
        auth.require(Module::Mantenimiento, Action::Edit)?;

        let vehicle = self.find_vehicle(vehicle_id).await?;
        if vehicle.status != VehicleStatus::Maintenance {
            return Err(AppError::Conflict(format!(
                "El vehículo {} no está en mantenimiento (estado actual: {})",
                vehicle.plate, vehicle.status
            )));
        }

        let released = self
            .vehicles
            .update_status(vehicle.id, VehicleStatus::Available)
            .await?;

        info!("🔧 Vehículo {} liberado de mantenimiento", released.plate);
        Ok(ApiResponse::success_with_message(released.into(), "Vehículo liberado"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Mantenimiento, Action::Delete)?;

        if !self.reports.delete(id).await? {
            return Err(not_found_error("Reporte de daños", id));
        }
        info!("🗑️ Reporte {} eliminado por {}", id, auth.email);
        Ok(())
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", id))
    }
}

fn validate_items(items: &[DamageItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(bad_request_error("El reporte requiere al menos un daño"));
    }
    if let Some(item) = items.iter().find(|item| item.cost < Decimal::ZERO) {
        return Err(AppError::BadRequest(format!(
            "El costo del daño en '{}' no puede ser negativo",
            item.area
        )));
    }
    if let Some(item) = items.iter().find(|item| item.cost > MAX_AMOUNT) {
        return Err(AppError::BadRequest(format!(
            "El costo del daño en '{}' excede el máximo de {}",
            item.area, MAX_AMOUNT
        )));
    }
    if items.iter().any(|item| item.area.trim().is_empty()) {
        return Err(bad_request_error("Cada daño debe indicar el área afectada"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::damage_report::DamageSeverity;

    fn item(area: &str, cost: Decimal) -> DamageItem {
        DamageItem {
            area: area.to_string(),
            description: "Rayón".to_string(),
            severity: DamageSeverity::Minor,
            cost,
        }
    }

    #[test]
    fn test_items_are_required() {
        assert!(validate_items(&[]).is_err());
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        let items = vec![item("Puerta", Decimal::new(1500, 0)), item("Cofre", Decimal::new(-1, 0))];
        match validate_items(&items) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("Cofre")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cost_above_column_limit_is_rejected() {
        let items = vec![item("Techo", Decimal::MAX), item("Salpicadera", Decimal::ONE)];
        match validate_items(&items) {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("Techo")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(validate_items(&[item("Techo", MAX_AMOUNT)]).is_ok());
    }

    #[test]
    fn test_zero_cost_is_allowed() {
        assert!(validate_items(&[item("Espejo", Decimal::ZERO)]).is_ok());
    }
}
