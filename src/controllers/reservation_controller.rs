use sqlx::MySqlPool;
use tracing::{info, warn};
use validator::Validate;

use crate::controllers::{client_scope, ensure_in_scope};
use crate::dto::reservation_dto::CreateReservationRequest;
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::client::ClientStatus;
use crate::models::reservation::{Reservation, ReservationDetail, ReservationFilters, ReservationStatus};
use crate::models::role::{Action, Module, Role};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::reservation_repository::{NewReservation, ReservationRepository, StatusChange};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::billing_service::{rental_days, reservation_total};
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::validate_date_range;

pub struct ReservationController {
    reservations: ReservationRepository,
    vehicles: VehicleRepository,
    clients: ClientRepository,
}

impl ReservationController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        auth: &AuthenticatedUser,
        filters: ReservationFilters,
    ) -> AppResult<Vec<ReservationDetail>> {
        auth.require(Module::Reservas, Action::View)?;

        let scope = client_scope(&self.clients, auth).await?;
        self.reservations.list(&filters, scope).await
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<Reservation> {
        auth.require(Module::Reservas, Action::View)?;

        let reservation = self.find(id).await?;
        let scope = client_scope(&self.clients, auth).await?;
        ensure_in_scope(scope, reservation.client_id, not_found_error("Reserva", id))?;

        Ok(reservation)
    }

    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateReservationRequest,
    ) -> AppResult<ApiResponse<Reservation>> {
        auth.require(Module::Reservas, Action::Create)?;
        request.validate()?;
        validate_date_range(request.start_date, request.end_date)?;

        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", request.vehicle_id))?;

        ensure_vehicle_accepts_reservations(&vehicle)?;

        let client_id = match client_scope(&self.clients, auth).await? {
            Some(own_client_id) => own_client_id,
            None => {
                let client_id = request
                    .client_id
                    .ok_or_else(|| bad_request_error("client_id es requerido"))?;
                let client = self
                    .clients
                    .find_by_id(client_id)
                    .await?
                    .ok_or_else(|| not_found_error("Cliente", client_id))?;
                if client.status == ClientStatus::Inactive {
                    return Err(AppError::Conflict(format!("El cliente {} está inactivo", client.name)));
                }
                client.id
            }
        };

        // El traslape con reservas pendientes o confirmadas se valida al insertar
        let days = rental_days(request.start_date, request.end_date);
        let reservation = self
            .reservations
            .create(NewReservation {
                client_id,
                vehicle_id: vehicle.id,
                start_date: request.start_date,
                end_date: request.end_date,
                days: i32::try_from(days).map_err(|_| bad_request_error("Rango de fechas demasiado largo"))?,
                daily_rate: vehicle.daily_rate,
                total_amount: reservation_total(days, vehicle.daily_rate),
                notes: request.notes,
            })
            .await?;

        info!(
            "📅 Reserva {} creada: vehículo {} del {} al {} ({} días, total {})",
            reservation.id, vehicle.plate, reservation.start_date, reservation.end_date, reservation.days,
            reservation.total_amount
        );
        Ok(ApiResponse::success_with_message(reservation, "Reserva creada exitosamente"))
    }

    /// pending → confirmed; el vehículo queda reservado
    pub async fn approve(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<Reservation>> {
        auth.require(Module::Reservas, Action::Approve)?;

        let reservation = self.find(id).await?;
        let vehicle = self
            .vehicles
            .find_by_id(reservation.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehículo", reservation.vehicle_id))?;
        ensure_vehicle_accepts_reservations(&vehicle)?;

        let updated = self
            .transition(
                &reservation,
                ReservationStatus::Confirmed,
                Some(auth.user_id),
                Some(VehicleStatus::Reserved),
            )
            .await?;

        info!("✅ Reserva {} aprobada por {}", id, auth.email);
        Ok(ApiResponse::success_with_message(updated, "Reserva aprobada exitosamente"))
    }

    pub async fn reject(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<Reservation>> {
        auth.require(Module::Reservas, Action::Approve)?;

        let reservation = self.find(id).await?;
        let updated = self
            .transition(&reservation, ReservationStatus::Rejected, None, None)
            .await?;

        info!("⛔ Reserva {} rechazada por {}", id, auth.email);
        Ok(ApiResponse::success_with_message(updated, "Reserva rechazada"))
    }

    /// Cancelación por el personal o por el cliente dueño mientras siga pendiente
    pub async fn cancel(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<Reservation>> {
        let reservation = self.find(id).await?;

        if !auth.role.can(Module::Reservas, Action::Edit) {
            if auth.role != Role::Cliente {
                auth.require(Module::Reservas, Action::Edit)?;
            }
            let scope = client_scope(&self.clients, auth).await?;
            ensure_in_scope(scope, reservation.client_id, not_found_error("Reserva", id))?;
            if reservation.status != ReservationStatus::Pending {
                return Err(AppError::Forbidden(
                    "Solo puedes cancelar reservas pendientes".to_string(),
                ));
            }
        }

        let vehicle_status = match reservation.status {
            ReservationStatus::Confirmed => {
                let vehicle = self.vehicles.find_by_id(reservation.vehicle_id).await?;
                vehicle
                    .filter(|v| v.status == VehicleStatus::Reserved)
                    .map(|_| VehicleStatus::Available)
            }
            _ => None,
        };

        let updated = self
            .transition(&reservation, ReservationStatus::Cancelled, None, vehicle_status)
            .await?;

        info!("🚫 Reserva {} cancelada por {}", id, auth.email);
        Ok(ApiResponse::success_with_message(updated, "Reserva cancelada"))
    }

    /// confirmed → completed; el vehículo vuelve a estar disponible
    pub async fn complete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<Reservation>> {
        auth.require(Module::Reservas, Action::Edit)?;

        let reservation = self.find(id).await?;
        let updated = self
            .transition(
                &reservation,
                ReservationStatus::Completed,
                None,
                Some(VehicleStatus::Available),
            )
            .await?;

        info!("🏁 Reserva {} completada", id);
        Ok(ApiResponse::success_with_message(updated, "Reserva completada"))
    }

    pub async fn delete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<()> {
        auth.require(Module::Reservas, Action::Delete)?;

        let reservation = self.find(id).await?;
        if reservation.status == ReservationStatus::Confirmed {
            warn!("🗑️ Eliminando reserva confirmada {}; se libera el vehículo {}", id, reservation.vehicle_id);
        }

        self.reservations.delete(&reservation).await?;
        info!("🗑️ Reserva {} eliminada por {}", id, auth.email);
        Ok(())
    }

    async fn transition(
        &self,
        reservation: &Reservation,
        to: ReservationStatus,
        approved_by: Option<i64>,
        vehicle_status: Option<VehicleStatus>,
    ) -> AppResult<Reservation> {
        if !reservation.status.can_transition_to(to) {
            return Err(AppError::Conflict(format!(
                "La reserva {} está {} y no puede pasar a {}",
                reservation.id, reservation.status, to
            )));
        }

        self.reservations
            .change_status(
                reservation,
                StatusChange {
                    from: reservation.status,
                    to,
                    approved_by,
                    vehicle_status,
                },
            )
            .await
    }

    async fn find(&self, id: i64) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", id))
    }
}

fn ensure_vehicle_accepts_reservations(vehicle: &Vehicle) -> AppResult<()> {
    if vehicle.status.accepts_reservations() {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "El vehículo {} está en mantenimiento",
            vehicle.plate
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn vehicle(status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: 9,
            brand: "Nissan".to_string(),
            model: "Versa".to_string(),
            year: 2024,
            plate: "ABC-123".to_string(),
            vehicle_type: "sedan".to_string(),
            daily_rate: Decimal::new(85_000, 2),
            status,
            features: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_vehicle_in_maintenance_blocks_approval() {
        match ensure_vehicle_accepts_reservations(&vehicle(VehicleStatus::Maintenance)) {
            Err(AppError::Conflict(msg)) => assert!(msg.contains("ABC-123")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_reservable_vehicle_statuses() {
        for status in [VehicleStatus::Available, VehicleStatus::Reserved, VehicleStatus::Rented] {
            assert!(ensure_vehicle_accepts_reservations(&vehicle(status)).is_ok());
        }
    }
}
