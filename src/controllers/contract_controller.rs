use sqlx::MySqlPool;
use tracing::info;
use validator::Validate;

use crate::controllers::{client_scope, ensure_in_scope};
use crate::dto::contract_dto::{CreateContractRequest, SignContractRequest};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::contract::{Contract, ContractResponse, ContractStatus, DEFAULT_TERMS};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::role::{Action, Module};
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::contract_repository::ContractRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_signature;

pub struct ContractController {
    contracts: ContractRepository,
    reservations: ReservationRepository,
    clients: ClientRepository,
}

impl ContractController {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            contracts: ContractRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            clients: ClientRepository::new(pool),
        }
    }

    pub async fn list(&self, auth: &AuthenticatedUser) -> AppResult<Vec<ContractResponse>> {
        auth.require(Module::Reservas, Action::View)?;

        let scope = client_scope(&self.clients, auth).await?;
        let contracts = self.contracts.list(scope).await?;
        Ok(contracts.into_iter().map(ContractResponse::from).collect())
    }

    pub async fn get(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ContractResponse> {
        auth.require(Module::Reservas, Action::View)?;

        let contract = self.find(id).await?;
        let reservation = self.reservation_of(&contract).await?;
        let scope = client_scope(&self.clients, auth).await?;
        ensure_in_scope(scope, reservation.client_id, not_found_error("Contrato", id))?;

        Ok(contract.into())
    }

    /// Genera el contrato en borrador de una reserva confirmada
    pub async fn create(
        &self,
        auth: &AuthenticatedUser,
        request: CreateContractRequest,
    ) -> AppResult<ApiResponse<ContractResponse>> {
        auth.require(Module::Reservas, Action::Create)?;
        if !auth.is_staff() {
            return Err(AppError::Forbidden(
                "Solo el personal puede generar contratos".to_string(),
            ));
        }
        request.validate()?;

        let reservation = self
            .reservations
            .find_by_id(request.reservation_id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", request.reservation_id))?;

        if reservation.status != ReservationStatus::Confirmed {
            return Err(AppError::Conflict(format!(
                "La reserva {} está {}; solo se contratan reservas confirmadas",
                reservation.id, reservation.status
            )));
        }

        if self.contracts.find_open_for_reservation(reservation.id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "La reserva {} ya tiene un contrato vigente",
                reservation.id
            )));
        }

        let terms = if request.terms.is_empty() {
            DEFAULT_TERMS.iter().map(|term| term.to_string()).collect()
        } else {
            request.terms
        };

        let contract = self.contracts.create(reservation.id, terms).await?;
        info!("📝 Contrato {} generado para la reserva {}", contract.id, reservation.id);
        Ok(ApiResponse::success_with_message(contract.into(), "Contrato creado exitosamente"))
    }

    /// Firma del contrato: todos los términos aceptados y firmas PNG válidas
    pub async fn sign(
        &self,
        auth: &AuthenticatedUser,
        id: i64,
        request: SignContractRequest,
    ) -> AppResult<ApiResponse<ContractResponse>> {
        request.validate()?;

        let contract = self.find(id).await?;
        let reservation = self.reservation_of(&contract).await?;

        if !auth.role.can(Module::Reservas, Action::Edit) {
            if auth.is_staff() {
                auth.require(Module::Reservas, Action::Edit)?;
            }
            let scope = client_scope(&self.clients, auth).await?;
            ensure_in_scope(scope, reservation.client_id, not_found_error("Contrato", id))?;
        }

        if contract.status != ContractStatus::Draft {
            return Err(AppError::Conflict(format!(
                "El contrato {} está {} y no se puede firmar",
                id, contract.status
            )));
        }
        ensure_reservation_confirmed(&reservation)?;

        let missing = contract.missing_terms(&request.accepted_terms);
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Faltan {} términos por aceptar: {}",
                missing.len(),
                missing.join(" | ")
            )));
        }

        validate_signature(&request.client_signature)?;
        if let Some(company_signature) = &request.company_signature {
            validate_signature(company_signature)?;
        }

        let signed = self
            .contracts
            .sign(
                &contract,
                reservation.vehicle_id,
                &request.client_signature,
                request.company_signature.as_deref(),
            )
            .await?;

        info!("✍️ Contrato {} firmado; vehículo {} entregado", id, reservation.vehicle_id);
        Ok(ApiResponse::success_with_message(signed.into(), "Contrato firmado exitosamente"))
    }

    /// active → completed; cierra la reserva y libera el vehículo
    pub async fn complete(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<ContractResponse>> {
        auth.require(Module::Reservas, Action::Edit)?;

        let contract = self.find(id).await?;
        ensure_transition(&contract, ContractStatus::Completed)?;

        let reservation = self.reservation_of(&contract).await?;
        ensure_reservation_confirmed(&reservation)?;
        let completed = self.contracts.complete(&contract, &reservation).await?;

        info!("🏁 Contrato {} completado", id);
        Ok(ApiResponse::success_with_message(completed.into(), "Contrato completado"))
    }

    pub async fn terminate(&self, auth: &AuthenticatedUser, id: i64) -> AppResult<ApiResponse<ContractResponse>> {
        auth.require(Module::Reservas, Action::Edit)?;

        let contract = self.find(id).await?;
        ensure_transition(&contract, ContractStatus::Terminated)?;

        let terminated = self
            .contracts
            .update_status(id, ContractStatus::Terminated)
            .await?;

        info!("⛔ Contrato {} terminado por {}", id, auth.email);
        Ok(ApiResponse::success_with_message(terminated.into(), "Contrato terminado"))
    }

    async fn reservation_of(&self, contract: &Contract) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(contract.reservation_id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", contract.reservation_id))
    }

    async fn find(&self, id: i64) -> AppResult<Contract> {
        self.contracts
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Contrato", id))
    }
}

/// Un contrato solo avanza mientras su reserva siga confirmada
fn ensure_reservation_confirmed(reservation: &Reservation) -> AppResult<()> {
    if reservation.status == ReservationStatus::Confirmed {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "La reserva {} está {}; el contrato ya no puede avanzar",
            reservation.id, reservation.status
        )))
    }
}

fn ensure_transition(contract: &Contract, to: ContractStatus) -> AppResult<()> {
    if contract.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "El contrato {} está {} y no puede pasar a {}",
            contract.id, contract.status, to
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn reservation(status: ReservationStatus) -> Reservation {
        let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        Reservation {
            id: 5,
            client_id: 2,
            vehicle_id: 3,
            start_date: start,
            end_date: start + chrono::Duration::days(3),
            days: 3,
            daily_rate: Decimal::new(90_000, 2),
            total_amount: Decimal::new(270_000, 2),
            status,
            approved_by: Some(1),
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contract(status: ContractStatus) -> Contract {
        Contract {
            id: 11,
            reservation_id: 5,
            terms: Json(vec!["Devolver con tanque lleno".to_string()]),
            client_signature: None,
            company_signature: None,
            status,
            signed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_contract_needs_confirmed_reservation() {
        assert!(ensure_reservation_confirmed(&reservation(ReservationStatus::Confirmed)).is_ok());

        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Cancelled,
            ReservationStatus::Rejected,
            ReservationStatus::Completed,
        ] {
            match ensure_reservation_confirmed(&reservation(status)) {
                Err(AppError::Conflict(msg)) => assert!(msg.contains(status.as_str())),
                other => panic!("unexpected result for {}: {:?}", status, other),
            }
        }
    }

    #[test]
    fn test_contract_transitions() {
        assert!(ensure_transition(&contract(ContractStatus::Active), ContractStatus::Completed).is_ok());
        assert!(ensure_transition(&contract(ContractStatus::Draft), ContractStatus::Terminated).is_ok());
        assert!(matches!(
            ensure_transition(&contract(ContractStatus::Draft), ContractStatus::Completed),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ensure_transition(&contract(ContractStatus::Terminated), ContractStatus::Active),
            Err(AppError::Conflict(_))
        ));
    }
}
