use chrono::Utc;
use sqlx::{types::Json, MySqlPool};

use crate::models::contract::{Contract, ContractStatus};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::VehicleStatus;
use crate::utils::errors::AppError;

pub struct ContractRepository {
    pool: MySqlPool,
}

impl ContractRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, reservation_id: i64, terms: Vec<String>) -> Result<Contract, AppError> {
        let result = sqlx::query("INSERT INTO contracts (reservation_id, terms, status) VALUES (?, ?, ?)")
            .bind(reservation_id)
            .bind(Json(terms))
            .bind(ContractStatus::Draft.as_str())
            .execute(&self.pool)
            .await?;

        self.fetch(result.last_insert_id() as i64).await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(contract)
    }

    pub async fn list(&self, client_scope: Option<i64>) -> Result<Vec<Contract>, AppError> {
        let contracts = match client_scope {
            Some(client_id) => {
                sqlx::query_as::<_, Contract>(
                    r#"
                    SELECT ct.* FROM contracts ct
                    JOIN reservations r ON r.id = ct.reservation_id
                    WHERE r.client_id = ?
                    ORDER BY ct.created_at DESC
                    "#,
                )
                .bind(client_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Contract>("SELECT * FROM contracts ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(contracts)
    }

    /// Contrato vigente (no terminado) de una reserva
    pub async fn find_open_for_reservation(&self, reservation_id: i64) -> Result<Option<Contract>, AppError> {
        let contract = sqlx::query_as::<_, Contract>(
            "SELECT * FROM contracts WHERE reservation_id = ? AND status <> ? LIMIT 1",
        )
        .bind(reservation_id)
        .bind(ContractStatus::Terminated.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(contract)
    }

    /// Registra las firmas, activa el contrato y entrega el vehículo
    pub async fn sign(
        &self,
        contract: &Contract,
        vehicle_id: i64,
        client_signature: &str,
        company_signature: Option<&str>,
    ) -> Result<Contract, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE contracts
            SET client_signature = ?, company_signature = ?, status = ?, signed_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(client_signature)
        .bind(company_signature)
        .bind(ContractStatus::Active.as_str())
        .bind(Utc::now())
        .bind(contract.id)
        .bind(ContractStatus::Draft.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!("El contrato {} ya fue firmado", contract.id)));
        }

        sqlx::query("UPDATE vehicles SET status = ? WHERE id = ? AND status <> ?")
            .bind(VehicleStatus::Rented.as_str())
            .bind(vehicle_id)
            .bind(VehicleStatus::Maintenance.as_str())
            .execute(&mut *tx)
            .await?;

        let signed = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = ?")
            .bind(contract.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(signed)
    }

    /// Cierra el contrato, completa la reserva y libera el vehículo.
    /// Si el contrato o la reserva cambiaron de estado no se escribe nada.
    pub async fn complete(&self, contract: &Contract, reservation: &Reservation) -> Result<Contract, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE contracts SET status = ? WHERE id = ? AND status = ?")
            .bind(ContractStatus::Completed.as_str())
            .bind(contract.id)
            .bind(ContractStatus::Active.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "El contrato {} cambió de estado mientras se procesaba",
                contract.id
            )));
        }

        let result = sqlx::query("UPDATE reservations SET status = ? WHERE id = ? AND status = ?")
            .bind(ReservationStatus::Completed.as_str())
            .bind(reservation.id)
            .bind(ReservationStatus::Confirmed.as_str())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "La reserva {} ya no está confirmada",
                reservation.id
            )));
        }

        sqlx::query("UPDATE vehicles SET status = ? WHERE id = ? AND status <> ?")
            .bind(VehicleStatus::Available.as_str())
            .bind(reservation.vehicle_id)
            .bind(VehicleStatus::Maintenance.as_str())
            .execute(&mut *tx)
            .await?;

        let completed = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = ?")
            .bind(contract.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(completed)
    }

    pub async fn update_status(&self, id: i64, status: ContractStatus) -> Result<Contract, AppError> {
        sqlx::query("UPDATE contracts SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.fetch(id).await
    }

    async fn fetch(&self, id: i64) -> Result<Contract, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Contrato {} desapareció tras escribirlo", id)))
    }
}
