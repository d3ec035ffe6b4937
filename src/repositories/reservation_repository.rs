use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::models::contract::ContractStatus;
use crate::models::reservation::{Reservation, ReservationDetail, ReservationFilters, ReservationStatus};
use crate::models::vehicle::VehicleStatus;
use crate::services::billing_service::ranges_overlap;
use crate::utils::errors::AppError;

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.client_id, c.name AS client_name, r.vehicle_id,
           CONCAT(v.brand, ' ', v.model) AS vehicle_label, v.plate,
           r.start_date, r.end_date, r.days, r.total_amount, r.status,
           r.approved_by, r.created_at
    FROM reservations r
    JOIN clients c ON c.id = r.client_id
    JOIN vehicles v ON v.id = r.vehicle_id
    WHERE 1 = 1
"#;

/// Datos para insertar una reserva
pub struct NewReservation {
    pub client_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub daily_rate: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

/// Cambio de estado de una reserva y, opcionalmente, de su vehículo
pub struct StatusChange {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
    pub approved_by: Option<i64>,
    pub vehicle_status: Option<VehicleStatus>,
}

pub struct ReservationRepository {
    pool: MySqlPool,
}

impl ReservationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserta la reserva si no se traslapa con otra pendiente o confirmada.
    /// La fila del vehículo queda bloqueada hasta el commit, así dos solicitudes
    /// simultáneas sobre el mismo vehículo se validan una tras otra.
    pub async fn create(&self, reservation: NewReservation) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM vehicles WHERE id = ? FOR UPDATE")
            .bind(reservation.vehicle_id)
            .execute(&mut *tx)
            .await?;

        let blocking = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE vehicle_id = ? AND status IN (?, ?)",
        )
        .bind(reservation.vehicle_id)
        .bind(ReservationStatus::Pending.as_str())
        .bind(ReservationStatus::Confirmed.as_str())
        .fetch_all(&mut *tx)
        .await?;

        let requested = (reservation.start_date, reservation.end_date);
        if let Some(existing) = blocking
            .iter()
            .find(|r| ranges_overlap(requested, (r.start_date, r.end_date)))
        {
            return Err(AppError::Conflict(format!(
                "El vehículo ya está reservado del {} al {}",
                existing.start_date, existing.end_date
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO reservations
                (client_id, vehicle_id, start_date, end_date, days, daily_rate, total_amount, status, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reservation.client_id)
        .bind(reservation.vehicle_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.days)
        .bind(reservation.daily_rate)
        .bind(reservation.total_amount)
        .bind(ReservationStatus::Pending.as_str())
        .bind(&reservation.notes)
        .execute(&mut *tx)
        .await?;

        let created = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(result.last_insert_id() as i64)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        let reservation = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reservation)
    }

    /// Listado con datos de cliente y vehículo; `client_scope` limita a un cliente
    pub async fn list(
        &self,
        filters: &ReservationFilters,
        client_scope: Option<i64>,
    ) -> Result<Vec<ReservationDetail>, AppError> {
        let mut query = QueryBuilder::<MySql>::new(DETAIL_SELECT);

        if let Some(client_id) = client_scope.or(filters.client_id) {
            query.push(" AND r.client_id = ").push_bind(client_id);
        }
        if let Some(vehicle_id) = filters.vehicle_id {
            query.push(" AND r.vehicle_id = ").push_bind(vehicle_id);
        }
        if let Some(status) = filters.status {
            query.push(" AND r.status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY r.start_date DESC, r.id DESC");

        let reservations = query
            .build_query_as::<ReservationDetail>()
            .fetch_all(&self.pool)
            .await?;
        Ok(reservations)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<ReservationDetail>, AppError> {
        let mut query = QueryBuilder::<MySql>::new(DETAIL_SELECT);
        query.push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ").push_bind(limit);

        let reservations = query
            .build_query_as::<ReservationDetail>()
            .fetch_all(&self.pool)
            .await?;
        Ok(reservations)
    }

    /// Aplica un cambio de estado solo si la reserva sigue en `change.from`.
    /// El vehículo y los contratos abiertos se actualizan en la misma transacción;
    /// un vehículo en mantenimiento conserva su estado.
    pub async fn change_status(&self, reservation: &Reservation, change: StatusChange) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = ?, approved_by = COALESCE(?, approved_by)
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(change.to.as_str())
        .bind(change.approved_by)
        .bind(reservation.id)
        .bind(change.from.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "La reserva {} cambió de estado mientras se procesaba",
                reservation.id
            )));
        }

        if let Some(vehicle_status) = change.vehicle_status {
            sqlx::query("UPDATE vehicles SET status = ? WHERE id = ? AND status <> ?")
                .bind(vehicle_status.as_str())
                .bind(reservation.vehicle_id)
                .bind(VehicleStatus::Maintenance.as_str())
                .execute(&mut *tx)
                .await?;
        }

        if change.to.voids_contract() {
            sqlx::query("UPDATE contracts SET status = ? WHERE reservation_id = ? AND status IN (?, ?)")
                .bind(ContractStatus::Terminated.as_str())
                .bind(reservation.id)
                .bind(ContractStatus::Draft.as_str())
                .bind(ContractStatus::Active.as_str())
                .execute(&mut *tx)
                .await?;
        }

        let updated = sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = ?")
            .bind(reservation.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Elimina una reserva sin facturas ni contratos. Si estaba confirmada, el
    /// vehículo reservado vuelve a quedar disponible.
    pub async fn delete(&self, reservation: &Reservation) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let (invoices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE reservation_id = ?")
            .bind(reservation.id)
            .fetch_one(&mut *tx)
            .await?;
        let (contracts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contracts WHERE reservation_id = ?")
            .bind(reservation.id)
            .fetch_one(&mut *tx)
            .await?;

        if invoices > 0 || contracts > 0 {
            return Err(AppError::Conflict(format!(
                "La reserva {} tiene {} factura(s) y {} contrato(s); cancélala en lugar de eliminarla",
                reservation.id, invoices, contracts
            )));
        }

        let result = sqlx::query("DELETE FROM reservations WHERE id = ?")
            .bind(reservation.id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reserva con id {} no encontrada", reservation.id)));
        }

        if reservation.status == ReservationStatus::Confirmed {
            sqlx::query("UPDATE vehicles SET status = ? WHERE id = ? AND status = ?")
                .bind(VehicleStatus::Available.as_str())
                .bind(reservation.vehicle_id)
                .bind(VehicleStatus::Reserved.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
