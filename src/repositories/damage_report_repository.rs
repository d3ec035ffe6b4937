use rust_decimal::Decimal;
use sqlx::{types::Json, MySqlPool};

use crate::models::damage_report::{DamageItem, DamageReport, DamageReportFilters};
use crate::models::vehicle::VehicleStatus;
use crate::utils::errors::AppError;

/// Datos para insertar un reporte de daños
pub struct NewDamageReport {
    pub vehicle_id: i64,
    pub client_id: Option<i64>,
    pub reservation_id: Option<i64>,
    pub items: Vec<DamageItem>,
    pub total_estimate: Decimal,
    pub notes: Option<String>,
    pub reported_by: Option<i64>,
}

pub struct DamageReportRepository {
    pool: MySqlPool,
}

impl DamageReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserta el reporte; con `send_to_maintenance` el vehículo pasa a taller
    pub async fn create(&self, report: NewDamageReport, send_to_maintenance: bool) -> Result<DamageReport, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO damage_reports
                (vehicle_id, client_id, reservation_id, items, total_estimate, notes, reported_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(report.vehicle_id)
        .bind(report.client_id)
        .bind(report.reservation_id)
        .bind(Json(&report.items))
        .bind(report.total_estimate)
        .bind(&report.notes)
        .bind(report.reported_by)
        .execute(&mut *tx)
        .await?
        .last_insert_id() as i64;

        if send_to_maintenance {
            sqlx::query("UPDATE vehicles SET status = ? WHERE id = ?")
                .bind(VehicleStatus::Maintenance.as_str())
                .bind(report.vehicle_id)
                .execute(&mut *tx)
                .await?;
        }

        let created = sqlx::query_as::<_, DamageReport>("SELECT * FROM damage_reports WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DamageReport>, AppError> {
        let report = sqlx::query_as::<_, DamageReport>("SELECT * FROM damage_reports WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    pub async fn list(&self, filters: &DamageReportFilters) -> Result<Vec<DamageReport>, AppError> {
        let reports = match filters.vehicle_id {
            Some(vehicle_id) => {
                sqlx::query_as::<_, DamageReport>(
                    "SELECT * FROM damage_reports WHERE vehicle_id = ? ORDER BY created_at DESC",
                )
                .bind(vehicle_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DamageReport>("SELECT * FROM damage_reports ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(reports)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM damage_reports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
