use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::models::invoice::{invoice_number, Invoice, InvoiceFilters, InvoiceStatus};
use crate::services::billing_service::InvoiceAmounts;
use crate::utils::errors::AppError;

pub struct InvoiceRepository {
    pool: MySqlPool,
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Inserta la factura y le asigna su número consecutivo
    pub async fn create(
        &self,
        reservation_id: i64,
        amounts: InvoiceAmounts,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            r#"
            INSERT INTO invoices (reservation_id, amount, tax, total, status, issue_date, due_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reservation_id)
        .bind(amounts.amount)
        .bind(amounts.tax)
        .bind(amounts.total)
        .bind(InvoiceStatus::Pending.as_str())
        .bind(issue_date)
        .bind(due_date)
        .execute(&mut *tx)
        .await?
        .last_insert_id() as i64;

        sqlx::query("UPDATE invoices SET invoice_number = ? WHERE id = ?")
            .bind(invoice_number(issue_date.year(), id))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(invoice)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn list(&self, filters: &InvoiceFilters, client_scope: Option<i64>) -> Result<Vec<Invoice>, AppError> {
        let mut query = QueryBuilder::<MySql>::new(
            "SELECT i.* FROM invoices i JOIN reservations r ON r.id = i.reservation_id WHERE 1 = 1",
        );

        if let Some(client_id) = client_scope {
            query.push(" AND r.client_id = ").push_bind(client_id);
        }
        if let Some(reservation_id) = filters.reservation_id {
            query.push(" AND i.reservation_id = ").push_bind(reservation_id);
        }
        if let Some(status) = filters.status {
            query.push(" AND i.status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY i.issue_date DESC, i.id DESC");

        let invoices = query.build_query_as::<Invoice>().fetch_all(&self.pool).await?;
        Ok(invoices)
    }

    /// Factura vigente (no cancelada) de una reserva
    pub async fn find_open_for_reservation(&self, reservation_id: i64) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM invoices WHERE reservation_id = ? AND status <> ? LIMIT 1",
        )
        .bind(reservation_id)
        .bind(InvoiceStatus::Cancelled.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Marca como vencidas las facturas pendientes con fecha límite pasada
    pub async fn mark_overdue(&self, today: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE invoices SET status = ? WHERE status = ? AND due_date < ?")
            .bind(InvoiceStatus::Overdue.as_str())
            .bind(InvoiceStatus::Pending.as_str())
            .bind(today)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: InvoiceStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Invoice, AppError> {
        sqlx::query("UPDATE invoices SET status = ?, paid_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(paid_at)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Factura {} desapareció tras escribirla", id)))
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
