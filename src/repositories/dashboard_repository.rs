use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::models::client::ClientStatus;
use crate::models::dashboard::{ClientTotals, DashboardStats, StatusBreakdown};
use crate::models::invoice::InvoiceStatus;
use crate::utils::errors::AppError;

pub struct DashboardRepository {
    pool: MySqlPool,
}

impl DashboardRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStats, AppError> {
        let vehicles = self.count_by_status("vehicles").await?;
        let reservations = self.count_by_status("reservations").await?;

        let (total_clients, pending_clients): (i64, Option<Decimal>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(CASE WHEN status = ? THEN 1 ELSE 0 END) FROM clients",
        )
        .bind(ClientStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        let revenue: Option<Decimal> = sqlx::query_scalar("SELECT SUM(total) FROM invoices WHERE status = ?")
            .bind(InvoiceStatus::Paid.as_str())
            .fetch_one(&self.pool)
            .await?;

        let outstanding: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(total) FROM invoices WHERE status IN (?, ?)")
                .bind(InvoiceStatus::Pending.as_str())
                .bind(InvoiceStatus::Overdue.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardStats {
            vehicles,
            clients: ClientTotals {
                total: total_clients,
                pending: pending_clients
                    .and_then(|count| i64::try_from(count).ok())
                    .unwrap_or(0),
            },
            reservations,
            revenue: revenue.unwrap_or(Decimal::ZERO),
            outstanding: outstanding.unwrap_or(Decimal::ZERO),
        })
    }

    // `table` solo recibe nombres fijos de este módulo
    async fn count_by_status(&self, table: &'static str) -> Result<StatusBreakdown, AppError> {
        let counts: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT status, COUNT(*) FROM {} GROUP BY status",
            table
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(StatusBreakdown::from_counts(counts))
    }
}
