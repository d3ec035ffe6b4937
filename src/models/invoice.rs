//! Modelo de Invoice

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::text_enum;

/// Estado de la factura
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Cancelled,
}

text_enum!(InvoiceStatus, "invoice_status", {
    Paid => "paid",
    Pending => "pending",
    Overdue => "overdue",
    Cancelled => "cancelled",
});

impl InvoiceStatus {
    /// Pagadas y canceladas ya no cambian
    pub fn is_final(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    pub fn is_outstanding(self) -> bool {
        matches!(self, InvoiceStatus::Pending | InvoiceStatus::Overdue)
    }
}

/// Invoice - mapea exactamente a la tabla invoices
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: Option<String>,
    pub reservation_id: i64,
    pub amount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    #[sqlx(try_from = "String")]
    pub status: InvoiceStatus,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de facturas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilters {
    pub status: Option<InvoiceStatus>,
    pub reservation_id: Option<i64>,
}

/// Número de factura legible: `FAC-2026-000042`
pub fn invoice_number(year: i32, id: i64) -> String {
    format!("FAC-{}-{:06}", year, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_number_format() {
        assert_eq!(invoice_number(2026, 42), "FAC-2026-000042");
        assert_eq!(invoice_number(2026, 1_234_567), "FAC-2026-1234567");
    }

    #[test]
    fn test_final_statuses() {
        assert!(InvoiceStatus::Paid.is_final());
        assert!(InvoiceStatus::Cancelled.is_final());
        assert!(!InvoiceStatus::Overdue.is_final());
        assert!(InvoiceStatus::Overdue.is_outstanding());
        assert!(!InvoiceStatus::Paid.is_outstanding());
    }
}
