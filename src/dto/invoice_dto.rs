use serde::Deserialize;
use validator::Validate;

use crate::models::invoice::InvoiceStatus;

/// Request para facturar una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub reservation_id: i64,

    #[validate(range(min = 0, max = 365))]
    pub due_days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}
