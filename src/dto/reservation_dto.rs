use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

/// Request para crear una reserva
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReservationRequest {
    /// Ignorado cuando reserva un CLIENTE desde el portal
    pub client_id: Option<i64>,

    pub vehicle_id: i64,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}
