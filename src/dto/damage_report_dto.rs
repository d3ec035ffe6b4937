use serde::Deserialize;
use validator::Validate;

use crate::models::damage_report::DamageItem;

/// Request para levantar un reporte de daños
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDamageReportRequest {
    pub vehicle_id: i64,

    pub client_id: Option<i64>,

    pub reservation_id: Option<i64>,

    #[validate(length(min = 1, max = 50))]
    pub items: Vec<DamageItem>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
