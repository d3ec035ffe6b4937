//! Modelo de DamageReport
//!
//! Reportes de daños levantados en la inspección del vehículo.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

use crate::models::text_enum;

/// Gravedad del daño
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageSeverity {
    Minor,
    Moderate,
    Severe,
}

text_enum!(DamageSeverity, "damage_severity", {
    Minor => "minor",
    Moderate => "moderate",
    Severe => "severe",
});

/// Daño individual dentro de un reporte
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageItem {
    pub area: String,
    pub description: String,
    pub severity: DamageSeverity,
    pub cost: Decimal,
}

/// Tope de las columnas DECIMAL(12,2)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2); // == 9_999_999_999.99

/// Suma de los costos estimados; `None` si no cabe en la columna
pub fn total_estimate(items: &[DamageItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.cost))
        .map(|total| total.round_dp(2))
        .filter(|total| *total <= MAX_AMOUNT)
}

/// Un daño severo saca el vehículo de circulación
pub fn requires_maintenance(items: &[DamageItem]) -> bool {
    items.iter().any(|item| item.severity == DamageSeverity::Severe)
}

/// DamageReport - mapea exactamente a la tabla damage_reports
#[derive(Debug, Clone, FromRow)]
pub struct DamageReport {
    pub id: i64,
    pub vehicle_id: i64,
    pub client_id: Option<i64>,
    pub reservation_id: Option<i64>,
    pub items: Json<Vec<DamageItem>>,
    pub total_estimate: Decimal,
    pub notes: Option<String>,
    pub reported_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DamageReportResponse {
    pub id: i64,
    pub vehicle_id: i64,
    pub client_id: Option<i64>,
    pub reservation_id: Option<i64>,
    pub items: Vec<DamageItem>,
    pub total_estimate: Decimal,
    pub notes: Option<String>,
    pub reported_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<DamageReport> for DamageReportResponse {
    fn from(report: DamageReport) -> Self {
        Self {
            id: report.id,
            vehicle_id: report.vehicle_id,
            client_id: report.client_id,
            reservation_id: report.reservation_id,
            items: report.items.0,
            total_estimate: report.total_estimate,
            notes: report.notes,
            reported_by: report.reported_by,
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DamageReportFilters {
    pub vehicle_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(severity: DamageSeverity, cents: i64) -> DamageItem {
        DamageItem {
            area: "puerta trasera".to_string(),
            description: "rayón".to_string(),
            severity,
            cost: Decimal::new(cents, 2),
        }
    }

    #[test]
    fn test_total_estimate() {
        let items = vec![item(DamageSeverity::Minor, 150_050), item(DamageSeverity::Moderate, 2_499)];
        assert_eq!(total_estimate(&items), Some(Decimal::new(152_549, 2)));
        assert_eq!(total_estimate(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_total_estimate_overflow() {
        let huge = DamageItem {
            cost: Decimal::MAX,
            ..item(DamageSeverity::Minor, 0)
        };
        let items = vec![huge, item(DamageSeverity::Minor, 100)];
        assert_eq!(total_estimate(&items), None);
    }

    #[test]
    fn test_total_estimate_above_column_limit() {
        let items = vec![
            DamageItem { cost: MAX_AMOUNT, ..item(DamageSeverity::Minor, 0) },
            item(DamageSeverity::Minor, 1),
        ];
        assert_eq!(total_estimate(&items), None);
    }

    #[test]
    fn test_requires_maintenance() {
        assert!(!requires_maintenance(&[item(DamageSeverity::Minor, 100)]));
        assert!(requires_maintenance(&[
            item(DamageSeverity::Minor, 100),
            item(DamageSeverity::Severe, 900_000),
        ]));
    }

    #[test]
    fn test_item_wire_format() {
        let json = serde_json::json!({
            "area": "parabrisas",
            "description": "estrellado",
            "severity": "severe",
            "cost": "3500.00"
        });
        let parsed: DamageItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.severity, DamageSeverity::Severe);
        assert_eq!(parsed.cost, Decimal::new(350_000, 2));
    }
}
