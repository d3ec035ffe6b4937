//! Modelos del dashboard

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Indicadores generales del CRM
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub vehicles: StatusBreakdown,
    pub clients: ClientTotals,
    pub reservations: StatusBreakdown,
    pub revenue: Decimal,
    pub outstanding: Decimal,
}

/// Conteo total y por estado
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBreakdown {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
}

impl StatusBreakdown {
    pub fn from_counts(counts: Vec<(String, i64)>) -> Self {
        let by_status: BTreeMap<String, i64> = counts.into_iter().collect();
        Self {
            total: by_status.values().sum(),
            by_status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientTotals {
    pub total: i64,
    pub pending: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakdown_totals() {
        let breakdown = StatusBreakdown::from_counts(vec![
            ("available".to_string(), 7),
            ("rented".to_string(), 3),
            ("maintenance".to_string(), 1),
        ]);
        assert_eq!(breakdown.total, 11);
        assert_eq!(breakdown.by_status["rented"], 3);
    }
}
