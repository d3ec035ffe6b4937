//! Modelo de Reservation
//!
//! Incluye las transiciones válidas del ciclo de vida de una reserva.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::text_enum;

/// Estado de la reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Rejected,
}

text_enum!(ReservationStatus, "reservation_status", {
    Pending => "pending",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    Rejected => "rejected",
});

impl ReservationStatus {
    /// pending → confirmed | rejected | cancelled
    /// confirmed → completed | cancelled
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
        )
    }

    /// Reservas que bloquean el vehículo en su rango de fechas
    pub fn blocks_vehicle(self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// Estados que dejan sin efecto el contrato de la reserva
    pub fn voids_contract(self) -> bool {
        matches!(self, ReservationStatus::Cancelled | ReservationStatus::Rejected)
    }

    pub fn is_final(self) -> bool {
        matches!(
            self,
            ReservationStatus::Completed | ReservationStatus::Cancelled | ReservationStatus::Rejected
        )
    }
}

/// Reservation - mapea exactamente a la tabla reservations
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub client_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub daily_rate: Decimal,
    pub total_amount: Decimal,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub approved_by: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reserva con datos de cliente y vehículo para listados
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReservationDetail {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub vehicle_id: i64,
    pub vehicle_label: String,
    pub plate: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub total_amount: Decimal,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Filtros para búsqueda de reservas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilters {
    pub status: Option<ReservationStatus>,
    pub client_id: Option<i64>,
    pub vehicle_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_valid_transitions() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Confirmed.can_transition_to(Pending));
        for status in [Completed, Cancelled, Rejected] {
            assert!(status.is_final());
            for next in ReservationStatus::ALL {
                assert!(!status.can_transition_to(*next), "{status} -> {next}");
            }
        }
    }

    #[test]
    fn test_blocking_statuses() {
        assert!(Pending.blocks_vehicle());
        assert!(Confirmed.blocks_vehicle());
        assert!(!Cancelled.blocks_vehicle());
        assert!(!Completed.blocks_vehicle());
    }

    #[test]
    fn test_statuses_that_void_contracts() {
        assert!(Cancelled.voids_contract());
        assert!(Rejected.voids_contract());
        assert!(!Completed.voids_contract());
        assert!(!Confirmed.voids_contract());
    }
}
