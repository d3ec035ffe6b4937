//! Cálculos de renta y facturación
//!
//! Días cobrados, importe de la reserva e impuestos de la factura.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Desglose de una factura
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceAmounts {
    pub amount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Días cobrados entre dos fechas; una renta del mismo día cuenta como uno
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Redondeo monetario a centavos
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Importe de la reserva: días × tarifa diaria
pub fn reservation_total(days: i64, daily_rate: Decimal) -> Decimal {
    round_money(Decimal::from(days) * daily_rate)
}

/// Impuesto y total para un importe dado
pub fn invoice_amounts(amount: Decimal, tax_rate: Decimal) -> InvoiceAmounts {
    let amount = round_money(amount);
    let tax = round_money(amount * tax_rate);

    InvoiceAmounts {
        amount,
        tax,
        total: amount + tax,
    }
}

/// Dos rangos de fechas se traslapan si comparten al menos un día
pub fn ranges_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn test_rental_days() {
        assert_eq!(rental_days(date(1), date(4)), 3);
        assert_eq!(rental_days(date(1), date(1)), 1);
        assert_eq!(rental_days(date(1), date(2)), 1);
    }

    #[test]
    fn test_reservation_total() {
        assert_eq!(reservation_total(3, Decimal::new(85_050, 2)), Decimal::new(255_150, 2));
    }

    #[test]
    fn test_invoice_amounts() {
        let amounts = invoice_amounts(Decimal::new(255_150, 2), Decimal::new(16, 2));
        assert_eq!(amounts.amount, Decimal::new(255_150, 2));
        assert_eq!(amounts.tax, Decimal::new(40_824, 2));
        assert_eq!(amounts.total, Decimal::new(295_974, 2));
    }

    #[test]
    fn test_tax_rounding() {
        // 10.05 × 0.16 = 1.608
        let amounts = invoice_amounts(Decimal::new(1_005, 2), Decimal::new(16, 2));
        assert_eq!(amounts.tax, Decimal::new(161, 2));
        assert_eq!(amounts.total, Decimal::new(1_166, 2));
    }

    #[test]
    fn test_ranges_overlap() {
        assert!(ranges_overlap((date(1), date(5)), (date(5), date(8))));
        assert!(ranges_overlap((date(3), date(4)), (date(1), date(10))));
        assert!(!ranges_overlap((date(1), date(4)), (date(5), date(8))));
    }
}
