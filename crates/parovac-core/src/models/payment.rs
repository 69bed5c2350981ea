//! Payment event model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// One credit payment extracted from a bank notification.
///
/// Produced transiently per parsed message; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentEvent {
    /// Reference code printed on the transaction, meant to match an
    /// invoice identifier.
    pub variable_symbol: u64,
    /// Calendar day of the transaction, no time of day.
    pub date: NaiveDate,
    /// Credited amount; always strictly positive.
    pub amount: Decimal,
}
