//! Bank statement access via notification e-mails sent by ČSOB.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::patterns::CSOB_TRANSACTION;
use super::{BodySource, MessageHeaders, Result, StatementSource};
use crate::models::payment::PaymentEvent;

const SENDER_MAILBOX: &str = "administrator";
const SENDER_HOST: &str = "tbs.csob.cz";

/// Boundary between successive transaction notices batched in one message.
/// Each segment carries at most one transaction description.
const PAYMENT_DELIMITER: &str = "Zůstatek na účtu po zaúčtování transakce";

/// Statement source for the ČSOB e-mail notification format.
pub struct CsobEmailStatement;

impl CsobEmailStatement {
    pub fn new() -> Self {
        Self
    }

    /// Extract one credit payment from a delimited body segment.
    ///
    /// Debits and calendar-impossible dates yield nothing.
    fn parse_segment(segment: &str) -> Option<PaymentEvent> {
        let caps = CSOB_TRANSACTION.captures(segment)?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let amount = parse_amount(&caps[4])?;
        if amount <= Decimal::ZERO {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let variable_symbol: u64 = caps[5].parse().ok()?;
        Some(PaymentEvent {
            variable_symbol,
            date,
            amount,
        })
    }
}

impl Default for CsobEmailStatement {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementSource for CsobEmailStatement {
    fn process_message(
        &self,
        sequence: u32,
        headers: &MessageHeaders,
        body: &dyn BodySource,
    ) -> Result<Option<Vec<PaymentEvent>>> {
        let from = &headers.from;
        if from.mailbox != SENDER_MAILBOX || from.host != SENDER_HOST {
            trace!(
                "message {} from {}@{} is not a ČSOB notification",
                sequence, from.mailbox, from.host
            );
            return Ok(None);
        }

        let body = body.body()?;
        let payments: Vec<PaymentEvent> = body
            .split(PAYMENT_DELIMITER)
            .filter_map(Self::parse_segment)
            .collect();

        debug!("message {}: {} credit payment(s)", sequence, payments.len());
        Ok(if payments.is_empty() {
            None
        } else {
            Some(payments)
        })
    }
}

/// Parse a decimal-comma amount ("+1500,00") into a `Decimal`.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().trim_start_matches('+').replace(',', ".");
    Decimal::from_str(&normalized).ok()
}
