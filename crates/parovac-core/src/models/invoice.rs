//! Invoice model built from schema-less service records.

use serde::Serialize;

use crate::record::GenericRecord;

/// Status value the service assigns to settled invoices.
pub const STATUS_PAID: &str = "paid";

/// One invoice as returned by the invoicing service.
///
/// Only the identifier and status are interpreted; everything else the
/// service sent stays available through `record`.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    /// Positive integer identifier.
    pub id: u64,
    /// Service-defined status string.
    pub status: String,
    /// The full mapped record.
    pub record: GenericRecord,
}

impl Invoice {
    /// Build an invoice from a mapped record.
    ///
    /// Returns `None` when the record carries no parseable positive id.
    pub fn from_record(record: GenericRecord) -> Option<Invoice> {
        let id: u64 = record.field_str("id")?.parse().ok()?;
        if id == 0 {
            return None;
        }
        let status = record.field_str("status").unwrap_or_default().to_string();
        Some(Invoice { id, status, record })
    }

    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::GenericRecord;

    fn record(fields: &[(&str, &str)]) -> GenericRecord {
        GenericRecord::Map(
            fields
                .iter()
                .map(|(name, value)| {
                    (name.to_string(), GenericRecord::Scalar(value.to_string()))
                })
                .collect(),
        )
    }

    #[test]
    fn test_from_record() {
        let invoice =
            Invoice::from_record(record(&[("id", "12"), ("status", "open"), ("number", "2021-01")]))
                .unwrap();
        assert_eq!(invoice.id, 12);
        assert_eq!(invoice.status, "open");
        assert!(!invoice.is_paid());
        assert_eq!(invoice.record.field_str("number"), Some("2021-01"));
    }

    #[test]
    fn test_rejects_unusable_ids() {
        assert!(Invoice::from_record(record(&[("status", "open")])).is_none());
        assert!(Invoice::from_record(record(&[("id", "abc")])).is_none());
        assert!(Invoice::from_record(record(&[("id", "0")])).is_none());
    }
}
