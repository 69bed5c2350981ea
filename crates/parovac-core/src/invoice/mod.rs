//! Invoice access on top of the remote record store.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{PairingError, StoreError};
use crate::models::invoice::{Invoice, STATUS_PAID};
use crate::store::{RemoteStore, Transport};
use crate::xml::Selector;

/// Result type for invoice operations.
pub type Result<T> = std::result::Result<T, PairingError>;

const INVOICES_RESOURCE: &str = "invoices.xml";
const PAY_EVENT: &str = "pay";

/// Client for the invoicing service's invoice collection.
pub struct InvoiceClient<T> {
    store: RemoteStore<T>,
}

impl<T: Transport> InvoiceClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            store: RemoteStore::new(transport),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &RemoteStore<T> {
        &self.store
    }

    /// Fetch all unpaid invoices, keyed by id.
    ///
    /// Pages through the collection until a page carries no invoices at all;
    /// a later duplicate id overwrites an earlier one.
    pub fn list_unpaid(&mut self) -> Result<BTreeMap<u64, Invoice>> {
        let probe = Selector::element("invoice");
        let filter = Selector::element("invoice").child_not_equals("status", STATUS_PAID);

        let records = self
            .store
            .collect_paged(INVOICES_RESOURCE, &probe, &filter, |record| {
                record.field_str("id").and_then(|id| id.parse().ok())
            })?;

        let mut invoices = BTreeMap::new();
        for (id, record) in records {
            match Invoice::from_record(record) {
                Some(invoice) => {
                    invoices.insert(id, invoice);
                }
                None => warn!("invoice {} has no usable record, skipping", id),
            }
        }
        info!("{} unpaid invoice(s) listed", invoices.len());
        Ok(invoices)
    }

    /// Fire the pay event on one invoice.
    ///
    /// Returns whether the service acknowledged with a non-empty response;
    /// the new status is not verified locally. An invalid id is rejected
    /// before any network call.
    pub fn mark_paid(&mut self, invoice_id: u64) -> Result<bool> {
        if invoice_id == 0 {
            return Err(PairingError::Validation {
                field: "invoice_id".to_string(),
                reason: "must be a positive integer".to_string(),
            });
        }

        let resource = format!("invoices/{invoice_id}/fire");
        debug!("firing '{}' on {}", PAY_EVENT, resource);
        let response = self
            .store
            .fire(&resource, PAY_EVENT)
            .map_err(StoreError::from)?;
        Ok(!response.is_empty())
    }
}

/// Parse an invoice identifier supplied as text.
///
/// Used at outer boundaries (CLI arguments, extracted reference codes)
/// so that non-numeric or zero input fails as a validation error.
pub fn parse_invoice_id(raw: &str) -> Result<u64> {
    let id: u64 = raw.trim().parse().map_err(|_| PairingError::Validation {
        field: "invoice_id".to_string(),
        reason: format!("'{raw}' is not a positive integer"),
    })?;
    if id == 0 {
        return Err(PairingError::Validation {
            field: "invoice_id".to_string(),
            reason: "must be a positive integer".to_string(),
        });
    }
    Ok(id)
}
