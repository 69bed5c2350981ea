//! Core library for pairing bank payments with unpaid invoices.
//!
//! This crate provides:
//! - A schema-less record model mapped from remote XML documents
//! - A caching, paginating record store over a pluggable transport
//! - Invoice access (list unpaid invoices, fire the pay event)
//! - Statement sources extracting payment events from bank notification e-mails

pub mod error;
pub mod invoice;
pub mod models;
pub mod record;
pub mod statement;
pub mod store;
pub mod xml;

pub use error::{MailboxError, PairingError, Result, StoreError, TransportError, XmlError};
pub use invoice::{InvoiceClient, parse_invoice_id};
pub use models::config::PairingConfig;
pub use models::invoice::Invoice;
pub use models::payment::PaymentEvent;
pub use record::GenericRecord;
pub use statement::{
    BodySource, CsobEmailStatement, MessageHeaders, SenderAddress, StatementSource,
};
pub use store::{CachedDocument, RemoteStore, Transport};
pub use xml::{Document, Selector};
