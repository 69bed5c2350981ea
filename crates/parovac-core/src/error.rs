//! Error types for the parovac-core library.

use thiserror::Error;

/// Main error type for the pairing library.
#[derive(Error, Debug)]
pub enum PairingError {
    /// Missing or unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote record store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Mailbox failure while reading a message.
    #[error("mailbox error: {0}")]
    Mailbox(#[from] MailboxError),

    /// Invalid value supplied by the caller, rejected before any network call.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the remote record store.
///
/// Transport and parse failures stay distinct; neither is recovered or
/// retried, and a failure on any page aborts the whole collection fetch.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network/HTTP failure; the transport diagnostic is passed through.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The remote response was not a well-formed XML document.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

/// Errors raised by a transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be performed.
    #[error("{0}")]
    Http(String),

    /// The server answered with an error status.
    #[error("HTTP {code} for {resource}")]
    Status { code: u16, resource: String },
}

/// Errors raised while parsing an XML document.
#[derive(Error, Debug)]
pub enum XmlError {
    /// Malformed document.
    #[error("malformed XML: {0}")]
    Parse(String),

    /// Document bytes were not valid UTF-8.
    #[error("invalid encoding: {0}")]
    Encoding(String),
}

/// Errors raised by a mailbox implementation.
#[derive(Error, Debug)]
pub enum MailboxError {
    /// The message body could not be fetched.
    #[error("failed to fetch body: {0}")]
    Body(String),

    /// The mailbox could not be scanned.
    #[error("mailbox scan failed: {0}")]
    Scan(String),

    /// I/O error while reading the mailbox.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the pairing library.
pub type Result<T> = std::result::Result<T, PairingError>;
