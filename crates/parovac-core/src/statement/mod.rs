//! Statement sources: payment extraction from mailbox messages.
//!
//! A statement source is a capability over one raw message at a time. The
//! sender address is checked first and the body is fetched lazily, so
//! unrelated mail is rejected without touching the (possibly expensive)
//! body accessor. Finding no payments is a normal outcome, not an error.

mod csob;
pub mod patterns;

pub use csob::CsobEmailStatement;

use crate::error::MailboxError;
use crate::models::payment::PaymentEvent;

/// Result type for statement operations.
pub type Result<T> = std::result::Result<T, MailboxError>;

/// Sender address split into its mailbox and host parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderAddress {
    pub mailbox: String,
    pub host: String,
}

impl SenderAddress {
    pub fn new(mailbox: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            mailbox: mailbox.into(),
            host: host.into(),
        }
    }
}

/// The message headers a statement source gets to see.
#[derive(Debug, Clone)]
pub struct MessageHeaders {
    pub from: SenderAddress,
    pub subject: Option<String>,
}

/// Lazy access to a message body.
pub trait BodySource {
    fn body(&self) -> Result<String>;
}

/// A provider-specific extractor of payment events from one raw message.
///
/// Adding a bank means adding another implementation, not touching a
/// dispatch chain.
pub trait StatementSource {
    /// Extract payment events from one message.
    ///
    /// `Ok(None)` means the message is not applicable: wrong sender, or no
    /// credit payments found in the body.
    fn process_message(
        &self,
        sequence: u32,
        headers: &MessageHeaders,
        body: &dyn BodySource,
    ) -> Result<Option<Vec<PaymentEvent>>>;
}

/// A body held in memory, mostly for adapters that already read the message.
pub struct StaticBody(pub String);

impl BodySource for StaticBody {
    fn body(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
