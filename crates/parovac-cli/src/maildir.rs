//! Mailbox adapter: a directory of `.eml` files.
//!
//! Headers are read up front (only the header block is scanned); the body
//! is read from disk lazily, when a statement source asks for it.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use glob::glob;
use tracing::warn;

use parovac_core::statement::Result;
use parovac_core::{BodySource, MailboxError, MessageHeaders, SenderAddress};

/// One message file with its parsed headers.
pub struct EmlMessage {
    path: PathBuf,
    headers: MessageHeaders,
}

impl EmlMessage {
    pub fn headers(&self) -> &MessageHeaders {
        &self.headers
    }

    /// Lazy accessor for the message body.
    pub fn body_source(&self) -> EmlBody {
        EmlBody {
            path: self.path.clone(),
        }
    }
}

/// Reads the body of one `.eml` file on demand.
pub struct EmlBody {
    path: PathBuf,
}

impl BodySource for EmlBody {
    fn body(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path)?;
        let body = match content.find("\r\n\r\n") {
            Some(pos) => &content[pos + 4..],
            None => match content.find("\n\n") {
                Some(pos) => &content[pos + 2..],
                None => "",
            },
        };
        Ok(body.to_string())
    }
}

/// A directory of `.eml` files, in file-name order.
pub struct EmlMailbox {
    messages: Vec<EmlMessage>,
}

impl EmlMailbox {
    /// Scan a directory for `.eml` files and parse their headers.
    ///
    /// Files without a parseable `From:` header are skipped with a warning.
    pub fn open(dir: &Path) -> Result<Self> {
        let pattern = format!("{}/*.eml", dir.display());
        let mut paths: Vec<PathBuf> = glob(&pattern)
            .map_err(|e| MailboxError::Scan(e.to_string()))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!("skipping unreadable mailbox entry: {}", e);
                    None
                }
            })
            .collect();
        paths.sort();

        let mut messages = Vec::new();
        for path in paths {
            match parse_headers(&path)? {
                Some(headers) => messages.push(EmlMessage { path, headers }),
                None => warn!("skipping {}: no From header", path.display()),
            }
        }
        Ok(Self { messages })
    }

    pub fn messages(&self) -> &[EmlMessage] {
        &self.messages
    }
}

/// Read the header block of an `.eml` file; stops at the first blank line.
fn parse_headers(path: &Path) -> Result<Option<MessageHeaders>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut from = None;
    let mut subject = None;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("From:") {
            from = parse_address(value);
        } else if let Some(value) = line.strip_prefix("Subject:") {
            subject = Some(value.trim().to_string());
        }
    }

    Ok(from.map(|from| MessageHeaders { from, subject }))
}

/// Parse `Display Name <mailbox@host>` or a bare `mailbox@host`.
fn parse_address(raw: &str) -> Option<SenderAddress> {
    let raw = raw.trim();
    let address = match (raw.rfind('<'), raw.rfind('>')) {
        (Some(start), Some(end)) if start < end => &raw[start + 1..end],
        _ => raw,
    };
    let (mailbox, host) = address.split_once('@')?;
    Some(SenderAddress::new(mailbox.trim(), host.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_bare() {
        let address = parse_address(" administrator@tbs.csob.cz ").unwrap();
        assert_eq!(address.mailbox, "administrator");
        assert_eq!(address.host, "tbs.csob.cz");
    }

    #[test]
    fn test_parse_address_with_display_name() {
        let address = parse_address("ČSOB <administrator@tbs.csob.cz>").unwrap();
        assert_eq!(address.mailbox, "administrator");
        assert_eq!(address.host, "tbs.csob.cz");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(parse_address("not an address").is_none());
    }
}
