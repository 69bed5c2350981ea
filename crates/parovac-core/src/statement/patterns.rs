//! Regex patterns for provider notification formats.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One ČSOB transaction notice: day.month.year, a signed decimal-comma
    /// amount and the variable symbol, in that order, with arbitrary text
    /// (line breaks included) in between.
    pub static ref CSOB_TRANSACTION: Regex = Regex::new(
        r"(?is)dne\s+(\d{1,2})\.(\d{1,2})\.(2\d{3}).+?částka\s+([+-]?\d+(?:,\d+)?).+?VS\s+(\d+)"
    ).unwrap();
}
