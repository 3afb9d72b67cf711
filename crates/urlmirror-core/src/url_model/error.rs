//! Parse failures for raw URL strings.

use thiserror::Error;

/// Why a raw string could not be turned into a [`UrlRecord`](super::UrlRecord).
/// Each variant carries the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    /// A scheme was required but none was recognized, or the scheme is
    /// recognized (e.g. `https:`, `mailto:`) but cannot be retrieved.
    #[error("unknown or unsupported scheme: {0}")]
    UnknownScheme(String),
    /// The authority has no host.
    #[error("invalid host name: {0}")]
    BadHost(String),
    /// The port is non-numeric, zero, or out of range.
    #[error("bad port number: {0}")]
    BadPort(String),
}
