// src/error.rs
use thiserror::Error;

/// Every failure the engine, the PowerDNS boundary, or the reconcile driver can report.
///
/// Each variant maps to exactly one diagnostic so callers can tell them apart without
/// string matching.
#[derive(Debug, Error)]
pub enum Error {
    #[error("'{address}' is not a valid IPv4 or IPv6 address")]
    AddressParse { address: String },

    #[error("serial '{serial}' has a non-numeric daily sequence")]
    InvalidSerial { serial: String },

    #[error("serial for {date} would exceed 99 changes in one day")]
    SerialOverflow { date: String },

    #[error("malformed SOA content '{content}': {reason}")]
    MalformedSoa { content: String, reason: String },

    #[error("no SOA record found for zone {zone}")]
    SoaNotFound { zone: String },

    #[error("failed to read A or AAAA record for nameserver {hostname}")]
    RecordNotFound { hostname: String },

    #[error("zone {zone} has no nameservers")]
    NoNameservers { zone: String },

    #[error("unsupported zone kind '{0}'")]
    UnsupportedKind(String),

    #[error("zone not found: {zone}")]
    NotFound { zone: String },

    #[error("not authorized to access PowerDNS API")]
    Unauthorized,

    #[error("zone {zone} already exists, import it instead")]
    ZoneAlreadyExists { zone: String },

    #[error("zone {from} cannot be renamed to {to} in place, it must be replaced")]
    ZoneRenamed { from: String, to: String },

    #[error("PowerDNS API returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("PowerDNS request failed")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub fn malformed_soa(content: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedSoa {
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// True when the remote server reported the zone as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
