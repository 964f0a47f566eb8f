//! Desired-state data model for a PowerDNS zone and the pure reconciliation engine over it.
//!
//! Nothing in this module performs I/O. The submodules take plain snapshots by reference and
//! return new values, so a pass can be replayed deterministically in tests.

pub mod diff;
pub mod names;
pub mod project;
pub mod serial;
pub mod synth;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use names::normalize;

pub const DEFAULT_SOA_REFRESH: u32 = 86400;
pub const DEFAULT_SOA_RETRY: u32 = 7200;
pub const DEFAULT_SOA_EXPIRE: u32 = 4_000_000;
pub const DEFAULT_SOA_TTL: u32 = 11200;

fn default_true() -> bool {
    true
}

fn default_refresh() -> u32 {
    DEFAULT_SOA_REFRESH
}

fn default_retry() -> u32 {
    DEFAULT_SOA_RETRY
}

fn default_expire() -> u32 {
    DEFAULT_SOA_EXPIRE
}

fn default_ttl() -> u32 {
    DEFAULT_SOA_TTL
}

/// One authoritative nameserver of the zone. Identity is the hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserverEntry {
    /// Relative to the zone unless it ends with '.'
    pub hostname: String,
    pub address: String,
    /// When false no A/AAAA record is managed for this nameserver.
    #[serde(default = "default_true")]
    pub create_record: bool,
}

impl NameserverEntry {
    pub fn new(hostname: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            address: address.into(),
            create_record: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaParameters {
    /// Responsible party, relative to the zone unless it ends with '.'
    pub rname: String,
    #[serde(default = "default_refresh")]
    pub refresh: u32,
    #[serde(default = "default_retry")]
    pub retry: u32,
    #[serde(default = "default_expire")]
    pub expire: u32,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default = "default_true")]
    pub create_record: bool,
}

impl SoaParameters {
    pub fn new(rname: impl Into<String>) -> Self {
        Self {
            rname: rname.into(),
            refresh: DEFAULT_SOA_REFRESH,
            retry: DEFAULT_SOA_RETRY,
            expire: DEFAULT_SOA_EXPIRE,
            ttl: DEFAULT_SOA_TTL,
            create_record: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    #[default]
    Native,
    Master,
    Slave,
    Producer,
    Consumer,
}

impl ZoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::Native => "Native",
            ZoneKind::Master => "Master",
            ZoneKind::Slave => "Slave",
            ZoneKind::Producer => "Producer",
            ZoneKind::Consumer => "Consumer",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Native" => Ok(ZoneKind::Native),
            "Master" => Ok(ZoneKind::Master),
            "Slave" => Ok(ZoneKind::Slave),
            "Producer" => Ok(ZoneKind::Producer),
            "Consumer" => Ok(ZoneKind::Consumer),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }
}

/// Declared shape of a zone, as supplied by the user or as last applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDesiredState {
    /// Fully-qualified, dot-terminated zone name.
    pub name: String,
    #[serde(default)]
    pub kind: ZoneKind,
    #[serde(default)]
    pub dnssec: bool,
    /// First entry is the primary nameserver used as SOA MNAME.
    pub nameservers: Vec<NameserverEntry>,
    pub soa: SoaParameters,
    /// `YYYYMMDDnn`, or empty when no SOA record is managed.
    #[serde(default)]
    pub serial: String,
}

impl ZoneDesiredState {
    /// Copy with every nameserver hostname and the SOA rname made fully-qualified.
    ///
    /// Two snapshots must be normalized before being compared for equality.
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        for ns in &mut out.nameservers {
            ns.hostname = normalize(&ns.hostname, &self.name);
        }
        out.soa.rname = normalize(&self.soa.rname, &self.name);
        out
    }

    /// Whether the nameserver list or SOA parameters differ between two normalized snapshots.
    pub fn records_differ(&self, other: &ZoneDesiredState) -> bool {
        self.nameservers != other.nameservers || self.soa != other.soa
    }

    /// Whether the zone-level attributes (kind, DNSSEC flag) differ.
    pub fn attributes_differ(&self, other: &ZoneDesiredState) -> bool {
        self.kind != other.kind || self.dnssec != other.dnssec
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Ns,
    Soa,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Ns => "NS",
            RecordType::Soa => "SOA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Replace,
    Delete,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Replace => "REPLACE",
            ChangeType::Delete => "DELETE",
        }
    }
}

/// One RRset change. REPLACE carries the complete desired record set for `name`/`rtype`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrsetMutation {
    pub name: String,
    #[serde(rename = "type")]
    pub rtype: RecordType,
    #[serde(rename = "changetype")]
    pub change_type: ChangeType,
    pub records: Vec<String>,
}

impl RrsetMutation {
    pub fn replace(name: impl Into<String>, rtype: RecordType, records: Vec<String>) -> Self {
        Self {
            name: name.into(),
            rtype,
            change_type: ChangeType::Replace,
            records,
        }
    }

    pub fn delete(name: impl Into<String>, rtype: RecordType, records: Vec<String>) -> Self {
        Self {
            name: name.into(),
            rtype,
            change_type: ChangeType::Delete,
            records,
        }
    }
}

/// Everything needed to create a zone from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZonePayload {
    pub name: String,
    pub kind: ZoneKind,
    pub dnssec: bool,
    pub nameservers: Vec<String>,
    pub rrsets: Vec<RrsetMutation>,
}
