use serde::{Deserialize, Serialize};

use crate::zone::{RrsetMutation, ZonePayload};

/// TTL given to every RRset this crate writes.
pub const RRSET_TTL: u32 = 3600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdnsZone {
    #[serde(default)]
    pub id: String, // "/api/.../zones/example.com."
    pub name: String, // "example.com."
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>, // "Zone"
    pub kind: String, // "Native", etc.
    #[serde(default)]
    pub dnssec: bool,
    #[serde(default)]
    pub serial: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrsets: Option<Vec<PdnsRrset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRrset {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: String, // "A", "NS", ...
    #[serde(default)]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<String>, // "REPLACE" / "DELETE" when patching
    #[serde(default)]
    pub records: Vec<PdnsRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<PdnsComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsRecord {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
}

impl PdnsRecord {
    pub fn enabled(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsComment {
    pub content: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub modified_at: i64,
}

// Used when creating a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdnsZoneCreate {
    pub name: String, // "example.com."
    pub kind: String, // "Native"
    #[serde(default)]
    pub dnssec: bool,
    pub nameservers: Vec<String>, // ["ns1.example.com.", "ns2.example.net."]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrsets: Vec<PdnsRrset>,
}

// Body of PUT zones/{zone}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdnsZoneUpdate {
    pub kind: String,
    pub dnssec: bool,
}

impl From<&RrsetMutation> for PdnsRrset {
    fn from(m: &RrsetMutation) -> Self {
        Self {
            name: m.name.clone(),
            rrtype: m.rtype.as_str().into(),
            ttl: RRSET_TTL,
            changetype: Some(m.change_type.as_str().into()),
            records: m.records.iter().map(PdnsRecord::enabled).collect(),
            comments: Vec::new(),
        }
    }
}

impl From<&ZonePayload> for PdnsZoneCreate {
    fn from(p: &ZonePayload) -> Self {
        Self {
            name: p.name.clone(),
            kind: p.kind.as_str().into(),
            dnssec: p.dnssec,
            nameservers: p.nameservers.clone(),
            // initial rrsets are plain contents, not patch operations
            rrsets: p
                .rrsets
                .iter()
                .map(|m| PdnsRrset {
                    changetype: None,
                    ..PdnsRrset::from(m)
                })
                .collect(),
        }
    }
}
