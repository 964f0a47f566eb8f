//! Reads a live PowerDNS zone back into the desired-state shape for drift detection.

use tracing::debug;

use super::names::{normalize, strip_zone_suffix};
use super::{NameserverEntry, RecordType, SoaParameters, ZoneDesiredState, ZoneKind};
use crate::error::{Error, Result};
use crate::powerdns::types::{PdnsRrset, PdnsZone};

/// SOA fields as they appear in the record content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaContent {
    pub primary_ns: String,
    pub rname: String,
    pub serial: u64,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub ttl: u32,
}

fn numeric_field<T: std::str::FromStr>(content: &str, field: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::malformed_soa(content, format!("{field} '{value}' is not a number")))
}

/// Parse `mname rname serial refresh retry expire ttl`, single-space separated.
pub fn parse_soa_content(content: &str) -> Result<SoaContent> {
    let fields: Vec<&str> = content.split(' ').collect();
    let [primary_ns, rname, serial, refresh, retry, expire, ttl] = fields[..] else {
        return Err(Error::malformed_soa(
            content,
            format!("expected 7 fields, found {}", fields.len()),
        ));
    };

    Ok(SoaContent {
        primary_ns: primary_ns.to_string(),
        rname: rname.to_string(),
        serial: numeric_field(content, "serial", serial)?,
        refresh: numeric_field(content, "refresh", refresh)?,
        retry: numeric_field(content, "retry", retry)?,
        expire: numeric_field(content, "expire", expire)?,
        ttl: numeric_field(content, "ttl", ttl)?,
    })
}

fn is_address_rrset(rrset: &PdnsRrset) -> bool {
    rrset.rrtype == RecordType::A.as_str() || rrset.rrtype == RecordType::Aaaa.as_str()
}

/// Project `raw` onto the shape of `prior`.
///
/// Zone attributes and SOA values come from the server. Nameservers are matched against
/// A/AAAA RRsets by exact name and address; a managed nameserver without its record is an
/// error, an unmanaged one is carried over from `prior` untouched.
pub fn project(raw: &PdnsZone, prior: &ZoneDesiredState) -> Result<ZoneDesiredState> {
    let zone = raw.name.as_str();
    let kind: ZoneKind = raw.kind.parse()?;
    let rrsets = raw.rrsets.as_deref().unwrap_or_default();

    let soa_rrset = rrsets
        .iter()
        .find(|r| r.rrtype == RecordType::Soa.as_str() && r.name == zone)
        .ok_or_else(|| Error::SoaNotFound {
            zone: zone.to_string(),
        })?;
    let content = soa_rrset
        .records
        .first()
        .map(|r| r.content.as_str())
        .ok_or_else(|| Error::malformed_soa("", "SOA RRset has no records"))?;
    let parsed = parse_soa_content(content)?;

    let soa = SoaParameters {
        rname: strip_zone_suffix(&parsed.rname, zone),
        refresh: parsed.refresh,
        retry: parsed.retry,
        expire: parsed.expire,
        ttl: parsed.ttl,
        create_record: prior.soa.create_record,
    };

    let nameservers = prior
        .nameservers
        .iter()
        .map(|ns| {
            let fqdn = normalize(&ns.hostname, zone);
            let found = rrsets.iter().find(|r| {
                is_address_rrset(r)
                    && r.name == fqdn
                    && r.records.iter().any(|rec| rec.content == ns.address)
            });

            match found {
                Some(rrset) => Ok(NameserverEntry {
                    hostname: strip_zone_suffix(&rrset.name, zone),
                    address: ns.address.clone(),
                    create_record: ns.create_record,
                }),
                None if ns.create_record => Err(Error::RecordNotFound { hostname: fqdn }),
                None => Ok(ns.clone()),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(zone, serial = raw.serial, "projected live zone");

    Ok(ZoneDesiredState {
        name: raw.name.clone(),
        kind,
        dnssec: raw.dnssec,
        nameservers,
        soa,
        serial: raw.serial.to_string(),
    })
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
