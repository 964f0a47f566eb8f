//! Turns desired zone state into PowerDNS RRset changes.

use std::net::IpAddr;

use chrono::NaiveDate;
use tracing::debug;

use super::diff::diff;
use super::serial::next_serial;
use super::{
    NameserverEntry, RecordType, RrsetMutation, SoaParameters, ZoneDesiredState, ZonePayload,
};
use crate::error::{Error, Result};

/// Record changes for an existing zone, plus the serial they were computed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub mutations: Vec<RrsetMutation>,
    pub serial: String,
}

/// Pick A or AAAA from the address family.
pub fn classify_address(address: &str) -> Result<RecordType> {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Ok(RecordType::A),
        Ok(IpAddr::V6(_)) => Ok(RecordType::Aaaa),
        Err(_) => Err(Error::AddressParse {
            address: address.to_string(),
        }),
    }
}

/// SOA RDATA in presentation order: mname rname serial refresh retry expire ttl.
pub fn soa_content(primary_ns: &str, rname: &str, serial: &str, soa: &SoaParameters) -> String {
    format!(
        "{} {} {} {} {} {} {}",
        primary_ns, rname, serial, soa.refresh, soa.retry, soa.expire, soa.ttl
    )
}

fn primary_nameserver(state: &ZoneDesiredState) -> Result<&NameserverEntry> {
    state.nameservers.first().ok_or_else(|| Error::NoNameservers {
        zone: state.name.clone(),
    })
}

/// Whether two snapshots need a record pass. Both are normalized before comparing.
pub fn records_changed(desired: &ZoneDesiredState, previous: &ZoneDesiredState) -> bool {
    desired.normalized().records_differ(&previous.normalized())
}

/// Build the creation payload for a zone that does not exist yet.
///
/// Returns the payload and the serial written into its SOA, or an empty serial when the SOA
/// record is not managed.
pub fn synthesize_create(
    state: &ZoneDesiredState,
    today: NaiveDate,
) -> Result<(ZonePayload, String)> {
    let zone = &state.name;
    let state = state.normalized();
    let primary = primary_nameserver(&state)?;
    let serial = next_serial("", today)?;

    let mut rrsets = Vec::with_capacity(state.nameservers.len() + 1);

    if state.soa.create_record {
        rrsets.push(RrsetMutation::replace(
            zone.clone(),
            RecordType::Soa,
            vec![soa_content(
                &primary.hostname,
                &state.soa.rname,
                &serial,
                &state.soa,
            )],
        ));
    }

    for ns in state.nameservers.iter().filter(|ns| ns.create_record) {
        let rtype = classify_address(&ns.address)?;
        rrsets.push(RrsetMutation::replace(
            ns.hostname.clone(),
            rtype,
            vec![ns.address.clone()],
        ));
    }

    let payload = ZonePayload {
        name: zone.clone(),
        kind: state.kind,
        dnssec: state.dnssec,
        nameservers: state
            .nameservers
            .iter()
            .map(|ns| ns.hostname.clone())
            .collect(),
        rrsets,
    };

    debug!(zone = %zone, rrsets = payload.rrsets.len(), "synthesized zone payload");

    let serial = if state.soa.create_record {
        serial
    } else {
        String::new()
    };
    Ok((payload, serial))
}

/// Compute the RRset changes that move `previous` to `desired`.
///
/// Output order: nameserver address records (added or changed, then removed), the apex NS
/// set, then the SOA when it has to be rewritten. Any error aborts the whole pass.
pub fn synthesize_update(
    desired: &ZoneDesiredState,
    previous: &ZoneDesiredState,
    today: NaiveDate,
) -> Result<RecordUpdate> {
    let serial = next_serial(&previous.serial, today)?;

    let zone = &desired.name;
    let desired = desired.normalized();
    let previous = previous.normalized();
    let primary = primary_nameserver(&desired)?;

    let changes = diff(&desired.nameservers, &previous.nameservers);
    if changes.is_empty() {
        debug!(zone = %zone, "nameserver set unchanged");
    }
    let mut mutations =
        Vec::with_capacity(changes.added_or_changed.len() + changes.deleted.len() + 2);

    for ns in &changes.added_or_changed {
        let rtype = classify_address(&ns.address)?;
        let records = vec![ns.address.clone()];
        mutations.push(if ns.create_record {
            RrsetMutation::replace(ns.hostname.clone(), rtype, records)
        } else {
            RrsetMutation::delete(ns.hostname.clone(), rtype, records)
        });
    }

    for ns in &changes.deleted {
        let rtype = classify_address(&ns.address)?;
        mutations.push(RrsetMutation::delete(ns.hostname.clone(), rtype, Vec::new()));
    }

    mutations.push(RrsetMutation::replace(
        zone.clone(),
        RecordType::Ns,
        desired
            .nameservers
            .iter()
            .map(|ns| ns.hostname.clone())
            .collect(),
    ));

    let primary_moved = desired.nameservers.first() != previous.nameservers.first();
    if desired.soa != previous.soa || primary_moved {
        mutations.push(RrsetMutation::replace(
            zone.clone(),
            RecordType::Soa,
            vec![soa_content(
                &primary.hostname,
                &desired.soa.rname,
                &serial,
                &desired.soa,
            )],
        ));
    }

    debug!(
        zone = %zone,
        mutations = mutations.len(),
        serial = %serial,
        "synthesized record update"
    );

    Ok(RecordUpdate { mutations, serial })
}

#[cfg(test)]
#[path = "synth_tests.rs"]
mod tests;
