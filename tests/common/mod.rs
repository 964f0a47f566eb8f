// Common test utilities for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use pdns_zone_sync::powerdns::types::{
    PdnsRecord, PdnsRrset, PdnsZone, PdnsZoneCreate, PdnsZoneUpdate, RRSET_TTL,
};
use pdns_zone_sync::{
    Error, NameserverEntry, Result, SoaParameters, ZoneApi, ZoneDesiredState, ZoneKind,
};

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The zone used across the integration tests, with relative names.
pub fn example_zone() -> ZoneDesiredState {
    ZoneDesiredState {
        name: "example.com.".into(),
        kind: ZoneKind::Native,
        dnssec: false,
        nameservers: vec![
            NameserverEntry::new("ns1", "10.0.0.1"),
            NameserverEntry::new("ns2", "10.0.0.2"),
        ],
        soa: SoaParameters::new("hostmaster"),
        serial: String::new(),
    }
}

/// In-memory stand-in for a PowerDNS server.
///
/// Creation adds the apex NS RRset from the nameserver list, PATCH replaces or drops whole
/// RRsets, and the zone serial follows the SOA record content.
#[derive(Default)]
pub struct FakePdns {
    zones: Mutex<HashMap<String, PdnsZone>>,
    pub patches: Mutex<Vec<Vec<PdnsRrset>>>,
    pub updates: Mutex<Vec<PdnsZoneUpdate>>,
    pub unauthorized: AtomicBool,
}

impl FakePdns {
    pub fn zone(&self, name: &str) -> Option<PdnsZone> {
        self.zones.lock().unwrap().get(name).cloned()
    }

    pub fn insert(&self, zone: PdnsZone) {
        self.zones.lock().unwrap().insert(zone.name.clone(), zone);
    }

    pub fn deny_all(&self) {
        self.unauthorized.store(true, Ordering::SeqCst);
    }

    pub fn patch_count(&self) -> usize {
        self.patches.lock().unwrap().len()
    }

    fn authorize(&self) -> Result<()> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }
}

fn serial_of(rrsets: &[PdnsRrset], zone: &str) -> u64 {
    rrsets
        .iter()
        .find(|r| r.rrtype == "SOA" && r.name == zone)
        .and_then(|r| r.records.first())
        .and_then(|rec| rec.content.split(' ').nth(2))
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl ZoneApi for FakePdns {
    async fn get_zone(&self, name: &str, with_rrsets: bool) -> Result<PdnsZone> {
        self.authorize()?;
        let mut zone = self.zone(name).ok_or_else(|| Error::NotFound {
            zone: name.to_string(),
        })?;
        if !with_rrsets {
            zone.rrsets = None;
        }
        Ok(zone)
    }

    async fn create_zone(&self, z: &PdnsZoneCreate) -> Result<()> {
        self.authorize()?;
        if self.zone(&z.name).is_some() {
            return Err(Error::ZoneAlreadyExists {
                zone: z.name.clone(),
            });
        }

        let mut rrsets = z.rrsets.clone();
        rrsets.push(PdnsRrset {
            name: z.name.clone(),
            rrtype: "NS".into(),
            ttl: RRSET_TTL,
            changetype: None,
            records: z.nameservers.iter().map(PdnsRecord::enabled).collect(),
            comments: Vec::new(),
        });

        self.insert(PdnsZone {
            id: z.name.clone(),
            name: z.name.clone(),
            zone_type: Some("Zone".into()),
            kind: z.kind.clone(),
            dnssec: z.dnssec,
            serial: serial_of(&rrsets, &z.name),
            rrsets: Some(rrsets),
        });
        Ok(())
    }

    async fn update_zone(&self, name: &str, attrs: &PdnsZoneUpdate) -> Result<()> {
        self.authorize()?;
        let mut zones = self.zones.lock().unwrap();
        let zone = zones.get_mut(name).ok_or_else(|| Error::NotFound {
            zone: name.to_string(),
        })?;
        zone.kind = attrs.kind.clone();
        zone.dnssec = attrs.dnssec;
        self.updates.lock().unwrap().push(attrs.clone());
        Ok(())
    }

    async fn patch_rrsets(&self, zone_name: &str, rrsets: &[PdnsRrset]) -> Result<()> {
        self.authorize()?;
        let mut zones = self.zones.lock().unwrap();
        let zone = zones.get_mut(zone_name).ok_or_else(|| Error::NotFound {
            zone: zone_name.to_string(),
        })?;

        let live = zone.rrsets.get_or_insert_with(Vec::new);
        for change in rrsets {
            live.retain(|r| !(r.name == change.name && r.rrtype == change.rrtype));
            if change.changetype.as_deref() == Some("REPLACE") {
                live.push(PdnsRrset {
                    changetype: None,
                    ..change.clone()
                });
            }
        }
        zone.serial = serial_of(live, zone_name).max(zone.serial);

        self.patches.lock().unwrap().push(rrsets.to_vec());
        Ok(())
    }

    async fn delete_zone(&self, name: &str) -> Result<()> {
        self.authorize()?;
        self.zones
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound {
                zone: name.to_string(),
            })
    }
}
