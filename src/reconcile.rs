//! Drives the engine against a [`ZoneApi`]: create, read, plan, update and delete a zone.
//!
//! The caller must make sure only one reconciliation runs per zone at a time; two interleaved
//! passes can both read the same serial and write the same successor.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::powerdns::ZoneApi;
use crate::powerdns::types::{PdnsRrset, PdnsZoneCreate, PdnsZoneUpdate};
use crate::zone::ZoneDesiredState;
use crate::zone::project::project;
use crate::zone::synth::{RecordUpdate, records_changed, synthesize_create, synthesize_update};

/// What an update pass would do, computed without talking to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonePlan {
    /// RRset changes, present when nameservers or SOA parameters differ.
    pub records: Option<RecordUpdate>,
    /// Kind or DNSSEC flag differ and need a zone PUT.
    pub attributes_changed: bool,
}

impl ZonePlan {
    pub fn is_empty(&self) -> bool {
        self.records.is_none() && !self.attributes_changed
    }
}

pub fn plan(
    desired: &ZoneDesiredState,
    previous: &ZoneDesiredState,
    today: NaiveDate,
) -> Result<ZonePlan> {
    let records = if records_changed(desired, previous) {
        Some(synthesize_update(desired, previous, today)?)
    } else {
        None
    };

    Ok(ZonePlan {
        records,
        attributes_changed: desired.attributes_differ(previous),
    })
}

/// A zone name change cannot be expressed as RRset or attribute changes; the old zone has to
/// be deleted and the new one created.
pub fn requires_replace(desired: &ZoneDesiredState, previous: &ZoneDesiredState) -> bool {
    !desired.name.eq_ignore_ascii_case(&previous.name)
}

/// Whether the live projection disagrees with what was last applied.
pub fn drifted(live: &ZoneDesiredState, applied: &ZoneDesiredState) -> bool {
    records_changed(live, applied) || live.attributes_differ(applied)
}

pub struct Reconciler<A> {
    api: A,
}

impl<A: ZoneApi> Reconciler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Create the zone. Fails with [`Error::ZoneAlreadyExists`] when the server already has it.
    pub async fn create(
        &self,
        desired: &ZoneDesiredState,
        today: NaiveDate,
    ) -> Result<ZoneDesiredState> {
        match self.api.get_zone(&desired.name, false).await {
            Ok(_) => {
                return Err(Error::ZoneAlreadyExists {
                    zone: desired.name.clone(),
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let (payload, serial) = synthesize_create(desired, today)?;
        self.api
            .create_zone(&PdnsZoneCreate::from(&payload))
            .await?;

        info!(
            zone = %desired.name,
            serial = %serial,
            rrsets = payload.rrsets.len(),
            "zone created"
        );

        Ok(ZoneDesiredState {
            serial,
            ..desired.clone()
        })
    }

    /// Fetch the live zone and project it onto `prior`.
    pub async fn read(&self, prior: &ZoneDesiredState) -> Result<ZoneDesiredState> {
        let raw = self.api.get_zone(&prior.name, true).await?;
        project(&raw, prior)
    }

    /// Converge the server from `previous` to `desired` and return the new applied state.
    ///
    /// Fails with [`Error::ZoneRenamed`] when the two snapshots name different zones; use
    /// [`Reconciler::replace`] for that.
    pub async fn update(
        &self,
        desired: &ZoneDesiredState,
        previous: &ZoneDesiredState,
        today: NaiveDate,
    ) -> Result<ZoneDesiredState> {
        if requires_replace(desired, previous) {
            return Err(Error::ZoneRenamed {
                from: previous.name.clone(),
                to: desired.name.clone(),
            });
        }

        let plan = plan(desired, previous, today)?;
        let mut applied = ZoneDesiredState {
            serial: previous.serial.clone(),
            ..desired.clone()
        };

        if plan.is_empty() {
            debug!(zone = %desired.name, "zone already up to date");
            return Ok(applied);
        }

        if let Some(records) = plan.records {
            let rrsets: Vec<PdnsRrset> = records.mutations.iter().map(PdnsRrset::from).collect();
            debug!(zone = %desired.name, rrsets = ?rrsets, "updating records");
            self.api.patch_rrsets(&desired.name, &rrsets).await?;
            info!(
                zone = %desired.name,
                serial = %records.serial,
                rrsets = rrsets.len(),
                "zone records updated"
            );
            applied.serial = records.serial;
        }

        if plan.attributes_changed {
            let attrs = PdnsZoneUpdate {
                kind: desired.kind.as_str().into(),
                dnssec: desired.dnssec,
            };
            self.api.update_zone(&desired.name, &attrs).await?;
            info!(
                zone = %desired.name,
                kind = %desired.kind,
                dnssec = desired.dnssec,
                "zone attributes updated"
            );
        }

        Ok(applied)
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete_zone(name).await?;
        info!(zone = %name, "zone deleted");
        Ok(())
    }

    /// Delete the zone `previous` names, then create `desired` from scratch.
    ///
    /// A previous zone already gone from the server is not an error.
    pub async fn replace(
        &self,
        desired: &ZoneDesiredState,
        previous: &ZoneDesiredState,
        today: NaiveDate,
    ) -> Result<ZoneDesiredState> {
        info!(from = %previous.name, to = %desired.name, "replacing zone");
        match self.delete(&previous.name).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(zone = %previous.name, "previous zone already absent");
            }
            Err(e) => return Err(e),
        }
        self.create(desired, today).await
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
