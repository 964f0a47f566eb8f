//! Crate entrypoint wiring together the zone engine, the PowerDNS client, and state handling.
//!
//! The engine in [`zone`] is pure: it diffs nameserver lists, sequences SOA serials,
//! synthesizes RRset changes and projects live zones back into desired-state shape.
//! [`reconcile`] runs it against any [`powerdns::ZoneApi`], and [`state`] keeps the last
//! applied snapshot between runs.

pub mod config;
pub mod error;
pub mod powerdns;
pub mod reconcile;
pub mod state;
pub mod validation;
pub mod zone;

pub use error::{Error, Result};
pub use powerdns::ZoneApi;
pub use powerdns::client::PowerDnsClient;
pub use reconcile::{Reconciler, ZonePlan};
pub use zone::{
    ChangeType, NameserverEntry, RecordType, RrsetMutation, SoaParameters, ZoneDesiredState,
    ZoneKind, ZonePayload,
};

/// Today's date in UTC, the calendar the serial prefix is based on.
pub fn today_utc() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
