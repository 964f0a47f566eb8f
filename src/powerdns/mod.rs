//! Boundary with the PowerDNS authoritative HTTP API.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::{PdnsRrset, PdnsZone, PdnsZoneCreate, PdnsZoneUpdate};

/// Zone operations the reconciler needs from a PowerDNS server.
#[async_trait]
pub trait ZoneApi: Send + Sync {
    async fn get_zone(&self, name: &str, with_rrsets: bool) -> Result<PdnsZone>;

    async fn create_zone(&self, zone: &PdnsZoneCreate) -> Result<()>;

    async fn update_zone(&self, name: &str, attrs: &PdnsZoneUpdate) -> Result<()>;

    /// Apply all RRset changes in one atomic PATCH.
    async fn patch_rrsets(&self, zone_name: &str, rrsets: &[PdnsRrset]) -> Result<()>;

    async fn delete_zone(&self, name: &str) -> Result<()>;
}
