use std::path::Path;

use anyhow::Context;

use crate::validation::validate_zone;
use crate::zone::ZoneDesiredState;

/// How to reach the PowerDNS API.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String, // "https://pdns.example.com", without /api/v1
    pub api_key: String,
    pub server_id: String, // usually "localhost"
    pub skip_tls_verify: bool,
}

impl ClientConfig {
    /// Versioned API root (e.g. https://pdns.example.com/api/v1).
    pub fn api_base_url(&self) -> String {
        format!("{}/api/v1", self.endpoint.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("skip_tls_verify", &self.skip_tls_verify)
            .finish()
    }
}

/// Parse a desired zone from JSON and validate it. Any `serial` in the input is ignored.
pub fn parse_zone_config(json: &str) -> anyhow::Result<ZoneDesiredState> {
    let mut zone: ZoneDesiredState =
        serde_json::from_str(json).context("invalid zone configuration")?;
    zone.serial.clear();
    validate_zone(&zone)?;
    Ok(zone)
}

/// Load a desired zone from a JSON file.
pub fn load_zone_config(path: &Path) -> anyhow::Result<ZoneDesiredState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read zone config {}", path.display()))?;
    parse_zone_config(&json).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
