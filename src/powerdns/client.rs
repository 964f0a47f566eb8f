use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use super::ZoneApi;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::powerdns::types::*;

#[derive(Clone)]
pub struct PowerDnsClient {
    http: Client,
    base_url: String, // e.g. "http://127.0.0.1:8081/api/v1"
    api_key: String,
    server_id: String, // usually "localhost"
}

impl PowerDnsClient {
    pub fn with_http(
        http: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        server_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            server_id: server_id.into(),
        }
    }

    /// Build a client from connection settings, honoring `skip_tls_verify` when a TLS
    /// backend is compiled in.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(feature = "https-client")]
        {
            builder = builder.danger_accept_invalid_certs(config.skip_tls_verify);
        }
        #[cfg(not(feature = "https-client"))]
        {
            if config.skip_tls_verify {
                tracing::warn!("skip_tls_verify has no effect without the https-client feature");
            }
        }

        Ok(Self::with_http(
            builder.build()?,
            config.api_base_url(),
            &config.api_key,
            &config.server_id,
        ))
    }

    fn auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-API-Key", &self.api_key)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/servers/{}/{}",
            self.base_url,
            self.server_id,
            path.trim_start_matches('/')
        )
    }

    /// Map a non-success reply onto the error kinds callers tell apart.
    async fn check(res: Response, zone: &str) -> Result<Response> {
        match res.status() {
            status if status.is_success() => Ok(res),
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            StatusCode::NOT_FOUND => Err(Error::NotFound {
                zone: zone.to_string(),
            }),
            status => {
                let body = res.text().await.unwrap_or_default();
                Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

#[async_trait]
impl ZoneApi for PowerDnsClient {
    async fn get_zone(&self, name: &str, with_rrsets: bool) -> Result<PdnsZone> {
        let url = self.url(&format!("zones/{}", name));
        debug!(%url, "GET zone");
        let res = self
            .auth_header(self.http.get(url))
            .query(&[("rrsets", with_rrsets)])
            .send()
            .await?;
        let res = Self::check(res, name).await?;
        Ok(res.json::<PdnsZone>().await?)
    }

    async fn create_zone(&self, z: &PdnsZoneCreate) -> Result<()> {
        let url = self.url("zones");
        debug!(%url, zone = %z.name, "POST zone");
        let res = self.auth_header(self.http.post(url)).json(z).send().await?;
        if res.status() == StatusCode::CONFLICT {
            return Err(Error::ZoneAlreadyExists {
                zone: z.name.clone(),
            });
        }
        Self::check(res, &z.name).await?;
        Ok(())
    }

    async fn update_zone(&self, name: &str, attrs: &PdnsZoneUpdate) -> Result<()> {
        let url = self.url(&format!("zones/{}", name));
        debug!(%url, kind = %attrs.kind, dnssec = attrs.dnssec, "PUT zone");
        let res = self
            .auth_header(self.http.put(url))
            .json(attrs)
            .send()
            .await?;
        Self::check(res, name).await?;
        Ok(())
    }

    async fn patch_rrsets(&self, zone_name: &str, rrsets: &[PdnsRrset]) -> Result<()> {
        #[derive(Serialize)]
        struct PatchBody<'a> {
            rrsets: &'a [PdnsRrset],
        }

        let url = self.url(&format!("zones/{}", zone_name));
        debug!(%url, rrsets = rrsets.len(), "PATCH zone");
        let body = PatchBody { rrsets };
        let res = self
            .auth_header(self.http.patch(url))
            .json(&body)
            .send()
            .await?;
        Self::check(res, zone_name).await?;
        Ok(())
    }

    async fn delete_zone(&self, name: &str) -> Result<()> {
        let url = self.url(&format!("zones/{}", name));
        debug!(%url, "DELETE zone");
        let res = self.auth_header(self.http.delete(url)).send().await?;
        Self::check(res, name).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
