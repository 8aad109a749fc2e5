// REST RPC client
//
// Wraps `reqwest::Client` with the Junos REST API conventions: one GET per
// operational RPC (`/rpc/<name>@format=json`) and a single batched POST to
// `/rpc` for the configuration sequence. Replies are flattened by
// `crate::models` before the caller sees them.

use std::collections::BTreeMap;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::{Error, preview};
use crate::models::{self, LldpNeighborEntry, PhysicalInterfaceEntry};
use crate::rest::{multipart, xnm};
use crate::transport::TransportConfig;

const LLDP_RPC: &str = "get-lldp-neighbors-information";
const INTERFACE_RPC: &str = "get-interface-information";

/// HTTP client for the Junos REST API service (`system services rest`).
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout_secs: u64,
}

impl RestClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the REST service root, e.g. `http://r1.example.net:3000`
    /// (see [`RestClient::endpoint`]).
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base_url,
            credentials,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            timeout_secs: 0,
        }
    }

    /// Build the REST service root for a device.
    pub fn endpoint(scheme: &str, host: &str, port: u16) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{scheme}://{host}:{port}"))?)
    }

    /// The REST service root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Operational RPCs ─────────────────────────────────────────────

    /// Current LLDP neighbor table.
    pub async fn lldp_neighbors(&self) -> Result<Vec<LldpNeighborEntry>, Error> {
        let body = self.get_rpc(LLDP_RPC, &[]).await?;
        models::parse_lldp_neighbors(&body)
    }

    /// Physical interfaces with their configured descriptions.
    pub async fn interface_descriptions(&self) -> Result<Vec<PhysicalInterfaceEntry>, Error> {
        let body = self.get_rpc(INTERFACE_RPC, &[("descriptions", "")]).await?;
        models::parse_interface_descriptions(&body)
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Merge new interface descriptions and commit them in one private
    /// configuration session.
    pub async fn load_descriptions(
        &self,
        changes: &BTreeMap<String, String>,
        comment: &str,
    ) -> Result<(), Error> {
        let mut url = self.base_url.join("/rpc")?;
        url.query_pairs_mut().append_pair("stop-on-error", "1");
        debug!("POST {} ({} descriptions)", url, changes.len());

        let request = self
            .http
            .post(url)
            .header(ACCEPT, "application/xml")
            .header(CONTENT_TYPE, "application/xml")
            .body(xnm::load_descriptions_batch(changes, comment));
        let resp = self
            .credentials
            .apply(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let content_type = content_type(resp.headers());
        let body = self.checked_body("load-configuration", resp).await?;
        let parts = multipart::split_parts(&content_type, &body);

        let mut problems = Vec::new();
        for part in &parts {
            match part {
                Some(xml) => {
                    for diagnostic in xnm::scan_diagnostics(xml) {
                        match diagnostic.severity {
                            xnm::Severity::Error => problems.push(diagnostic.message),
                            xnm::Severity::Warning => warn!("{}", diagnostic.message),
                        }
                    }
                }
                None => problems.push("unable to parse an RPC reply".into()),
            }
        }

        if parts.len() != xnm::LOAD_BATCH_RPCS {
            problems.push(format!(
                "expected {} replies, got {}",
                xnm::LOAD_BATCH_RPCS,
                parts.len()
            ));
        }

        if problems.is_empty() {
            debug!("configuration committed");
            Ok(())
        } else {
            Err(Error::Commit {
                message: problems.join("; "),
            })
        }
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn rpc_url(&self, rpc: &str, query: &[(&str, &str)]) -> Result<Url, Error> {
        let mut url = self.base_url.join(&format!("/rpc/{rpc}@format=json"))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET an operational RPC and return the JSON body.
    ///
    /// Junos falls back to an XML error document when the RPC fails, even
    /// when JSON was requested.
    async fn get_rpc(&self, rpc: &str, query: &[(&str, &str)]) -> Result<String, Error> {
        let url = self.rpc_url(rpc, query)?;
        debug!("GET {}", url);

        let resp = self
            .credentials
            .apply(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let content_type = content_type(resp.headers());
        let body = self.checked_body(rpc, resp).await?;

        if content_type.starts_with("application/xml") {
            let errors = xnm::errors(&body);
            let message = if errors.is_empty() {
                "device answered with XML instead of JSON".to_owned()
            } else {
                errors.join("; ")
            };
            return Err(Error::rpc(rpc, message));
        }

        Ok(body)
    }

    async fn checked_body(&self, rpc: &str, resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: format!("{} rejected the credentials", self.base_url),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let errors = xnm::errors(&body);
            let message = if errors.is_empty() {
                format!("HTTP {status}: {}", preview(&body))
            } else {
                format!("HTTP {status}: {}", errors.join("; "))
            };
            return Err(Error::rpc(rpc, message));
        }

        resp.text().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}
