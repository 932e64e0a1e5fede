//! Wire protocol for the external pricing tool.
//!
//! The pricing service speaks JSON-RPC 2.0 over HTTP: a single `tools/call`
//! method invoking the `quote_parts` tool with the batch of components. The
//! [`ToolTransport`] trait is the seam between the client's policy (demo
//! short-circuit, retry, degrade) and the wire; tests substitute stub
//! transports here.

use async_trait::async_trait;
use kicai_core::error::PricingError;
use kicai_core::pricing::PricingQuery;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// One component's offers as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePart {
    /// Reference designator, echoing the query.
    pub reference: String,
    #[serde(default)]
    pub offers: Vec<WireOffer>,
}

/// One distributor offer as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireOffer {
    pub distributor: String,
    pub unit_price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub stock: u32,
}

fn default_currency() -> String {
    "USD".into()
}

/// Abstraction over one pricing round trip.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Quote a batch of components. One call per user turn; the
    /// implementation owns its own timeout.
    async fn call(&self, queries: &[PricingQuery]) -> Result<Vec<WirePart>, PricingError>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: RpcParams<'a>,
}

#[derive(Serialize)]
struct RpcParams<'a> {
    name: &'static str,
    arguments: RpcArguments<'a>,
}

#[derive(Serialize)]
struct RpcArguments<'a> {
    parts: &'a [PricingQuery],
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcResult {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 `tools/call` transport over HTTP.
pub struct HttpToolTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    timeout_secs: u64,
    next_id: AtomicU64,
}

impl HttpToolTransport {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, PricingError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PricingError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
            timeout_secs,
            next_id: AtomicU64::new(1),
        })
    }

    fn map_request_error(&self, e: reqwest::Error) -> PricingError {
        if e.is_timeout() {
            PricingError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            PricingError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl ToolTransport for HttpToolTransport {
    async fn call(&self, queries: &[PricingQuery]) -> Result<Vec<WirePart>, PricingError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "tools/call",
            params: RpcParams {
                name: "quote_parts",
                arguments: RpcArguments { parts: queries },
            },
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            parts = queries.len(),
            "Calling pricing tool"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(PricingError::Unauthorized(format!(
                "service returned HTTP {}",
                status.as_u16()
            )));
        }
        if status.is_server_error() {
            // 5xx is a service hiccup, classified transient
            return Err(PricingError::Transport(format!(
                "service returned HTTP {}",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(PricingError::Protocol(format!(
                "unexpected HTTP status {}",
                status.as_u16()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| PricingError::Protocol(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(PricingError::Protocol(format!(
                "{} (code {})",
                err.message, err.code
            )));
        }

        body.result
            .map(|r| r.parts)
            .ok_or_else(|| PricingError::Protocol("response carried neither result nor error".into()))
    }
}
