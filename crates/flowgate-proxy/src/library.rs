//! Outbound HTTP client for proxy→library requests.
//!
//! The host library announces its listen address in `InitializeRequest`;
//! every proxy-initiated request (workflow/activity invokes) is a `PUT` to
//! that address with the proxy media type, mirroring the inbound contract.

use std::sync::RwLock;

use reqwest::header::CONTENT_TYPE as CONTENT_TYPE_HEADER;
use reqwest::Client;

use flowgate_core::error::{FlowgateError, Result};
use flowgate_core::protocol::CONTENT_TYPE;

pub struct LibraryClient {
    http: Client,
    address: RwLock<Option<String>>,
}

impl LibraryClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| FlowgateError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self {
            http,
            address: RwLock::new(None),
        })
    }

    /// Record the library's `host:port` reply endpoint.
    pub fn set_address(&self, address: String) {
        if let Ok(mut slot) = self.address.write() {
            *slot = Some(address);
        }
    }

    pub fn address(&self) -> Option<String> {
        self.address.read().ok().and_then(|slot| slot.clone())
    }

    /// Send one encoded message to the library. The reply arrives later as a
    /// separate inbound exchange and is matched through the operations map.
    pub async fn send(&self, body: Vec<u8>) -> Result<()> {
        let address = self.address().ok_or_else(|| {
            FlowgateError::Correlation("library address not initialized".into())
        })?;

        let url = format!("http://{address}/");
        let response = self
            .http
            .put(&url)
            .header(CONTENT_TYPE_HEADER, CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%address, error = %e, "library request failed");
                FlowgateError::Engine(format!("library request failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(FlowgateError::Engine(format!(
                "library replied with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
