//! HTTP/1 transport — POSTs one JSON record per send.
//!
//! Opens a fresh connection for every record. Sampling intervals are
//! long (seconds to minutes), so connection reuse buys nothing and a
//! stale pooled connection would be one more failure mode.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use tracing::debug;

use promrelay_metrics::MetricRecord;

use crate::{MetricTransport, TransportError};

/// Submit path served by the exporter daemon.
pub const SUBMIT_PATH: &str = "/send-metrics";

/// Default port the exporter daemon listens on.
pub const DEFAULT_PORT: u16 = 9394;

/// Delivers records to an exporter daemon over HTTP/1.
pub struct HttpTransport {
    /// Exporter address, `host:port`.
    address: String,
}

impl HttpTransport {
    /// Create a transport targeting the exporter at `address` (`host:port`).
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Transport targeting an exporter on localhost at the default port.
    pub fn local() -> Self {
        Self::new(format!("127.0.0.1:{DEFAULT_PORT}"))
    }

    async fn post(&self, body: Vec<u8>) -> Result<u16, TransportError> {
        let stream = tokio::net::TcpStream::connect(&self.address)
            .await
            .map_err(|source| TransportError::Connect {
                address: self.address.clone(),
                source,
            })?;

        let io = hyper_util::rt::TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            let _ = conn.await;
        });

        let uri = format!("http://{}{}", self.address, SUBMIT_PATH);
        let req = http::Request::builder()
            .method("POST")
            .uri(&uri)
            .header("host", &self.address)
            .header("content-type", "application/json")
            .header("user-agent", "promrelay/0.1")
            .body(Full::new(Bytes::from(body)))
            .unwrap();

        let resp = sender.send_request(req).await?;
        debug!(status = %resp.status(), %uri, "metric record delivered");
        Ok(resp.status().as_u16())
    }
}

#[async_trait]
impl MetricTransport for HttpTransport {
    async fn send(&self, record: MetricRecord) -> Result<(), TransportError> {
        let body = serde_json::to_vec(&record)?;
        let status = self.post(body).await?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(TransportError::Status(status))
        }
    }
}
