//! HTTP transport used for archive downloads and existence probes

use crate::error::{CloneError, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::io::{Read, Write};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub fn default_user_agent() -> String {
    format!("clone/{}", env!("CARGO_PKG_VERSION"))
}

/// The two network operations the rest of the crate relies on.
pub trait Transport {
    /// Stream the body behind `url` into `sink`, returning the number of bytes written.
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64>;

    /// Cheap check that `url` refers to an existing resource.
    fn probe(&self, url: &str) -> Result<()>;
}

/// Blocking `reqwest` transport. Redirects are followed.
pub struct HttpTransport {
    client: Client,
    probe_timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        probe_timeout: Duration,
        download_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(download_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| CloneError::network("<client>", e))?;
        Ok(Self { client, probe_timeout })
    }
}

impl Transport for HttpTransport {
    fn download(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        tracing::debug!("GET {url}");
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| CloneError::network(url, e))?;

        // Read failures belong to the connection, write failures to the sink.
        let mut buf = [0u8; 64 * 1024];
        let mut total = 0u64;
        loop {
            let n = match response.read(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(CloneError::network(url, err)),
            };
            sink.write_all(&buf[..n])?;
            total += n as u64;
        }
    }

    fn probe(&self, url: &str) -> Result<()> {
        let head = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .map_err(|e| CloneError::network(url, e))?;

        // Some hosts refuse HEAD on archive endpoints.
        let status = if head.status() == StatusCode::METHOD_NOT_ALLOWED {
            self.client
                .get(url)
                .timeout(self.probe_timeout)
                .send()
                .map_err(|e| CloneError::network(url, e))?
                .status()
        } else {
            head.status()
        };

        tracing::debug!("Probe {url} -> {status}");
        if status.is_success() {
            Ok(())
        } else {
            Err(CloneError::network(url, status))
        }
    }
}
