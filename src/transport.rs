//! HTTP transport abstraction
//!
//! The façade only ever needs "GET this URL and give me the body". Keeping
//! that behind a trait lets tests substitute an in-memory robot.

use crate::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait RobotTransport: Send + Sync {
    /// Issue a GET request and return the response body as text
    ///
    /// Any response that arrives counts as success, whatever its status
    /// code. Only network-level failures are errors.
    async fn get(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed transport
///
/// No timeout is configured; requests use the client defaults.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RobotTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(body)
    }
}
