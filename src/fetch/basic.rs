use super::client::HttpClient;
use async_trait::async_trait;

use crate::config::DashboardConfig;

pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// Builds a client using the request and connect timeouts from `config`.
    pub fn new(config: &DashboardConfig) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self(inner))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
