use async_trait::async_trait;
use reqwest::{Method, Request, Response, Url};

/// Transport seam for the data source. [`super::BasicClient`] is the real
/// implementation; tests substitute canned responses.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;

    async fn get(&self, url: Url) -> reqwest::Result<Response> {
        self.execute(Request::new(Method::GET, url)).await
    }
}
