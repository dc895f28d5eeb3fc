use crate::domain::model::FilterOutcome;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_url(&self) -> &str;
    fn career_section_url(&self) -> &str;
    fn output_file(&self) -> &str;
    fn fetch_detail(&self) -> bool;
    fn request_delay_ms(&self) -> u64;
    fn timeout_secs(&self) -> u64;
}

/// Upstream feed retrieval, including the cookie-acquiring warm-up request.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn warm_session(&self, career_section_url: &str);
    async fn fetch_feed(&self, url: &str) -> Result<String>;
}

/// Fetches one job detail page, returning its raw body.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, source: String) -> Result<FilterOutcome>;
    async fn load(&self, outcome: &FilterOutcome) -> Result<String>;
}
