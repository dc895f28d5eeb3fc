use crate::domain::ports::{DetailFetcher, FeedSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;

// The Taleo careers portal aggressively blocks bot-like requests; a
// realistic browser identity plus the cookie-acquiring warm-up request
// keeps it from answering with 403s or login pages.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "Accept",
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        ),
    );
    headers.insert(
        "Accept-Language",
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("document"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("navigate"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("none"));
    headers.insert("Sec-Fetch-User", HeaderValue::from_static("?1"));
    headers
}

const MAX_RETRIES: u32 = 4;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Throttling and transient upstream failures worth another attempt.
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// HTTP client for both the feed document and per-listing detail pages.
/// Cookies persist across requests so the session warm-up carries over.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// Overrides the transient-failure retry policy.
    pub fn with_retry_policy(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base_delay = base_delay;
        self
    }

    /// GET with bounded retries and exponential backoff on 429/5xx and on
    /// connect or timeout failures. Other errors surface immediately.
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            let outcome = self.client.get(url).send().await;
            let transient = match &outcome {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if transient && attempt < self.max_retries {
                let delay = self.retry_base_delay * 2u32.pow(attempt);
                attempt += 1;
                tracing::warn!(
                    "Transient failure fetching {} (attempt {}/{}), retrying in {:?}",
                    url,
                    attempt,
                    self.max_retries,
                    delay
                );
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                continue;
            }

            let response = outcome?.error_for_status()?;
            return Ok(response.text().await?);
        }
    }
}

#[async_trait]
impl FeedSource for HttpFetcher {
    /// Visit the career-section landing page first to acquire session
    /// cookies. Mimics a real browser flow; failure is non-fatal.
    async fn warm_session(&self, career_section_url: &str) {
        tracing::info!("Warming session: visiting career section for cookies");
        match self.client.get(career_section_url).send().await {
            Ok(response) => {
                tracing::info!("Career section response: {}", response.status());
            }
            Err(e) => {
                tracing::warn!("Could not warm session (non-fatal): {}", e);
            }
        }
    }

    async fn fetch_feed(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}

#[async_trait]
impl DetailFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}
