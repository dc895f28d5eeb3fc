use crate::domain::model::Listing;
use crate::domain::ports::DetailFetcher;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]+>").expect("tag pattern")
});
static WS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("whitespace pattern")
});

/// Collapse markup to plain text: tag-delimited regions become a single
/// space, then runs of whitespace are folded to one space.
pub fn strip_markup(html: &str) -> String {
    let text = TAG_RE.replace_all(html, " ");
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// Fetches a listing's detail page before final classification.
///
/// At most one fetch per listing, no retries here; a failed fetch leaves
/// `enriched_text` unset so the classifier keeps its bare-pattern tiers
/// disabled. An inter-request delay keeps the upstream portal from
/// rate-limiting the run.
pub struct EnrichmentGate<F: DetailFetcher> {
    fetcher: F,
    delay: Duration,
}

impl<F: DetailFetcher> EnrichmentGate<F> {
    pub fn new(fetcher: F, delay: Duration) -> Self {
        Self { fetcher, delay }
    }

    pub async fn maybe_enrich(&self, listing: &mut Listing) {
        if listing.link.is_empty() {
            return;
        }

        tracing::debug!("Fetching detail: {}", listing.link);
        match self.fetcher.fetch_page(&listing.link).await {
            Ok(body) => {
                listing.enriched_text = Some(strip_markup(&body));
            }
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}", listing.link, e);
            }
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
