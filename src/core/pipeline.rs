use crate::core::classifier::Classifier;
use crate::core::enrich::EnrichmentGate;
use crate::core::{ConfigProvider, DetailFetcher, FeedSource, FilterOutcome, Pipeline, Storage};
use crate::feed;
use crate::utils::error::Result;
use std::time::Duration;

/// The full filter run as three stages: extract (fetch + validate the feed),
/// transform (parse, pre-filter, enrich, classify), load (serialize + write).
///
/// The transform stage is two-phase on purpose: the title-only exclusion
/// check runs before any detail-page fetch, so outbound requests are bounded
/// to the listings that are not trivially excluded.
pub struct FeedPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: FeedSource + DetailFetcher + Clone,
{
    storage: S,
    config: C,
    fetcher: F,
    classifier: Classifier,
}

impl<S, C, F> FeedPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: FeedSource + DetailFetcher + Clone,
{
    pub fn new(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher,
            classifier: Classifier::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S, C, F> Pipeline for FeedPipeline<S, C, F>
where
    S: Storage,
    C: ConfigProvider,
    F: FeedSource + DetailFetcher + Clone,
{
    async fn extract(&self) -> Result<String> {
        self.fetcher
            .warm_session(self.config.career_section_url())
            .await;

        tracing::info!("Fetching WHO RSS feed from {}", self.config.feed_url());
        let source = self.fetcher.fetch_feed(self.config.feed_url()).await?;
        tracing::debug!("Feed response length: {} bytes", source.len());

        feed::validate_feed_response(&source)?;
        Ok(source)
    }

    async fn transform(&self, source: String) -> Result<FilterOutcome> {
        let listings = feed::parse_feed(&source);
        tracing::info!("Parsed {} items from upstream feed", listings.len());

        let gate = EnrichmentGate::new(
            self.fetcher.clone(),
            Duration::from_millis(self.config.request_delay_ms()),
        );

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for mut listing in listings {
            // Stage 1: cheap title-only pre-filter, no I/O.
            if self.classifier.check_excluded(&mut listing) {
                tracing::debug!("Stage 1 reject: {}", listing.title);
                rejected.push(listing);
                continue;
            }

            // Stage 2: enrich with the detail page, then classify.
            if self.config.fetch_detail() {
                gate.maybe_enrich(&mut listing).await;
            }

            if self.classifier.classify(&mut listing) {
                tracing::debug!("Accept: {}", listing.title);
                accepted.push(listing);
            } else {
                tracing::debug!(
                    "Reject: {} ({})",
                    listing.title,
                    listing.decision_reason
                );
                rejected.push(listing);
            }
        }

        Ok(FilterOutcome {
            source,
            accepted,
            rejected,
        })
    }

    async fn load(&self, outcome: &FilterOutcome) -> Result<String> {
        let rss = feed::build_filtered_feed(&outcome.source, &outcome.accepted);
        self.storage
            .write_file(self.config.output_file(), rss.as_bytes())
            .await?;
        Ok(self.config.output_file().to_string())
    }
}
