use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

// The RSS feed URL is the standard Taleo job-search URL with &rss=true
// appended. To verify it, run a search on the careers portal and copy the
// live feed URL from the RSS icon on the results page.
pub const DEFAULT_FEED_URL: &str = "https://careers.who.int/careersection/ex/jobsearch.ftl?lang=en&portal=101430233&searchtype=3&f=null&s=3|D&a=null&multiline=true&rss=true";

pub const DEFAULT_CAREER_SECTION_URL: &str =
    "https://careers.who.int/careersection/ex/jobsearch.ftl";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "who-feed-filter")]
#[command(about = "Filters the WHO careers RSS feed to Geneva-based P/D-grade vacancies")]
pub struct CliConfig {
    #[arg(long, env = "WHO_FEED_URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    #[arg(long, default_value = DEFAULT_CAREER_SECTION_URL)]
    pub career_section_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "who_feed_filter.xml")]
    pub output_file: String,

    #[arg(long, help = "Skip detail-page fetching (faster, less accurate)")]
    pub no_fetch_detail: bool,

    #[arg(long, default_value = "500", help = "Delay between detail-page requests")]
    pub request_delay_ms: u64,

    #[arg(long, default_value = "20")]
    pub timeout_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Print the run summary as JSON on stdout")]
    pub json: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("feed_url", &self.feed_url)?;
        validate_url("career_section_url", &self.career_section_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;
        validate_range("request_delay_ms", self.request_delay_ms, 0, 60_000)?;
        validate_range("timeout_secs", self.timeout_secs, 1, 300)?;
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn career_section_url(&self) -> &str {
        &self.career_section_url
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn fetch_detail(&self) -> bool {
        !self.no_fetch_detail
    }

    fn request_delay_ms(&self) -> u64 {
        self.request_delay_ms
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}
