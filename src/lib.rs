pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod feed;
pub mod utils;

pub use crate::adapters::http::HttpFetcher;
pub use crate::adapters::storage::LocalStorage;
pub use crate::config::CliConfig;
pub use crate::core::classifier::Classifier;
pub use crate::core::engine::{FilterEngine, RunReport};
pub use crate::core::pipeline::FeedPipeline;
pub use crate::domain::model::{FilterOutcome, Grade, Listing, RunSummary};
pub use crate::utils::error::{FilterError, Result};
