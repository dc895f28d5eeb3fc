pub mod classifier;
pub mod engine;
pub mod enrich;
pub mod patterns;
pub mod pipeline;

pub use crate::domain::model::{FilterOutcome, Grade, Listing};
pub use crate::domain::ports::{ConfigProvider, DetailFetcher, FeedSource, Pipeline, Storage};
pub use crate::utils::error::Result;
