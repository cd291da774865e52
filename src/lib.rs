//! Trend Analyzer - aggregate statistics over trending video metadata
//!
//! Takes a collection of scraped video records (view counts, keywords, categories)
//! and derives the data behind three presentation widgets: a weighted word cloud,
//! a top-keyword frequency table and a per-category average-views ranking.

pub mod analyzer;
pub mod config;
pub mod format;
pub mod record;
pub mod report;
pub mod source;
pub mod summary;
pub mod tally;

// Re-export main types for easy access
pub use crate::analyzer::{AggregationResult, Analyzer};
pub use crate::config::{AnalysisConfig, Config, ConfigBuilder, OutputFormat};
pub use crate::format::{format_number, NumberLocale};
pub use crate::record::VideoRecord;
pub use crate::report::TrendReport;
pub use crate::source::{DirectorySource, JsonFileSource, RecordSource, StaticSource};
pub use crate::summary::{CategoryEntry, FontScale, KeywordEntry, WordCloudEntry};
pub use crate::tally::{CategoryStats, Tally};

/// Result type for trend analysis operations
pub type Result<T> = std::result::Result<T, TrendError>;

/// Error types for trend analysis operations
#[derive(thiserror::Error, Debug)]
pub enum TrendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid font scale: min={min}, max={max}, default={default}")]
    InvalidFontScale { min: u32, max: u32, default: u32 },

    #[error("Category has no contributing videos: {0}")]
    EmptyCategory(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
