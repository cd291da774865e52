//! Aggregation over a captured set of video records
//!
//! An [`Analyzer`] runs exactly one pass over its records at construction time and
//! caches the resulting [`AggregationResult`]. Nothing here fails outward: an
//! unavailable source yields an empty result, and a summarization step that errors
//! is logged and left empty without affecting the other two.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::AnalysisConfig;
use crate::format;
use crate::record::VideoRecord;
use crate::source::RecordSource;
use crate::summary::{
    prepare_categories, prepare_keywords, prepare_word_cloud, CategoryEntry, KeywordEntry,
    WordCloudEntry,
};
use crate::tally::{CategoryStats, Tally};
use crate::Result;

/// Locale used by [`Analyzer::format_number`]
pub const DEFAULT_LOCALE: &str = "it-IT";

/// Derived data for the three presentation widgets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    /// Descending by weight
    pub word_cloud: Vec<WordCloudEntry>,
    /// Descending by occurrence count
    pub keywords: Vec<KeywordEntry>,
    /// Descending by average views
    pub categories: Vec<CategoryEntry>,
}

impl AggregationResult {
    pub fn is_empty(&self) -> bool {
        self.word_cloud.is_empty() && self.keywords.is_empty() && self.categories.is_empty()
    }
}

/// Single-pass aggregator over a fixed collection of video records
#[derive(Debug, Clone)]
pub struct Analyzer {
    records: Vec<VideoRecord>,
    processed: AggregationResult,
}

impl Analyzer {
    /// Aggregate `source` with the default limits and font scale.
    ///
    /// `None` means the host had no video data to offer; the analyzer then holds
    /// no records and an empty result.
    pub fn new(source: Option<Vec<VideoRecord>>) -> Self {
        Self::with_config(source, &AnalysisConfig::default())
    }

    /// Aggregate `source` with explicit settings
    pub fn with_config(source: Option<Vec<VideoRecord>>, config: &AnalysisConfig) -> Self {
        let records = source.unwrap_or_else(|| {
            error!("Video data not available, continuing with an empty record set");
            Vec::new()
        });

        let processed = aggregate(&records, config);
        Self { records, processed }
    }

    /// Load records from `source` and aggregate them.
    ///
    /// A load failure is treated like an unavailable source.
    pub async fn from_source(source: &dyn RecordSource, config: &AnalysisConfig) -> Self {
        let records = match source.load().await {
            Ok(records) => {
                info!("📥 Loaded {} video records from {}", records.len(), source.describe());
                Some(records)
            }
            Err(e) => {
                warn!("Failed to load video records from {}: {}", source.describe(), e);
                None
            }
        };

        Self::with_config(records, config)
    }

    /// The cached aggregation result
    pub fn data(&self) -> &AggregationResult {
        &self.processed
    }

    pub fn into_data(self) -> AggregationResult {
        self.processed
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Format a number for display using the default locale
    pub fn format_number(num: i64) -> String {
        format::format_number(num, DEFAULT_LOCALE)
    }
}

/// Working maps for one aggregation pass
#[derive(Debug, Default)]
struct Accumulator {
    word_weights: Tally<i64>,
    keyword_counts: Tally<u64>,
    category_stats: Tally<CategoryStats>,
}

impl Accumulator {
    fn ingest(&mut self, record: &VideoRecord, sentinel: &str) {
        let views = record.view_count();

        for keyword in record.valid_keywords(sentinel) {
            let weight = self.word_weights.entry(keyword);
            *weight = weight.saturating_add(views);
            *self.keyword_counts.entry(keyword) += 1;
        }

        for category in record.valid_categories(sentinel) {
            self.category_stats.entry(category).add(views);
        }
    }
}

fn aggregate(records: &[VideoRecord], config: &AnalysisConfig) -> AggregationResult {
    if records.is_empty() {
        return AggregationResult::default();
    }

    let mut acc = Accumulator::default();
    for record in records {
        acc.ingest(record, &config.sentinel);
    }

    debug!(
        "Aggregated {} records: {} keywords, {} categories",
        records.len(),
        acc.keyword_counts.len(),
        acc.category_stats.len()
    );

    AggregationResult {
        word_cloud: isolate_step("word cloud", || {
            prepare_word_cloud(&acc.word_weights, &config.font_scale, config.word_cloud_limit)
        }),
        keywords: isolate_step("keywords", || {
            prepare_keywords(&acc.keyword_counts, config.keyword_limit)
        }),
        categories: isolate_step("categories", || {
            prepare_categories(&acc.category_stats, config.category_limit)
        }),
    }
}

fn isolate_step<T>(step: &str, run: impl FnOnce() -> Result<Vec<T>>) -> Vec<T> {
    match run() {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to prepare {} data: {}", step, e);
            Vec::new()
        }
    }
}
