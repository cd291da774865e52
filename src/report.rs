use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::analyzer::{AggregationResult, Analyzer};
use crate::format::format_number;
use crate::Result;

/// Snapshot of an aggregation run, ready to hand to a renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub generated_at: DateTime<Utc>,
    /// Where the records came from
    pub source: String,
    pub total_records: usize,
    pub data: AggregationResult,
}

impl TrendReport {
    pub fn new(analyzer: &Analyzer, source: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            source: source.into(),
            total_records: analyzer.record_count(),
            data: analyzer.data().clone(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Plain-text tables for terminal output
    pub fn render_text(&self, locale: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Trend report for {}", self.source);
        let _ = writeln!(
            out,
            "Generated {} from {} videos",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            format_number(self.total_records as i64, locale)
        );

        let _ = writeln!(out, "\nWord cloud");
        if self.data.word_cloud.is_empty() {
            let _ = writeln!(out, "  (no keywords)");
        }
        for entry in &self.data.word_cloud {
            let _ = writeln!(
                out,
                "  {:<30} {:>3}px {:>15}",
                entry.text,
                entry.size,
                format_number(entry.weight, locale)
            );
        }

        let _ = writeln!(out, "\nTop keywords");
        if self.data.keywords.is_empty() {
            let _ = writeln!(out, "  (no keywords)");
        }
        for (rank, entry) in self.data.keywords.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<30} {:>8} {:>6}%",
                rank + 1,
                entry.keyword,
                format_number(entry.count as i64, locale),
                entry.percentage
            );
        }

        let _ = writeln!(out, "\nCategories by average views");
        if self.data.categories.is_empty() {
            let _ = writeln!(out, "  (no categories)");
        }
        for (rank, entry) in self.data.categories.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<30} {:>15} avg ({} videos)",
                rank + 1,
                entry.category,
                format_number(entry.avg_views, locale),
                format_number(entry.total_videos as i64, locale)
            );
        }

        out
    }
}
