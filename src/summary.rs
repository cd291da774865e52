//! Summarizers that turn the accumulated tallies into widget-ready rows
//!
//! Each summarizer sorts descending on its metric with a stable sort (ties keep
//! first-encountered order) and truncates to its limit. Rounding is half toward
//! positive infinity for both averages and percentages.

use serde::{Deserialize, Serialize};

use crate::tally::{CategoryStats, Tally};
use crate::{Result, TrendError};

/// One word in the word cloud
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCloudEntry {
    pub text: String,
    /// Font size in pixels
    pub size: u32,
    /// Total views of the videos carrying this keyword
    pub weight: i64,
}

/// One row of the top-keywords table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub count: u64,
    /// Share of all keyword occurrences, one decimal digit, e.g. `"66.7"`
    pub percentage: String,
}

/// One row of the category ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntry {
    pub category: String,
    pub avg_views: i64,
    pub total_videos: u64,
}

/// Font size range used to scale word-cloud entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScale {
    pub min: u32,
    pub max: u32,
    /// Size used when every weight is the same
    pub default: u32,
}

impl Default for FontScale {
    fn default() -> Self {
        Self {
            min: 12,
            max: 48,
            default: 24,
        }
    }
}

impl FontScale {
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max || self.default < self.min || self.default > self.max {
            return Err(TrendError::InvalidFontScale {
                min: self.min,
                max: self.max,
                default: self.default,
            });
        }
        Ok(())
    }

    /// Min/max-normalize `weight` onto the font range
    pub fn size_for(&self, weight: i64, min_weight: i64, max_weight: i64) -> u32 {
        if max_weight == min_weight {
            return self.default;
        }

        // Integer arithmetic keeps large weights exact; the quotient is already floored
        let offset = i128::from(weight) - i128::from(min_weight);
        let range = i128::from(max_weight) - i128::from(min_weight);
        let step = offset * i128::from(self.max - self.min) / range;
        self.min + step.clamp(0, i128::from(self.max - self.min)) as u32
    }
}

/// Round half toward positive infinity
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Render `part / total` as a percentage with exactly one decimal digit
pub fn percentage_of(part: u64, total: u64) -> String {
    let share = part as f64 / total as f64 * 100.0;
    format!("{:.1}", round_half_up(share * 10.0) / 10.0)
}

/// Build the word cloud from keyword view weights
pub fn prepare_word_cloud(
    weights: &Tally<i64>,
    scale: &FontScale,
    limit: usize,
) -> Result<Vec<WordCloudEntry>> {
    scale.validate()?;

    let (Some(&min_weight), Some(&max_weight)) = (weights.values().min(), weights.values().max()) else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<WordCloudEntry> = weights
        .iter()
        .map(|(text, &weight)| WordCloudEntry {
            text: text.to_string(),
            size: scale.size_for(weight, min_weight, max_weight),
            weight,
        })
        .collect();

    entries.sort_by(|a, b| b.weight.cmp(&a.weight));
    entries.truncate(limit);
    Ok(entries)
}

/// Build the top-keywords table from occurrence counts
pub fn prepare_keywords(counts: &Tally<u64>, limit: usize) -> Result<Vec<KeywordEntry>> {
    let total = counts
        .values()
        .try_fold(0u64, |acc, &count| acc.checked_add(count))
        .ok_or_else(|| TrendError::Overflow("keyword occurrence total".to_string()))?;

    if total == 0 {
        return Ok(Vec::new());
    }

    let mut entries: Vec<KeywordEntry> = counts
        .iter()
        .map(|(keyword, &count)| KeywordEntry {
            keyword: keyword.to_string(),
            count,
            percentage: percentage_of(count, total),
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    Ok(entries)
}

/// Build the category ranking from per-category view totals
pub fn prepare_categories(
    stats: &Tally<CategoryStats>,
    limit: usize,
) -> Result<Vec<CategoryEntry>> {
    let mut entries = Vec::with_capacity(stats.len());
    for (category, data) in stats.iter() {
        if data.count == 0 {
            return Err(TrendError::EmptyCategory(category.to_string()));
        }
        entries.push(CategoryEntry {
            category: category.to_string(),
            avg_views: round_half_up(data.total_views as f64 / data.count as f64) as i64,
            total_videos: data.count,
        });
    }

    entries.sort_by(|a, b| b.avg_views.cmp(&a.avg_views));
    entries.truncate(limit);
    Ok(entries)
}
