//! Video record input model
//!
//! Records arrive from the scraper host as loosely-shaped JSON. Deserialization is
//! lenient: a field with the wrong shape degrades to "absent" instead of rejecting
//! the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Placeholder the scraper writes for fields it could not extract
pub const SENTINEL: &str = "N/A";

/// A single scraped video with its engagement metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    /// Platform video identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Video caption / description
    #[serde(default, alias = "titolo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Creator nickname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Canonical video URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// View count with `.` as thousands separator, e.g. `"12.345"`
    #[serde(default, deserialize_with = "lenient_views")]
    pub views: Option<String>,

    /// Suggested search keywords, in scrape order
    #[serde(default, deserialize_with = "lenient_tags")]
    pub keywords: Vec<String>,

    /// Diversification labels, in scrape order
    #[serde(default, deserialize_with = "lenient_tags")]
    pub categories: Vec<String>,
}

impl VideoRecord {
    /// Create a record with only a view count
    pub fn new(views: impl Into<String>) -> Self {
        Self {
            views: Some(views.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Parsed view count; missing or unparseable values count as 0
    pub fn view_count(&self) -> i64 {
        self.views.as_deref().map(parse_view_count).unwrap_or(0)
    }

    /// Keywords that are neither empty nor the sentinel
    pub fn valid_keywords<'a>(&'a self, sentinel: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        valid_tags(&self.keywords, sentinel)
    }

    /// Categories that are neither empty nor the sentinel
    pub fn valid_categories<'a>(&'a self, sentinel: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        valid_tags(&self.categories, sentinel)
    }
}

fn valid_tags<'a>(tags: &'a [String], sentinel: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    tags.iter()
        .map(String::as_str)
        .filter(move |tag| !tag.is_empty() && *tag != sentinel)
}

/// Parse a dotted view count such as `"1.234.567"`.
///
/// All `.` characters are removed, then the longest leading integer is taken
/// (leading whitespace and a sign are allowed, trailing garbage is ignored).
/// No digits, or a value that does not fit in an `i64`, yields 0.
pub fn parse_view_count(raw: &str) -> i64 {
    let stripped: String = raw.chars().filter(|c| *c != '.').collect();
    let trimmed = stripped.trim_start();

    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    // Accumulate toward negative so i64::MIN parses exactly
    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = match value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(i64::from(byte - b'0')))
        {
            Some(v) => v,
            None => {
                debug!("View count out of range, treating as 0: {}", raw);
                return 0;
            }
        };
    }

    if !seen_digit {
        return 0;
    }
    if negative {
        value
    } else {
        value.checked_neg().unwrap_or_else(|| {
            debug!("View count out of range, treating as 0: {}", raw);
            0
        })
    }
}

fn lenient_views<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        Value::Null => None,
        other => {
            debug!("Ignoring malformed views field: {}", other);
            None
        }
    })
}

fn lenient_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                other => {
                    debug!("Dropping non-string tag entry: {}", other);
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            debug!("Ignoring non-list tag field: {}", other);
            Vec::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_dotted_views() {
        assert_eq!(parse_view_count("12.345"), 12345);
        assert_eq!(parse_view_count("1.234.567"), 1_234_567);
        assert_eq!(parse_view_count("999"), 999);
        assert_eq!(parse_view_count("0"), 0);
    }

    #[test]
    fn test_parse_views_is_lenient() {
        assert_eq!(parse_view_count("abc"), 0);
        assert_eq!(parse_view_count(""), 0);
        assert_eq!(parse_view_count("N/A"), 0);
        assert_eq!(parse_view_count("1.5K"), 15);
        assert_eq!(parse_view_count("  42"), 42);
        assert_eq!(parse_view_count("-7"), -7);
        assert_eq!(parse_view_count("+"), 0);
        assert_eq!(parse_view_count("99999999999999999999999"), 0);
    }

    #[test]
    fn test_missing_views_count_as_zero() {
        let record = VideoRecord::default();
        assert_eq!(record.view_count(), 0);
    }

    #[test]
    fn test_deserialize_full_record() {
        let record: VideoRecord = serde_json::from_value(json!({
            "id": "7301",
            "title": "Pasta al volo",
            "creator": "chef",
            "url": "https://example.com/v/7301",
            "views": "1.000",
            "keywords": ["ricetta", "pasta"],
            "categories": ["Food"]
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("7301"));
        assert_eq!(record.view_count(), 1000);
        assert_eq!(record.keywords, vec!["ricetta", "pasta"]);
        assert_eq!(record.categories, vec!["Food"]);
    }

    #[test]
    fn test_deserialize_malformed_fields() {
        let record: VideoRecord = serde_json::from_value(json!({
            "views": true,
            "keywords": "ricetta, pasta",
            "categories": ["Food", 7, null, "Travel"]
        }))
        .unwrap();

        assert_eq!(record.views, None);
        assert!(record.keywords.is_empty());
        assert_eq!(record.categories, vec!["Food", "Travel"]);
    }

    #[test]
    fn test_numeric_views_are_accepted() {
        let record: VideoRecord = serde_json::from_value(json!({ "views": 2500 })).unwrap();
        assert_eq!(record.view_count(), 2500);

        let record: VideoRecord = serde_json::from_value(json!({ "views": 2.5 })).unwrap();
        assert_eq!(record.view_count(), 0);
    }

    #[test]
    fn test_scraper_title_alias() {
        let record: VideoRecord = serde_json::from_value(json!({
            "titolo": "Video non disponibile",
            "categorie": "Sport, Calcio"
        }))
        .unwrap();

        assert_eq!(record.title.as_deref(), Some("Video non disponibile"));
        assert!(record.categories.is_empty());
    }

    #[test]
    fn test_view_count_extremes() {
        assert_eq!(parse_view_count("-9.223.372.036.854.775.808"), i64::MIN);
        assert_eq!(parse_view_count("9.223.372.036.854.775.807"), i64::MAX);
        assert_eq!(parse_view_count("9.223.372.036.854.775.808"), 0);
        assert_eq!(parse_view_count("-9.223.372.036.854.775.809"), 0);
    }

    #[test]
    fn test_builder_sets_descriptive_fields() {
        let record = VideoRecord::new("1.000")
            .with_id("7301")
            .with_title("Carbonara in 60 secondi");

        assert_eq!(record.id.as_deref(), Some("7301"));
        assert_eq!(record.title.as_deref(), Some("Carbonara in 60 secondi"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "7301");
        assert!(json.get("creator").is_none());
    }

    #[test]
    fn test_valid_tags_skip_sentinel_and_empty() {
        let record = VideoRecord::new("10")
            .with_keywords(["ai", "", SENTINEL, "ml"])
            .with_categories([SENTINEL, "tech"]);

        let keywords: Vec<&str> = record.valid_keywords(SENTINEL).collect();
        let categories: Vec<&str> = record.valid_categories(SENTINEL).collect();

        assert_eq!(keywords, vec!["ai", "ml"]);
        assert_eq!(categories, vec!["tech"]);
    }
}
