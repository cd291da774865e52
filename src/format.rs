//! Locale-aware integer formatting for display

use tracing::debug;

use crate::{Result, TrendError};

/// Thousands grouping convention for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    /// Group separator; `None` renders digits ungrouped
    pub grouping: Option<char>,
}

impl NumberLocale {
    /// Resolve a locale tag such as `it-IT` or `en`
    pub fn from_tag(tag: &str) -> Result<Self> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let grouping = match normalized.as_str() {
            "it" | "it-it" | "it-ch" | "de" | "de-de" | "de-at" | "es" | "es-es" | "pt-br"
            | "nl" | "nl-nl" => Some('.'),
            "en" | "en-us" | "en-gb" | "en-au" | "en-ca" => Some(','),
            "fr" | "fr-fr" | "fr-ca" => Some('\u{202f}'),
            "plain" => None,
            _ => return Err(TrendError::UnsupportedLocale(tag.to_string())),
        };
        Ok(Self { grouping })
    }

    /// Render `num` with this locale's thousands grouping
    pub fn format(&self, num: i64) -> String {
        let digits = num.unsigned_abs().to_string();
        let Some(separator) = self.grouping else {
            return num.to_string();
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if num < 0 {
            grouped.push('-');
        }
        for (i, digit) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(digit);
        }
        grouped
    }
}

/// Format `num` for display in `locale`, falling back to plain digits when the
/// locale is not supported
pub fn format_number(num: i64, locale: &str) -> String {
    match NumberLocale::from_tag(locale) {
        Ok(number_locale) => number_locale.format(num),
        Err(e) => {
            debug!("Number formatting fell back to plain digits: {}", e);
            num.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_italian_grouping() {
        assert_eq!(format_number(0, "it-IT"), "0");
        assert_eq!(format_number(999, "it-IT"), "999");
        assert_eq!(format_number(1500, "it-IT"), "1.500");
        assert_eq!(format_number(1_234_567, "it-IT"), "1.234.567");
        assert_eq!(format_number(-12_345, "it-IT"), "-12.345");
    }

    #[test]
    fn test_other_locales() {
        assert_eq!(format_number(1_234_567, "en-US"), "1,234,567");
        assert_eq!(format_number(1_234_567, "fr_FR"), "1\u{202f}234\u{202f}567");
        assert_eq!(format_number(1_234_567, "plain"), "1234567");
    }

    #[test]
    fn test_extreme_values() {
        assert_eq!(format_number(i64::MIN, "en"), "-9,223,372,036,854,775,808");
        assert_eq!(format_number(i64::MAX, "it"), "9.223.372.036.854.775.807");
    }

    #[test]
    fn test_unknown_locale_falls_back() {
        assert!(matches!(
            NumberLocale::from_tag("tlh-KL"),
            Err(TrendError::UnsupportedLocale(_))
        ));
        assert_eq!(format_number(1_234_567, "tlh-KL"), "1234567");
    }
}
