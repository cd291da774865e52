use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::NumberLocale;
use crate::record::SENTINEL;
use crate::summary::FontScale;

/// Configuration for the Trend Analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation settings
    pub analysis: AnalysisConfig,

    /// Display formatting settings
    pub display: DisplayConfig,

    /// Input source settings
    pub input: InputConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Placeholder value ignored in keyword and category lists
    pub sentinel: String,

    /// Maximum number of word cloud entries
    pub word_cloud_limit: usize,

    /// Maximum number of rows in the top-keywords table
    pub keyword_limit: usize,

    /// Maximum number of rows in the category ranking
    pub category_limit: usize,

    /// Word cloud font size range
    pub font_scale: FontScale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Locale tag used for thousands grouping
    pub locale: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// JSON file or directory of JSON files holding video records
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Destination file (stdout when unset)
    pub path: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(anyhow!("Unknown output format: {}", other)),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.word_cloud_limit == 0 || self.keyword_limit == 0 || self.category_limit == 0 {
            return Err(anyhow!("Result limits must be greater than 0"));
        }

        self.font_scale.validate()?;

        if self.sentinel.is_empty() {
            return Err(anyhow!("sentinel must not be empty"));
        }
        Ok(())
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<()> {
        NumberLocale::from_tag(&self.locale)?;
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sentinel: SENTINEL.to_string(),
            word_cloud_limit: 40,
            keyword_limit: 10,
            category_limit: 8,
            font_scale: FontScale::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: "it-IT".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
            path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = ["trend-analyzer.toml", "config/trend-analyzer.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config.with_env_overrides());
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {:#}", path, e);
                    }
                }
            }
        }

        Ok(Self::default().with_env_overrides())
    }

    /// Load configuration from a specific TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(input) = std::env::var("TREND_ANALYZER_INPUT") {
            self.input.path = Some(PathBuf::from(input));
        }

        if let Ok(locale) = std::env::var("TREND_ANALYZER_LOCALE") {
            self.display.locale = locale;
        }

        if let Ok(log_level) = std::env::var("TREND_ANALYZER_LOG_LEVEL") {
            self.output.log_level = log_level;
        }

        if let Ok(format) = std::env::var("TREND_ANALYZER_FORMAT") {
            match format.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => tracing::warn!("Ignoring TREND_ANALYZER_FORMAT: {}", e),
            }
        }

        self
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.as_ref().display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.display.validate()?;

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Replace each section that fails validation with its defaults, keeping the rest
    pub fn reset_invalid_sections(&mut self) {
        if let Err(e) = self.analysis.validate() {
            tracing::warn!("Invalid [analysis] settings, using defaults: {:#}", e);
            self.analysis = AnalysisConfig::default();
        }

        if let Err(e) = self.display.validate() {
            tracing::warn!("Invalid [display] settings, using defaults: {:#}", e);
            self.display = DisplayConfig::default();
        }
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Trend Analyzer Configuration:\n\
            - Input: {}\n\
            - Limits (cloud/keywords/categories): {}/{}/{}\n\
            - Font Sizes: {}-{}px (default {}px)\n\
            - Locale: {}\n\
            - Output Format: {:?}",
            self.input
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".to_string()),
            self.analysis.word_cloud_limit,
            self.analysis.keyword_limit,
            self.analysis.category_limit,
            self.analysis.font_scale.min,
            self.analysis.font_scale.max,
            self.analysis.font_scale.default,
            self.display.locale,
            self.output.format
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_input(mut self, path: PathBuf) -> Self {
        self.config.input.path = Some(path);
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.config.analysis.sentinel = sentinel.into();
        self
    }

    pub fn with_limits(mut self, word_cloud: usize, keywords: usize, categories: usize) -> Self {
        self.config.analysis.word_cloud_limit = word_cloud;
        self.config.analysis.keyword_limit = keywords;
        self.config.analysis.category_limit = categories;
        self
    }

    pub fn with_font_scale(mut self, font_scale: FontScale) -> Self {
        self.config.analysis.font_scale = font_scale;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.config.display.locale = locale.into();
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn with_output_path(mut self, path: PathBuf) -> Self {
        self.config.output.path = Some(path);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.sentinel, "N/A");
        assert_eq!(config.analysis.word_cloud_limit, 40);
        assert_eq!(config.analysis.keyword_limit, 10);
        assert_eq!(config.analysis.category_limit, 8);
        assert_eq!(config.analysis.font_scale, FontScale { min: 12, max: 48, default: 24 });
        assert_eq!(config.display.locale, "it-IT");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_limits(20, 5, 4)
            .with_locale("en-US")
            .with_output_format(OutputFormat::Text)
            .build();

        assert_eq!(config.analysis.word_cloud_limit, 20);
        assert_eq!(config.analysis.keyword_limit, 5);
        assert_eq!(config.analysis.category_limit, 4);
        assert_eq!(config.display.locale, "en-US");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let zero_limit = ConfigBuilder::new().with_limits(0, 10, 8).build();
        assert!(zero_limit.validate().is_err());

        let bad_scale = ConfigBuilder::new()
            .with_font_scale(FontScale { min: 12, max: 48, default: 60 })
            .build();
        assert!(bad_scale.validate().is_err());

        let bad_locale = ConfigBuilder::new().with_locale("xx-YY").build();
        assert!(bad_locale.validate().is_err());
    }

    #[test]
    fn test_bad_locale_keeps_custom_analysis() {
        let mut config = ConfigBuilder::new()
            .with_limits(20, 5, 4)
            .with_sentinel("-")
            .with_locale("xx")
            .build();

        config.reset_invalid_sections();

        assert_eq!(config.display.locale, "it-IT");
        assert_eq!(config.analysis.word_cloud_limit, 20);
        assert_eq!(config.analysis.keyword_limit, 5);
        assert_eq!(config.analysis.category_limit, 4);
        assert_eq!(config.analysis.sentinel, "-");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_analysis_keeps_custom_display() {
        let mut config = ConfigBuilder::new()
            .with_limits(0, 10, 8)
            .with_locale("en-US")
            .build();

        config.reset_invalid_sections();

        assert_eq!(config.analysis.word_cloud_limit, 40);
        assert_eq!(config.display.locale, "en-US");
    }

    #[test]
    fn test_builder_paths() {
        let config = ConfigBuilder::new()
            .with_input(PathBuf::from("data/videos.json"))
            .with_output_path(PathBuf::from("out/report.json"))
            .build();

        assert_eq!(config.input.path, Some(PathBuf::from("data/videos.json")));
        assert_eq!(config.output.path, Some(PathBuf::from("out/report.json")));
        assert!(config.summary().contains("data/videos.json"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            keyword_limit = 3

            [output]
            format = "text"
            "#,
        )
        .unwrap();

        assert_eq!(config.analysis.keyword_limit, 3);
        assert_eq!(config.analysis.word_cloud_limit, 40);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.display.locale, "it-IT");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
