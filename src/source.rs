//! Record sources supplied by the host
//!
//! A source hands a complete collection of [`VideoRecord`]s to the analyzer. Each
//! record in a JSON document is converted independently, so one malformed element
//! is skipped without losing the rest of the file.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::record::VideoRecord;
use crate::{Result, TrendError};

/// Something that can produce the video records to analyze
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load the full record collection
    async fn load(&self) -> Result<Vec<VideoRecord>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Records already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<VideoRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<VideoRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn load(&self) -> Result<Vec<VideoRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }
}

/// A JSON file holding either an array of records or an object with a `videos` array
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn load(&self) -> Result<Vec<VideoRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_records(&content, &self.path.display().to_string())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Every `*.json` file directly inside a directory, in file-name order
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            return Err(TrendError::InvalidInput(format!(
                "Not a directory: {}",
                self.dir.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| TrendError::Io(std::io::Error::other(e)))?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl RecordSource for DirectorySource {
    async fn load(&self) -> Result<Vec<VideoRecord>> {
        let files = self.json_files()?;
        debug!("Found {} JSON files in {}", files.len(), self.dir.display());

        let loads = files.into_iter().map(|path| async move {
            let result = JsonFileSource::new(path.clone()).load().await;
            (path, result)
        });

        let mut records = Vec::new();
        for (path, result) in join_all(loads).await {
            match result {
                Ok(mut batch) => records.append(&mut batch),
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("{}/*.json", self.dir.display())
    }
}

/// Pick a file or directory source for `path`
pub fn source_for_path(path: &Path) -> Box<dyn RecordSource> {
    if path.is_dir() {
        Box::new(DirectorySource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

/// Parse a JSON document of records, skipping elements that do not convert
pub fn parse_records(content: &str, origin: &str) -> Result<Vec<VideoRecord>> {
    let document: Value = serde_json::from_str(content)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("videos") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(TrendError::InvalidInput(format!(
                    "{}: expected a `videos` array",
                    origin
                )))
            }
        },
        _ => {
            return Err(TrendError::InvalidInput(format!(
                "{}: expected an array of video records",
                origin
            )))
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<VideoRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping malformed record {} in {}: {}", index, origin, e),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level_array() {
        let records = parse_records(
            r#"[{"views": "1.000", "keywords": ["ai"]}, {"views": "2.000"}]"#,
            "inline",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].view_count(), 1000);
        assert_eq!(records[1].view_count(), 2000);
    }

    #[test]
    fn test_parse_videos_envelope() {
        let records = parse_records(r#"{"videos": [{"views": "5"}]}"#, "inline").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        let records = parse_records(
            r#"[{"views": "1"}, 42, null, "video", {"views": "2"}]"#,
            "inline",
        )
        .unwrap();

        let views: Vec<i64> = records.iter().map(VideoRecord::view_count).collect();
        assert_eq!(views, vec![1, 2]);
    }

    #[test]
    fn test_wrong_document_shape_is_an_error() {
        assert!(matches!(
            parse_records(r#"{"data": []}"#, "inline"),
            Err(TrendError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_records("17", "inline"),
            Err(TrendError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_records("not json", "inline"),
            Err(TrendError::Json(_))
        ));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(vec![VideoRecord::new("1")]);
        assert_eq!(source.load().await.unwrap().len(), 1);
        assert_eq!(source.describe(), "memory (1 records)");
    }
}
