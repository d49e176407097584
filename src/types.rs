//! Shared types used by the batch driver, the CLI and the JSON report.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One input file of a batch.
///
/// The list of items is built once before the batch starts and never changes
/// while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub source_path: PathBuf,
    /// Label shown in progress output (the file name by default).
    pub display_name: String,
}

impl BatchItem {
    pub fn new(source_path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            display_name: display_name.into(),
        }
    }

    /// Item labelled with the path's file name.
    pub fn from_path(path: &Path) -> Self {
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::new(path, display_name)
    }
}

/// Counters for a batch run.
///
/// Starts at zero and only ever grows. Once
/// `processed + failed + cancelled == total` the run is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: usize,
    pub failed: usize,
    /// Items never started because the batch was cancelled.
    #[serde(default)]
    pub cancelled: usize,
    pub total: usize,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.processed + self.failed + self.cancelled == self.total
    }
}

/// Per-item line of the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything `--report` writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: BatchResult,
    pub items: Vec<ItemOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_from_path_uses_file_name() {
        let item = BatchItem::from_path(Path::new("/photos/2024/dawn.jpg"));
        assert_eq!(item.display_name, "dawn.jpg");
        assert_eq!(item.source_path, PathBuf::from("/photos/2024/dawn.jpg"));
    }

    #[test]
    fn empty_result_is_complete() {
        assert!(BatchResult::new(0).is_complete());
        assert!(!BatchResult::new(3).is_complete());
    }

    #[test]
    fn report_omits_missing_fields() {
        let report = BatchReport {
            summary: BatchResult {
                processed: 1,
                failed: 0,
                cancelled: 0,
                total: 1,
            },
            items: vec![ItemOutcome {
                display_name: "a.jpg".into(),
                output: Some("/out/a_resized.jpg".into()),
                error: None,
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"output\":\"/out/a_resized.jpg\""));
        assert!(!json.contains("error"));
    }
}
