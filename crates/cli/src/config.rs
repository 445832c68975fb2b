use inspector_ranking::{normalize_count, DEFAULT_TOP_COUNT};
use serde::{Deserialize, Serialize};

/// How the final report is written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human readable blocks, one per hierarchy
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// Settings for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// How many hierarchies to report
    pub top: usize,

    pub output: OutputFormat,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            top: DEFAULT_TOP_COUNT,
            output: OutputFormat::Text,
        }
    }
}

impl InspectorConfig {
    /// Build from the raw command-line count; absent, zero or negative
    /// counts fall back to the default.
    pub fn from_count(count: Option<i64>, output: OutputFormat) -> Self {
        Self {
            top: count.map_or(DEFAULT_TOP_COUNT, normalize_count),
            output,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.top == 0 {
            return Err("top must be > 0".to_string());
        }
        Ok(())
    }
}
