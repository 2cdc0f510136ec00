use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How the caller wants results delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Downloadable report file.
    Text,
    /// Rendered page of result records.
    Display,
}

impl OutputMode {
    /// Any output label containing "text" selects the report file.
    pub fn from_label(label: &str) -> Self {
        if label.contains("text") {
            OutputMode::Text
        } else {
            OutputMode::Display
        }
    }
}

/// Per-request parameters, threaded through the call chain instead of shared config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    pub query_tag: String,
    /// Output label exactly as the caller sent it.
    pub output: String,
    pub output_mode: OutputMode,
    pub hash_type: String,
}

impl QueryContext {
    pub fn new(
        query_tag: impl Into<String>,
        output: impl Into<String>,
        hash_type: impl Into<String>,
    ) -> Self {
        let output = output.into();
        Self {
            query_tag: query_tag.into(),
            output_mode: OutputMode::from_label(&output),
            output,
            hash_type: hash_type.into(),
        }
    }
}

/// One result entry for display mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub hash: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl SampleRecord {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// What a processor hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    Report(PathBuf),
    Records(Vec<SampleRecord>),
}
