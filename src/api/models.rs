//! API models for the Pan-Tort hash query endpoint.
//!
//! `POST /process_hashes` accepts a [`HashQueryRequest`]:
//!
//! ```json
//! {
//!   "query_tag": "incident-2018-09-14",
//!   "hashes": "d41d8cd98f00b204e9800998ecf8427e,9e107d9d372bb6826bd81d3542a419d6",
//!   "output": "text",
//!   "hash_type": "md5"
//! }
//! ```
//!
//! - `hashes` is either a delimited string or a JSON array of strings
//! - an optional `delimiter` names the separator instead of letting the server guess
//! - `output` values containing `text` return a downloadable report, anything else
//!   renders the results page

use serde::{Deserialize, Serialize};

use crate::hashlist::{HashList, HashListError};
use crate::observability::MetricsSnapshot;
use crate::processor::QueryContext;

/// Keys every request must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["query_tag", "hashes", "output", "hash_type"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HashQueryRequest {
    pub query_tag: String,
    pub hashes: HashesField,
    pub output: String,
    pub hash_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HashesField {
    Delimited(String),
    List(Vec<String>),
}

impl HashQueryRequest {
    pub fn hash_list(&self) -> Result<HashList, HashListError> {
        match &self.hashes {
            HashesField::Delimited(raw) => HashList::parse(raw, self.delimiter.as_deref()),
            HashesField::List(entries) => HashList::from_entries(entries.clone()),
        }
    }

    pub fn context(&self) -> QueryContext {
        QueryContext::new(&self.query_tag, &self.output, &self.hash_type)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub queries: MetricsSnapshot,
}
