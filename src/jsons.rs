//! Structs for parsing server responses.

use serde::{Deserialize, Serialize};

/// `ct/v1/get-sth` response. Fields are recorded verbatim; only `tree_size`
/// is used by the rest of the crate.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Sth {
    pub tree_size: u64,
    pub timestamp: u64,
    pub sha256_root_hash: String,
    pub tree_head_signature: String,
}

/// `ct/v1/get-entries` response envelope.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GetEntries {
    pub entries: Vec<LeafEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LeafEntry {
    pub leaf_input: String,
    /// Certificate chain accompanying the leaf. Ignored: this crawler
    /// doesn't verify chains or reconstruct certificates.
    #[serde(default)]
    pub extra_data: String,
}

/// One entry under `log_list.json`'s `operators[].logs[]`. Only `url` is
/// required by the rest of the crate; `description` and `key` are kept for
/// completeness but unused.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogListEndpoint {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LogListOperator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub logs: Vec<LogListEndpoint>,
}

/// The well-known `log_list.json` v3 document. Qualification metadata,
/// `tiled_logs`, and anything else beyond operator/log nesting is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LogList {
    #[serde(default)]
    pub operators: Vec<LogListOperator>,
}

impl LogList {
    /// Flatten `operators[].logs[].url` into the list of endpoint base
    /// URLs the scheduler fans out over.
    pub fn urls(&self) -> Vec<String> {
        self.operators
            .iter()
            .flat_map(|op| op.logs.iter())
            .map(|log| log.url.clone())
            .collect()
    }
}

/// One entry of the persisted cursor table, `config.json`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PersistedCursor {
    #[serde(rename = "Url")]
    pub url: String,
    pub tree_size: u64,
}

/// Top-level shape of `config.json`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PersistedCursorTable {
    #[serde(rename = "Endpoints")]
    pub endpoints: std::collections::HashMap<String, PersistedCursor>,
}
