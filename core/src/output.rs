//! Output records handed back to the workflow host.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One record on the node's single output branch.
///
/// `paired_item` is the index of the input record that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: Value,
    pub paired_item: usize,
}

impl OutputRecord {
    pub fn new(json: Value, paired_item: usize) -> Self {
        Self { json, paired_item }
    }

    /// `{"error": message}` for a failure collected under continue-on-fail.
    pub fn error(message: &str, paired_item: usize) -> Self {
        Self::new(json!({ "error": message }), paired_item)
    }
}

/// Spread an array response over one record per element; wrap anything else
/// in a single record.
pub fn normalize(response: Value, paired_item: usize) -> Vec<OutputRecord> {
    match response {
        Value::Array(elements) => elements
            .into_iter()
            .map(|element| OutputRecord::new(element, paired_item))
            .collect(),
        other => vec![OutputRecord::new(other, paired_item)],
    }
}
