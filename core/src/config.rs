//! Node settings supplied by the host alongside the credentials.

use serde::{Deserialize, Serialize};

use crate::resource::NodeProfile;

/// What the executor does when a record fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailurePolicy {
    /// The first failure aborts the batch.
    #[default]
    FailFast,
    /// Each failure becomes an `{"error": message}` record and the batch
    /// continues.
    ContinueOnFail,
}

/// Per-node settings, as the host serializes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSettings {
    pub profile: NodeProfile,
    pub continue_on_fail: bool,
}

impl NodeSettings {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.continue_on_fail {
            FailurePolicy::ContinueOnFail
        } else {
            FailurePolicy::FailFast
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_full_profile_and_fail_fast() {
        let settings: NodeSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.profile, NodeProfile::Full);
        assert_eq!(settings.failure_policy(), FailurePolicy::FailFast);
    }

    #[test]
    fn reads_host_field_names() {
        let settings: NodeSettings =
            serde_json::from_str(r#"{"profile":"readOnly","continueOnFail":true}"#).unwrap();
        assert_eq!(settings.profile, NodeProfile::ReadOnly);
        assert_eq!(settings.failure_policy(), FailurePolicy::ContinueOnFail);
    }
}
