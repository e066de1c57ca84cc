//! Query parameters for the list operations.

use serde::Serialize;

use crate::error::NodeError;

/// Filter document sent JSON-encoded in the `filter` query parameter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemFilter {
    #[serde(rename = "ColorRefs")]
    pub color_refs: Vec<i64>,
}

impl ItemFilter {
    /// `None` when there is nothing to filter on.
    pub fn from_color_refs(color_refs: &[i64]) -> Option<Self> {
        if color_refs.is_empty() {
            return None;
        }
        Some(Self {
            color_refs: color_refs.to_vec(),
        })
    }

    pub fn to_query_value(&self) -> Result<String, NodeError> {
        serde_json::to_string(self).map_err(|e| NodeError::Serialization(e.to_string()))
    }
}

/// Parse a comma-separated list of color ids.
///
/// Entries are trimmed and their leading base-10 integer is taken, so
/// `"12abc"` reads as 12; entries without one are dropped.
pub fn parse_color_refs(input: &str) -> Vec<i64> {
    input.split(',').filter_map(|part| leading_int(part.trim())).collect()
}

/// Leading optionally-signed decimal integer of `s`, if any.
pub(crate) fn leading_int(s: &str) -> Option<i64> {
    let digits_start = usize::from(s.starts_with(['-', '+']));
    let digits_len = s[digits_start..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return None;
    }
    s[..digits_start + digits_len].parse().ok()
}

/// Optional response fields selectable through the `listValues` bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListValue {
    GroupRef,
    GroupName,
    GroupPath,
    UserRef,
    UserName,
    TopicRef,
    TopicName,
    TopicPath,
    ColorRef,
    ColorCode,
    ColorName,
    State,
    Kind,
    Priority,
    Flags,
    Classified,
    From,
    Recipients,
    Subject,
    Number,
    Size,
    TaskProgress,
    TaskPercent,
    TaskDone,
    StartDate,
    EndDate,
    Remind,
    NextWorkflow,
    Created,
    Modified,
    ViewData,
    Attachments,
}

impl ListValue {
    /// All flags in bit order.
    pub const ALL: [ListValue; 32] = [
        ListValue::GroupRef,
        ListValue::GroupName,
        ListValue::GroupPath,
        ListValue::UserRef,
        ListValue::UserName,
        ListValue::TopicRef,
        ListValue::TopicName,
        ListValue::TopicPath,
        ListValue::ColorRef,
        ListValue::ColorCode,
        ListValue::ColorName,
        ListValue::State,
        ListValue::Kind,
        ListValue::Priority,
        ListValue::Flags,
        ListValue::Classified,
        ListValue::From,
        ListValue::Recipients,
        ListValue::Subject,
        ListValue::Number,
        ListValue::Size,
        ListValue::TaskProgress,
        ListValue::TaskPercent,
        ListValue::TaskDone,
        ListValue::StartDate,
        ListValue::EndDate,
        ListValue::Remind,
        ListValue::NextWorkflow,
        ListValue::Created,
        ListValue::Modified,
        ListValue::ViewData,
        ListValue::Attachments,
    ];

    pub fn bit(&self) -> u64 {
        1u64 << (*self as u32)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListValue::GroupRef => "groupRef",
            ListValue::GroupName => "groupName",
            ListValue::GroupPath => "groupPath",
            ListValue::UserRef => "userRef",
            ListValue::UserName => "userName",
            ListValue::TopicRef => "topicRef",
            ListValue::TopicName => "topicName",
            ListValue::TopicPath => "topicPath",
            ListValue::ColorRef => "colorRef",
            ListValue::ColorCode => "colorCode",
            ListValue::ColorName => "colorName",
            ListValue::State => "state",
            ListValue::Kind => "kind",
            ListValue::Priority => "priority",
            ListValue::Flags => "flags",
            ListValue::Classified => "classified",
            ListValue::From => "from",
            ListValue::Recipients => "recipients",
            ListValue::Subject => "subject",
            ListValue::Number => "number",
            ListValue::Size => "size",
            ListValue::TaskProgress => "taskProgress",
            ListValue::TaskPercent => "taskPercent",
            ListValue::TaskDone => "taskDone",
            ListValue::StartDate => "startDate",
            ListValue::EndDate => "endDate",
            ListValue::Remind => "remind",
            ListValue::NextWorkflow => "nextWorkflow",
            ListValue::Created => "created",
            ListValue::Modified => "modified",
            ListValue::ViewData => "viewData",
            ListValue::Attachments => "attachments",
        }
    }

    pub fn from_bit(bit: u64) -> Option<Self> {
        ListValue::ALL.into_iter().find(|v| v.bit() == bit)
    }
}

/// Reject anything that is not one of the 32 flag values.
pub fn validate_list_values(values: &[u64]) -> Result<(), NodeError> {
    match values.iter().find(|v| ListValue::from_bit(**v).is_none()) {
        Some(bad) => Err(NodeError::invalid(
            "listValues",
            format!("{bad} is not a power of two between 1 and 2^31"),
        )),
        None => Ok(()),
    }
}

/// Arithmetic sum of the selected flags, `None` when nothing is selected.
pub fn list_values_sum(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum())
}
