//! Per-record node parameters.
//!
//! # Design
//! The host resolves form values per input record. `NodeParameters::from_form`
//! reads them once into an explicit variant per table row, so request
//! building never performs a dynamic parameter lookup. Required fields are
//! checked here; the builder only sees well-formed input.

use serde::Deserialize;
use serde_json::Value;

use crate::error::NodeError;
use crate::query::{leading_int, parse_color_refs, validate_list_values};
use crate::resource::{Operation, Resource};

pub const DEFAULT_STATE: i64 = 3;
pub const DEFAULT_PRIORITY: i64 = 2;
pub const DEFAULT_FLAGS: i64 = 8256;

/// Options for listing items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemListOptions {
    pub offset: Option<u64>,
    pub color_refs: Vec<i64>,
    pub list_values: Vec<u64>,
}

/// Form fields for creating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateItemFields {
    pub group_ref: i64,
    pub subject: String,
    pub from: String,
    /// Comma-separated recipient addresses as entered.
    pub recipients: String,
    /// HTML body; empty means no email properties are sent.
    pub email_content: String,
    pub state: i64,
    pub priority: i64,
    pub flags: i64,
    pub number: String,
    /// Only sent when greater than zero.
    pub color_ref: i64,
}

impl CreateItemFields {
    /// Required fields set, everything else at its form default.
    pub fn new(group_ref: i64, subject: &str, from: &str, recipients: &str) -> Self {
        Self {
            group_ref,
            subject: subject.to_string(),
            from: from.to_string(),
            recipients: recipients.to_string(),
            email_content: String::new(),
            state: DEFAULT_STATE,
            priority: DEFAULT_PRIORITY,
            flags: DEFAULT_FLAGS,
            number: String::new(),
            color_ref: 0,
        }
    }
}

/// Fully resolved parameters for one input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeParameters {
    ListColors { offset: Option<u64> },
    GetColor { color_id: String },
    ListGroups { offset: Option<u64> },
    GetGroup { group_id: String },
    ListItems(ItemListOptions),
    GetItem { item_id: String },
    CreateItem(CreateItemFields),
}

impl NodeParameters {
    pub fn resource(&self) -> Resource {
        match self {
            NodeParameters::ListColors { .. } | NodeParameters::GetColor { .. } => Resource::Colors,
            NodeParameters::ListGroups { .. } | NodeParameters::GetGroup { .. } => Resource::Groups,
            NodeParameters::ListItems(_)
            | NodeParameters::GetItem { .. }
            | NodeParameters::CreateItem(_) => Resource::Items,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            NodeParameters::ListColors { .. }
            | NodeParameters::ListGroups { .. }
            | NodeParameters::ListItems(_) => Operation::GetAll,
            NodeParameters::GetColor { .. }
            | NodeParameters::GetGroup { .. }
            | NodeParameters::GetItem { .. } => Operation::Get,
            NodeParameters::CreateItem(_) => Operation::Create,
        }
    }

    /// Read the host's form values for one record.
    ///
    /// `resource` defaults to `colors` and `operation` to `getAll`, matching
    /// the node's UI defaults.
    pub fn from_form(form: &Value) -> Result<Self, NodeError> {
        let form: RawForm = serde_json::from_value(form.clone())
            .map_err(|e| NodeError::invalid("parameters", e.to_string()))?;

        let resource = match form.resource.as_deref() {
            Some(name) => name.parse()?,
            None => Resource::Colors,
        };
        let operation = match form.operation.as_deref() {
            Some(name) => name.parse()?,
            None => Operation::GetAll,
        };

        match (resource, operation) {
            (Resource::Colors, Operation::GetAll) => Ok(NodeParameters::ListColors {
                offset: form.additional_fields.offset,
            }),
            (Resource::Colors, Operation::Get) => Ok(NodeParameters::GetColor {
                color_id: required_text(&form.color_id, "colorId")?,
            }),
            (Resource::Groups, Operation::GetAll) => Ok(NodeParameters::ListGroups {
                offset: form.additional_fields.offset,
            }),
            (Resource::Groups, Operation::Get) => Ok(NodeParameters::GetGroup {
                group_id: required_text(&form.group_id, "groupId")?,
            }),
            (Resource::Items, Operation::GetAll) => {
                let extra = form.additional_fields;
                validate_list_values(&extra.list_values)?;
                Ok(NodeParameters::ListItems(ItemListOptions {
                    offset: extra.offset,
                    color_refs: extra
                        .color_ids
                        .as_deref()
                        .map(parse_color_refs)
                        .unwrap_or_default(),
                    list_values: extra.list_values,
                }))
            }
            (Resource::Items, Operation::Get) => Ok(NodeParameters::GetItem {
                item_id: required_text(&form.item_id, "itemId")?,
            }),
            (Resource::Items, Operation::Create) => {
                let group_ref_text = required_text(&form.group_ref, "groupRef")?;
                let group_ref = leading_int(group_ref_text.trim()).ok_or_else(|| {
                    NodeError::invalid("groupRef", format!("'{group_ref_text}' is not an integer"))
                })?;
                Ok(NodeParameters::CreateItem(CreateItemFields {
                    group_ref,
                    subject: required_string(form.subject, "subject")?,
                    from: required_string(form.from, "from")?,
                    recipients: required_string(form.recipients, "recipients")?,
                    email_content: form.email_content.unwrap_or_default(),
                    state: form.state.unwrap_or(DEFAULT_STATE),
                    priority: form.priority.unwrap_or(DEFAULT_PRIORITY),
                    flags: form.flags.unwrap_or(DEFAULT_FLAGS),
                    number: form.number.unwrap_or_default(),
                    color_ref: form.color_ref.unwrap_or(0),
                }))
            }
            (resource, operation) => Err(crate::resource::unsupported(resource, operation)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawForm {
    resource: Option<String>,
    operation: Option<String>,
    color_id: Option<Value>,
    group_id: Option<Value>,
    item_id: Option<Value>,
    #[serde(default)]
    additional_fields: RawAdditionalFields,
    group_ref: Option<Value>,
    subject: Option<String>,
    from: Option<String>,
    recipients: Option<String>,
    email_content: Option<String>,
    state: Option<i64>,
    priority: Option<i64>,
    flags: Option<i64>,
    number: Option<String>,
    color_ref: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdditionalFields {
    offset: Option<u64>,
    color_ids: Option<String>,
    #[serde(default)]
    list_values: Vec<u64>,
}

/// A required id-like field given as a string or a number.
fn required_text(value: &Option<Value>, field: &'static str) -> Result<String, NodeError> {
    let text = match value {
        None | Some(Value::Null) => return Err(NodeError::MissingParameter(field)),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => {
            return Err(NodeError::invalid(
                field,
                format!("expected a string or number, got {other}"),
            ))
        }
    };
    if text.is_empty() {
        return Err(NodeError::MissingParameter(field));
    }
    Ok(text)
}

fn required_string(value: Option<String>, field: &'static str) -> Result<String, NodeError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(NodeError::MissingParameter(field)),
    }
}
