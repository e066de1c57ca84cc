//! Item creation payload.
//!
//! GREYHOUND expects `{"Item": {...}}` with PascalCase keys. Optional keys
//! are omitted rather than sent empty.

use serde::Serialize;

use crate::params::CreateItemFields;

/// Request body for `POST /items`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateItemBody {
    #[serde(rename = "Item")]
    pub item: NewItem,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NewItem {
    pub group_ref: i64,
    pub subject: String,
    pub state: i64,
    pub priority: i64,
    pub flags: i64,
    pub from: Address,
    pub recipients: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_ref: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ItemProperties>,
}

/// Free-form address text such as `Name <user@example.com>`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Address {
    #[serde(rename = "Text")]
    pub text: String,
}

impl Address {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemProperties {
    #[serde(rename = "Email")]
    pub email: EmailProperties,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmailProperties {
    #[serde(rename = "EditorData")]
    pub editor_data: String,
}

/// Split a comma-separated recipient list into one trimmed address per
/// entry. Blank entries are kept.
pub fn parse_recipients(input: &str) -> Vec<Address> {
    input.split(',').map(str::trim).map(Address::new).collect()
}

impl From<&CreateItemFields> for CreateItemBody {
    fn from(fields: &CreateItemFields) -> Self {
        let number = Some(fields.number.clone()).filter(|n| !n.is_empty());
        let color_ref = Some(fields.color_ref).filter(|c| *c > 0);
        let properties = (!fields.email_content.is_empty()).then(|| ItemProperties {
            email: EmailProperties {
                editor_data: fields.email_content.clone(),
            },
        });

        CreateItemBody {
            item: NewItem {
                group_ref: fields.group_ref,
                subject: fields.subject.clone(),
                state: fields.state,
                priority: fields.priority,
                flags: fields.flags,
                from: Address::new(&fields.from),
                recipients: parse_recipients(&fields.recipients),
                number,
                color_ref,
                properties,
            },
        }
    }
}
