//! Declarative node description for the host's UI.
//!
//! Derived from the endpoint table and the profile, so the UI never offers an
//! operation the client would reject.

use serde::Serialize;

use crate::credentials::CREDENTIAL_TYPE;
use crate::query::ListValue;
use crate::resource::{NodeProfile, Operation, Resource};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub version: u32,
    pub subtitle: &'static str,
    pub credentials: Vec<CredentialRef>,
    pub resources: Vec<ResourceDescription>,
    pub list_value_options: Vec<OptionValue>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CredentialRef {
    pub name: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResourceDescription {
    pub name: &'static str,
    pub value: Resource,
    pub operations: Vec<OperationDescription>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationDescription {
    pub name: &'static str,
    pub value: Operation,
    pub description: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionValue {
    pub name: &'static str,
    pub value: u64,
}

impl NodeDescription {
    pub fn for_profile(profile: NodeProfile) -> Self {
        let resources = profile
            .resources()
            .into_iter()
            .map(|resource| ResourceDescription {
                name: resource.display_name(),
                value: resource,
                operations: profile
                    .endpoints()
                    .filter(|e| e.resource == resource)
                    .map(|e| describe(resource, e.operation))
                    .collect(),
            })
            .collect();

        Self {
            name: "greyhound",
            display_name: "GREYHOUND",
            description: "Interact with GREYHOUND REST API",
            version: 1,
            subtitle: r#"={{$parameter["resource"] + ": " + $parameter["operation"]}}"#,
            credentials: vec![CredentialRef {
                name: CREDENTIAL_TYPE,
                required: true,
            }],
            resources,
            list_value_options: ListValue::ALL
                .iter()
                .map(|v| OptionValue {
                    name: v.name(),
                    value: v.bit(),
                })
                .collect(),
        }
    }
}

fn describe(resource: Resource, operation: Operation) -> OperationDescription {
    let noun = resource.singular();
    let (description, action) = match operation {
        Operation::GetAll => (
            format!("Get all {}", resource.as_str()),
            format!("Get all {}", resource.as_str()),
        ),
        Operation::Get => (
            format!("Get a single {noun} by ID"),
            format!("Get {} {noun}", article(noun)),
        ),
        Operation::Create => (
            format!("Create a new {noun} (e.g., email)"),
            format!("Create {} {noun}", article(noun)),
        ),
    };
    OperationDescription {
        name: operation.display_name(),
        value: operation,
        description,
        action,
    }
}

fn article(noun: &str) -> &'static str {
    if noun.starts_with(['a', 'e', 'i', 'o', 'u']) {
        "an"
    } else {
        "a"
    }
}
