//! Resource/operation selection and the endpoint table.
//!
//! # Design
//! The table of supported `(resource, operation)` pairs lives in `ENDPOINTS`
//! as data. Both node profiles read the same table; a profile only switches
//! rows off. A pair with no row is an error, never a request to the bare
//! base URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::http::HttpMethod;

/// Top-level GREYHOUND entity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Colors,
    Groups,
    Items,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Colors, Resource::Groups, Resource::Items];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Colors => "colors",
            Resource::Groups => "groups",
            Resource::Items => "items",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Resource::Colors => "Colors",
            Resource::Groups => "Groups",
            Resource::Items => "Items",
        }
    }

    /// Singular noun used in operation descriptions.
    pub(crate) fn singular(&self) -> &'static str {
        match self {
            Resource::Colors => "color",
            Resource::Groups => "group",
            Resource::Items => "item",
        }
    }

    /// Name of the form field carrying the record id for `get`.
    pub fn id_parameter(&self) -> &'static str {
        match self {
            Resource::Colors => "colorId",
            Resource::Groups => "groupId",
            Resource::Items => "itemId",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| NodeError::invalid("resource", format!("unknown resource '{s}'")))
    }
}

/// Action performed on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    GetAll,
    Get,
    Create,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::GetAll, Operation::Get, Operation::Create];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetAll => "getAll",
            Operation::Get => "get",
            Operation::Create => "create",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Operation::GetAll => "Get All",
            Operation::Get => "Get",
            Operation::Create => "Create",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| NodeError::invalid("operation", format!("unknown operation '{s}'")))
    }
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub resource: Resource,
    pub operation: Operation,
    pub method: HttpMethod,
    /// Path relative to the base URL; `{id}` marks the record id.
    pub path: &'static str,
}

impl Endpoint {
    /// Substitute the record id into the path template.
    pub fn path_for(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => self.path.replace("{id}", &urlencoding::encode(id)),
            None => self.path.to_string(),
        }
    }

    pub fn takes_id(&self) -> bool {
        self.path.contains("{id}")
    }
}

pub const ENDPOINTS: [Endpoint; 7] = [
    Endpoint { resource: Resource::Colors, operation: Operation::GetAll, method: HttpMethod::Get, path: "/colors" },
    Endpoint { resource: Resource::Colors, operation: Operation::Get, method: HttpMethod::Get, path: "/colors/{id}" },
    Endpoint { resource: Resource::Groups, operation: Operation::GetAll, method: HttpMethod::Get, path: "/groups" },
    Endpoint { resource: Resource::Groups, operation: Operation::Get, method: HttpMethod::Get, path: "/groups/{id}" },
    Endpoint { resource: Resource::Items, operation: Operation::GetAll, method: HttpMethod::Get, path: "/items" },
    Endpoint { resource: Resource::Items, operation: Operation::Get, method: HttpMethod::Get, path: "/items/{id}" },
    Endpoint { resource: Resource::Items, operation: Operation::Create, method: HttpMethod::Post, path: "/items" },
];

/// Look up the endpoint for a pair, ignoring profiles.
pub fn resolve(resource: Resource, operation: Operation) -> Result<&'static Endpoint, NodeError> {
    ENDPOINTS
        .iter()
        .find(|e| e.resource == resource && e.operation == operation)
        .ok_or_else(|| unsupported(resource, operation))
}

pub(crate) fn unsupported(resource: Resource, operation: Operation) -> NodeError {
    NodeError::UnsupportedOperation {
        resource: resource.to_string(),
        operation: operation.to_string(),
    }
}

/// Which slice of the endpoint table a node instance exposes.
///
/// `Full` is the complete node. `ReadOnly` is the reduced variant without the
/// groups resource and without item creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeProfile {
    #[default]
    Full,
    ReadOnly,
}

impl NodeProfile {
    pub fn supports(&self, resource: Resource, operation: Operation) -> bool {
        match self {
            NodeProfile::Full => true,
            NodeProfile::ReadOnly => {
                resource != Resource::Groups && operation != Operation::Create
            }
        }
    }

    /// Resolve a pair, rejecting rows this profile switches off.
    pub fn resolve(
        &self,
        resource: Resource,
        operation: Operation,
    ) -> Result<&'static Endpoint, NodeError> {
        if !self.supports(resource, operation) {
            return Err(unsupported(resource, operation));
        }
        resolve(resource, operation)
    }

    /// Table rows enabled by this profile, in table order.
    pub fn endpoints(&self) -> impl Iterator<Item = &'static Endpoint> + '_ {
        ENDPOINTS
            .iter()
            .filter(move |e| self.supports(e.resource, e.operation))
    }

    /// Resources with at least one enabled row.
    pub fn resources(&self) -> Vec<Resource> {
        Resource::ALL
            .into_iter()
            .filter(|r| self.endpoints().any(|e| e.resource == *r))
            .collect()
    }
}

impl FromStr for NodeProfile {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(NodeProfile::Full),
            "readOnly" => Ok(NodeProfile::ReadOnly),
            other => Err(NodeError::invalid("profile", format!("unknown profile '{other}'"))),
        }
    }
}
