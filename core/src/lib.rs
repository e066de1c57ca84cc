//! GREYHOUND node for workflow-automation hosts.
//!
//! # Overview
//! Maps a selected resource/operation and its form values to one HTTP request
//! against the GREYHOUND REST API, and normalizes the JSON response into the
//! host's output-record shape. Building and parsing are pure (host-does-IO);
//! `NodeExecutor` runs a batch over any `Transport`.
//!
//! # Design
//! - `GreyhoundClient` is stateless: base URL, auth header, profile.
//! - The resource/operation table is data (`ENDPOINTS`); `NodeProfile`
//!   selects the full node or the read-only variant from the same table.
//! - `NodeParameters` is resolved once per record from the host's form values.
//! - Per-record failures are `Result`s; `FailurePolicy` decides between
//!   fail-fast and collecting error records.

pub mod client;
pub mod config;
pub mod credentials;
pub mod description;
pub mod error;
pub mod executor;
pub mod http;
pub mod item;
pub mod output;
pub mod params;
pub mod query;
pub mod resource;
pub mod transport;

pub use client::GreyhoundClient;
pub use config::{FailurePolicy, NodeSettings};
pub use credentials::{GreyhoundCredentials, CREDENTIAL_FIELDS};
pub use description::NodeDescription;
pub use error::{ExecutionError, NodeError, TransportError};
pub use executor::NodeExecutor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use item::CreateItemBody;
pub use output::OutputRecord;
pub use params::{CreateItemFields, ItemListOptions, NodeParameters};
pub use query::{parse_color_refs, ItemFilter, ListValue};
pub use resource::{resolve, Endpoint, NodeProfile, Operation, Resource, ENDPOINTS};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
