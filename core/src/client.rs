//! Stateless HTTP request builder and response parser for the GREYHOUND API.
//!
//! # Design
//! `GreyhoundClient` holds the base URL, the precomputed authorization
//! header and the node profile, and carries no mutable state between calls.
//! Each table row has a `build_*` method producing an `HttpRequest`;
//! `build_request` dispatches on `NodeParameters`. `parse_response` turns any
//! response into output records. The caller executes the HTTP round-trip in
//! between.

use serde_json::Value;

use crate::credentials::GreyhoundCredentials;
use crate::error::NodeError;
use crate::http::{HttpRequest, HttpResponse};
use crate::item::CreateItemBody;
use crate::output::{normalize, OutputRecord};
use crate::params::{CreateItemFields, ItemListOptions, NodeParameters};
use crate::query::{list_values_sum, ItemFilter};
use crate::resource::{resolve, NodeProfile, Operation, Resource};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the GREYHOUND REST API.
#[derive(Debug, Clone)]
pub struct GreyhoundClient {
    base_url: String,
    authorization: String,
    profile: NodeProfile,
}

impl GreyhoundClient {
    pub fn new(credentials: &GreyhoundCredentials) -> Self {
        Self::with_profile(credentials, NodeProfile::Full)
    }

    pub fn with_profile(credentials: &GreyhoundCredentials, profile: NodeProfile) -> Self {
        Self {
            base_url: credentials.normalized_base_url().to_string(),
            authorization: credentials.authorization_header(),
            profile,
        }
    }

    pub fn profile(&self) -> NodeProfile {
        self.profile
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request for one record, rejecting operations the profile
    /// does not expose.
    pub fn build_request(&self, params: &NodeParameters) -> Result<HttpRequest, NodeError> {
        self.profile.resolve(params.resource(), params.operation())?;
        match params {
            NodeParameters::ListColors { offset } => self.build_list_colors(*offset),
            NodeParameters::GetColor { color_id } => self.build_get_color(color_id),
            NodeParameters::ListGroups { offset } => self.build_list_groups(*offset),
            NodeParameters::GetGroup { group_id } => self.build_get_group(group_id),
            NodeParameters::ListItems(options) => self.build_list_items(options),
            NodeParameters::GetItem { item_id } => self.build_get_item(item_id),
            NodeParameters::CreateItem(fields) => self.build_create_item(fields),
        }
    }

    pub fn build_list_colors(&self, offset: Option<u64>) -> Result<HttpRequest, NodeError> {
        self.endpoint_request(Resource::Colors, Operation::GetAll, None, offset_query(offset), None)
    }

    pub fn build_get_color(&self, color_id: &str) -> Result<HttpRequest, NodeError> {
        self.build_get_one(Resource::Colors, color_id)
    }

    pub fn build_list_groups(&self, offset: Option<u64>) -> Result<HttpRequest, NodeError> {
        self.endpoint_request(Resource::Groups, Operation::GetAll, None, offset_query(offset), None)
    }

    pub fn build_get_group(&self, group_id: &str) -> Result<HttpRequest, NodeError> {
        self.build_get_one(Resource::Groups, group_id)
    }

    /// `listValues` comes first, then `filter`, then `offset`.
    pub fn build_list_items(&self, options: &ItemListOptions) -> Result<HttpRequest, NodeError> {
        let mut query = Vec::new();
        if let Some(sum) = list_values_sum(&options.list_values) {
            query.push(("listValues".to_string(), sum.to_string()));
        }
        if let Some(filter) = ItemFilter::from_color_refs(&options.color_refs) {
            query.push(("filter".to_string(), filter.to_query_value()?));
        }
        query.extend(offset_query(options.offset));
        self.endpoint_request(Resource::Items, Operation::GetAll, None, query, None)
    }

    pub fn build_get_item(&self, item_id: &str) -> Result<HttpRequest, NodeError> {
        self.build_get_one(Resource::Items, item_id)
    }

    pub fn build_create_item(&self, fields: &CreateItemFields) -> Result<HttpRequest, NodeError> {
        let body = serde_json::to_string(&CreateItemBody::from(fields))
            .map_err(|e| NodeError::Serialization(e.to_string()))?;
        self.endpoint_request(Resource::Items, Operation::Create, None, Vec::new(), Some(body))
    }

    /// Turn a response into output records paired with input `paired_item`.
    pub fn parse_response(
        &self,
        response: HttpResponse,
        paired_item: usize,
    ) -> Result<Vec<OutputRecord>, NodeError> {
        check_status(&response)?;
        let value = if response.body.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(&response.body)
                .map_err(|e| NodeError::Deserialization(e.to_string()))?
        };
        Ok(normalize(value, paired_item))
    }

    fn build_get_one(&self, resource: Resource, id: &str) -> Result<HttpRequest, NodeError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(NodeError::MissingParameter(resource.id_parameter()));
        }
        self.endpoint_request(resource, Operation::Get, Some(id), Vec::new(), None)
    }

    /// Method and path always come from the endpoint table.
    fn endpoint_request(
        &self,
        resource: Resource,
        operation: Operation,
        id: Option<&str>,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<HttpRequest, NodeError> {
        let endpoint = resolve(resource, operation)?;
        Ok(HttpRequest {
            method: endpoint.method,
            url: format!("{}{}", self.base_url, endpoint.path_for(id)),
            query,
            headers: self.headers(),
            body,
        })
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("accept".to_string(), JSON.to_string()),
            ("content-type".to_string(), JSON.to_string()),
            ("authorization".to_string(), self.authorization.clone()),
        ]
    }
}

/// Offset zero means "from the start" and is not sent.
fn offset_query(offset: Option<u64>) -> Vec<(String, String)> {
    match offset {
        Some(n) if n > 0 => vec![("offset".to_string(), n.to_string())],
        _ => Vec::new(),
    }
}

/// Map non-success status codes to the appropriate `NodeError` variant.
fn check_status(response: &HttpResponse) -> Result<(), NodeError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(NodeError::NotFound);
    }
    Err(NodeError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::resource::ENDPOINTS;
    use serde_json::json;

    fn client() -> GreyhoundClient {
        GreyhoundClient::new(&GreyhoundCredentials::new(
            "https://gh.example.com/rest/",
            "admin",
            "secret",
        ))
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn every_request_carries_json_and_basic_auth_headers() {
        let req = client().build_list_colors(None).unwrap();
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
                ("authorization".to_string(), "Basic YWRtaW46c2VjcmV0".to_string()),
            ]
        );
    }

    #[test]
    fn every_builder_follows_the_endpoint_table() {
        let c = client();
        for endpoint in ENDPOINTS.iter() {
            let params = match (endpoint.resource, endpoint.operation) {
                (Resource::Colors, Operation::GetAll) => NodeParameters::ListColors { offset: None },
                (Resource::Colors, Operation::Get) => NodeParameters::GetColor { color_id: "7".into() },
                (Resource::Groups, Operation::GetAll) => NodeParameters::ListGroups { offset: None },
                (Resource::Groups, Operation::Get) => NodeParameters::GetGroup { group_id: "7".into() },
                (Resource::Items, Operation::GetAll) => {
                    NodeParameters::ListItems(ItemListOptions::default())
                }
                (Resource::Items, Operation::Get) => NodeParameters::GetItem { item_id: "7".into() },
                (Resource::Items, Operation::Create) => {
                    NodeParameters::CreateItem(CreateItemFields::new(1, "s", "f", "r"))
                }
                other => panic!("no parameters for {other:?}"),
            };
            let req = c.build_request(&params).unwrap();
            assert_eq!(req.method, endpoint.method, "{:?}", endpoint.path);
            assert_eq!(
                req.url,
                format!("https://gh.example.com/rest{}", endpoint.path_for(Some("7")))
            );
        }
    }

    #[test]
    fn list_colors_sends_offset_only_when_nonzero() {
        let req = client().build_list_colors(Some(0)).unwrap();
        assert_eq!(req.url, "https://gh.example.com/rest/colors");
        assert!(req.query.is_empty());

        let req = client().build_list_colors(Some(5)).unwrap();
        assert_eq!(req.query_param("offset"), Some("5"));
        assert_eq!(req.full_url(), "https://gh.example.com/rest/colors?offset=5");
    }

    #[test]
    fn list_groups_supports_offset() {
        let req = client().build_list_groups(Some(101)).unwrap();
        assert_eq!(req.full_url(), "https://gh.example.com/rest/groups?offset=101");
    }

    #[test]
    fn get_requests_embed_the_id() {
        let c = client();
        assert_eq!(c.build_get_color("3").unwrap().url, "https://gh.example.com/rest/colors/3");
        assert_eq!(c.build_get_group("8").unwrap().url, "https://gh.example.com/rest/groups/8");
        let req = c.build_get_item(" 1234 ").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://gh.example.com/rest/items/1234");
        assert!(req.body.is_none());
    }

    #[test]
    fn get_with_blank_id_is_missing_parameter() {
        let err = client().build_get_item("").unwrap_err();
        assert!(matches!(err, NodeError::MissingParameter("itemId")));
    }

    #[test]
    fn list_items_builds_filter_list_values_and_offset() {
        let options = ItemListOptions {
            offset: Some(5),
            color_refs: vec![1, 2, 3],
            list_values: vec![1, 4096, 8192],
        };
        let req = client().build_list_items(&options).unwrap();
        assert_eq!(
            req.query,
            vec![
                ("listValues".to_string(), "12289".to_string()),
                ("filter".to_string(), r#"{"ColorRefs":[1,2,3]}"#.to_string()),
                ("offset".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn list_items_without_options_has_no_query() {
        let req = client().build_list_items(&ItemListOptions::default()).unwrap();
        assert!(req.query.is_empty());
        assert_eq!(req.full_url(), "https://gh.example.com/rest/items");
    }

    #[test]
    fn create_item_posts_wrapped_payload() {
        let fields = CreateItemFields::new(42, "Hello", "me@example.com", "a@x.com, b@y.com");
        let req = client().build_create_item(&fields).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://gh.example.com/rest/items");
        assert!(req.query.is_empty());
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["Item"]["GroupRef"], 42);
        assert_eq!(
            body["Item"]["Recipients"],
            json!([{"Text": "a@x.com"}, {"Text": "b@y.com"}])
        );
    }

    #[test]
    fn read_only_profile_rejects_create_and_groups() {
        let creds = GreyhoundCredentials::new("https://gh.example.com/rest", "u", "p");
        let c = GreyhoundClient::with_profile(&creds, NodeProfile::ReadOnly);
        let create = NodeParameters::CreateItem(CreateItemFields::new(1, "s", "f", "r"));
        assert!(matches!(
            c.build_request(&create),
            Err(NodeError::UnsupportedOperation { .. })
        ));
        let groups = NodeParameters::ListGroups { offset: None };
        assert!(c.build_request(&groups).is_err());
        assert!(c.build_request(&NodeParameters::ListColors { offset: None }).is_ok());
    }

    #[test]
    fn parse_array_response_spreads_records() {
        let records = client()
            .parse_response(response(200, r#"[{"ID":1},{"ID":2}]"#), 3)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.paired_item == 3));
    }

    #[test]
    fn parse_created_item_yields_single_record() {
        let records = client()
            .parse_response(response(201, r#"{"ID":77,"Subject":"Hello"}"#), 0)
            .unwrap();
        assert_eq!(records, vec![OutputRecord::new(json!({"ID":77,"Subject":"Hello"}), 0)]);
    }

    #[test]
    fn parse_empty_success_body_yields_empty_object() {
        let records = client().parse_response(response(204, ""), 1).unwrap();
        assert_eq!(records, vec![OutputRecord::new(json!({}), 1)]);
    }

    #[test]
    fn parse_not_found() {
        let err = client().parse_response(response(404, ""), 0).unwrap_err();
        assert!(matches!(err, NodeError::NotFound));
    }

    #[test]
    fn parse_unauthorized_is_http_error() {
        let err = client().parse_response(response(401, "denied"), 0).unwrap_err();
        assert!(matches!(err, NodeError::Http { status: 401, .. }));
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_response(response(200, "not json"), 0).unwrap_err();
        assert!(matches!(err, NodeError::Deserialization(_)));
    }
}
