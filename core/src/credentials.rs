//! GREYHOUND API credentials and the basic-auth header derived from them.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::NodeError;

/// Credential type name the node declares to the host.
pub const CREDENTIAL_TYPE: &str = "greyhoundApi";

pub const CREDENTIAL_DISPLAY_NAME: &str = "GREYHOUND API";

pub const DOCUMENTATION_URL: &str = "https://greyhound-software.com/docs/rest";

/// Declarative description of one user-supplied credential field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialField {
    pub name: &'static str,
    pub display_name: &'static str,
    pub placeholder: &'static str,
    pub description: &'static str,
    pub required: bool,
    /// Rendered masked by the host.
    pub secret: bool,
}

pub const CREDENTIAL_FIELDS: [CredentialField; 3] = [
    CredentialField {
        name: "baseUrl",
        display_name: "Base URL",
        placeholder: "https://your-greyhound-instance.com/rest",
        description: "The base URL of your GREYHOUND REST API (including /rest path)",
        required: true,
        secret: false,
    },
    CredentialField {
        name: "username",
        display_name: "Username",
        placeholder: "",
        description: "Username for authentication",
        required: true,
        secret: false,
    },
    CredentialField {
        name: "password",
        display_name: "Password",
        placeholder: "",
        description: "Password for authentication",
        required: true,
        secret: true,
    },
];

/// Decrypted credentials as the host hands them to the node.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GreyhoundCredentials {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl GreyhoundCredentials {
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Check that every field is present. The URL itself is not parsed;
    /// a bad one fails at request time.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.base_url.trim().is_empty() {
            return Err(NodeError::MissingCredential("baseUrl"));
        }
        if self.username.is_empty() {
            return Err(NodeError::MissingCredential("username"));
        }
        if self.password.is_empty() {
            return Err(NodeError::MissingCredential("password"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// `Basic base64(username:password)`.
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for GreyhoundCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreyhoundCredentials")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_header_is_basic_base64() {
        let creds = GreyhoundCredentials::new("https://gh.example.com/rest", "agent", "s3cret");
        // base64("agent:s3cret")
        assert_eq!(creds.authorization_header(), "Basic YWdlbnQ6czNjcmV0");
    }

    #[test]
    fn deserializes_host_credential_object() {
        let creds: GreyhoundCredentials = serde_json::from_str(
            r#"{"baseUrl":"https://gh.example.com/rest/","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(creds.normalized_base_url(), "https://gh.example.com/rest");
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let creds = GreyhoundCredentials::new("https://gh.example.com", "", "p");
        assert!(matches!(
            creds.validate(),
            Err(NodeError::MissingCredential("username"))
        ));
        let creds = GreyhoundCredentials::new(" ", "u", "p");
        assert!(matches!(
            creds.validate(),
            Err(NodeError::MissingCredential("baseUrl"))
        ));
        assert!(GreyhoundCredentials::new("x", "u", "p").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = GreyhoundCredentials::new("https://gh.example.com", "u", "hunter2");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn only_password_field_is_secret() {
        let secret: Vec<_> = CREDENTIAL_FIELDS
            .iter()
            .filter(|f| f.secret)
            .map(|f| f.name)
            .collect();
        assert_eq!(secret, vec!["password"]);
        assert!(CREDENTIAL_FIELDS.iter().all(|f| f.required));
    }
}
