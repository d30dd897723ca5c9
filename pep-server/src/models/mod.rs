use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type of the principal in an authorization query
pub const PRINCIPAL_TYPE: &str = "User";
/// Entity type of the action in an authorization query
pub const ACTION_TYPE: &str = "Action";
/// Entity type of the resource in an authorization query
pub const RESOURCE_TYPE: &str = "ResourceType";

/// Formats a type-qualified entity literal, e.g. `User::"alice"`.
///
/// The id is inserted verbatim; the identity is trusted to come from an
/// upstream authentication layer.
pub fn entity_literal(entity_type: &str, id: &str) -> String {
    format!("{entity_type}::\"{id}\"")
}

/// Authorization query sent to the decision authority.
///
/// Built fresh for every request and dropped once the decision is applied.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthorizationQuery {
    /// The principal, e.g. `User::"alice"`
    pub principal: String,
    /// The action, e.g. `Action::"get"`
    pub action: String,
    /// The resource, e.g. `ResourceType::"article"`
    pub resource: String,
    /// Request body forwarded as additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl AuthorizationQuery {
    /// Builds a query from the raw request attributes
    pub fn new(identity: &str, method: &http::Method, path: &str) -> Self {
        Self {
            principal: entity_literal(PRINCIPAL_TYPE, identity),
            action: entity_literal(ACTION_TYPE, &method.as_str().to_lowercase()),
            resource: entity_literal(RESOURCE_TYPE, first_path_segment(path)),
            context: None,
        }
    }

    /// Attaches the request context
    pub fn with_context(mut self, context: Option<serde_json::Value>) -> Self {
        self.context = context;
        self
    }
}

/// Returns the first segment after the leading slash: `/article/42` -> `article`
pub fn first_path_segment(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split('/').next().unwrap_or_default()
}

/// A decision returned by the authority
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Decision {
    Allow,
    Deny,
    /// Any other value the authority may answer with
    Other(String),
}

impl From<String> for Decision {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Allow" => Decision::Allow,
            "Deny" => Decision::Deny,
            _ => Decision::Other(value),
        }
    }
}

impl From<Decision> for String {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => "Allow".to_string(),
            Decision::Deny => "Deny".to_string(),
            Decision::Other(value) => value,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => f.write_str("Allow"),
            Decision::Deny => f.write_str("Deny"),
            Decision::Other(value) => write!(f, "{value:?}"),
        }
    }
}

/// Response body of the `is_authorized` endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuthorizationDecision {
    /// The decision, absent if the authority didn't provide one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}
