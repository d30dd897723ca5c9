use confique::Config;

/// Configuration of the enforcement middleware
#[derive(Debug, Config, Clone)]
pub struct EnforcementConfig {
    /// Let requests through unless the authority explicitly answers "Deny",
    /// including when the authority cannot be reached (default: false)
    #[config(env = "PEP_FAIL_OPEN", default = false)]
    pub fail_open: bool,

    /// Forward the JSON request body as the `context` of the query (default: true)
    #[config(env = "PEP_FORWARD_CONTEXT", default = true)]
    pub forward_context: bool,

    /// Request header carrying the pre-authenticated identity (default: user)
    #[config(env = "PEP_IDENTITY_HEADER", default = "user")]
    pub identity_header: String,

    /// Reject requests without an identity header with 400 instead of
    /// querying the authority with an empty principal (default: false)
    #[config(env = "PEP_REQUIRE_IDENTITY", default = false)]
    pub require_identity: bool,

    /// Largest request body buffered for context forwarding (default: 1 MiB)
    #[config(env = "PEP_MAX_BODY_BYTES", default = 1048576)]
    pub max_body_bytes: usize,
}

impl EnforcementConfig {
    pub(super) fn validate(&self) -> Result<(), String> {
        http::HeaderName::from_bytes(self.identity_header.as_bytes())
            .map(|_| ())
            .map_err(|_| format!("invalid identity header name '{}'", self.identity_header))
    }
}
