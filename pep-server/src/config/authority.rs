use confique::Config;
use url::Url;

/// Path of the decision endpoint on the authority
pub const IS_AUTHORIZED_PATH: &str = "/v1/is_authorized";

/// Configuration for the external decision authority
#[derive(Debug, Config, Clone)]
pub struct AuthorityConfig {
    /// Authority hostname (default: host.docker.internal)
    #[config(env = "PEP_AUTHORITY_HOST", default = "host.docker.internal")]
    pub host: String,

    /// Authority port (default: 8180)
    #[config(env = "PEP_AUTHORITY_PORT", default = 8180)]
    pub port: u16,

    /// URL scheme used to reach the authority, "http" or "https" (default: http)
    #[config(env = "PEP_AUTHORITY_SCHEME", default = "http")]
    pub scheme: String,

    /// The timeout for a single authorization query in seconds (default: 5)
    #[config(env = "PEP_AUTHORITY_QUERY_TIMEOUT", default = 5)]
    pub query_timeout: u64,

    /// The timeout for establishing a connection in seconds (default: 2)
    #[config(env = "PEP_AUTHORITY_CONNECT_TIMEOUT", default = 2)]
    pub connect_timeout: u64,
}

impl AuthorityConfig {
    /// Returns a properly formatted URL to the authority with the given path
    pub fn get_url<S: Into<String>>(&self, path: S) -> Result<Url, url::ParseError> {
        let path = path.into();
        let raw = if path.starts_with('/') {
            format!("{}://{}:{}{}", self.scheme, self.host, self.port, path)
        } else {
            format!("{}://{}:{}/{}", self.scheme, self.host, self.port, path)
        };
        Url::parse(&raw)
    }

    /// URL of the `is_authorized` decision endpoint
    pub fn is_authorized_url(&self) -> Result<Url, url::ParseError> {
        self.get_url(IS_AUTHORIZED_PATH)
    }

    pub(super) fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("authority host must not be empty".to_string());
        }
        if self.scheme != "http" && self.scheme != "https" {
            return Err(format!(
                "unsupported authority scheme '{}', expected 'http' or 'https'",
                self.scheme
            ));
        }
        if self.query_timeout == 0 {
            return Err("authority query timeout must be at least 1 second".to_string());
        }
        self.is_authorized_url()
            .map(|_| ())
            .map_err(|e| format!("invalid authority address: {e}"))
    }
}
