use crate::config::PEPConfig;
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PEPConfig>,
    pub authority_client: Arc<Client>,
    pub authority_url: Arc<Url>,
}

impl AppState {
    fn create_authority_client(
        query_timeout: u64,
        connect_timeout: u64,
    ) -> Result<Client, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Create a specialized client for the decision authority
        Client::builder()
            .timeout(Duration::from_secs(query_timeout))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .default_headers(headers)
            // Configure connection pool
            .pool_max_idle_per_host(10) // Keep up to 10 idle connections per host
            .pool_idle_timeout(Some(Duration::from_secs(90))) // Keep idle connections for 90 seconds
            .build()
    }

    pub fn new(config: &PEPConfig) -> Result<Self, std::io::Error> {
        let authority_url = config.authority.is_authorized_url().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid authority URL: {}", e),
            )
        })?;
        let authority_client = Self::create_authority_client(
            config.authority.query_timeout,
            config.authority.connect_timeout,
        )
        .map_err(|e| std::io::Error::other(format!("Failed to create authority client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config.clone()),
            authority_client: Arc::new(authority_client),
            authority_url: Arc::new(authority_url),
        })
    }

    #[cfg(test)]
    pub fn for_testing(config: &PEPConfig) -> Self {
        Self::new(config).expect("Failed to create test state")
    }
}
