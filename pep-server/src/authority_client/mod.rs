use crate::errors::ApiError;
use crate::models::{AuthorizationDecision, AuthorizationQuery};
use crate::state::AppState;
use axum::http::StatusCode;
use log::debug;
use thiserror::Error;

/// Send an authorization query to the decision authority and get its decision
pub async fn query_is_authorized(
    state: &AppState,
    query: &AuthorizationQuery,
) -> Result<AuthorizationDecision, AuthorityError> {
    let url = state.authority_url.as_str();
    debug!("Sending authorization query to authority at: {}", url);

    // Send request using the specialized authority client
    let response = state.authority_client.post(url).json(query).send().await?;

    // Check if the request was successful
    if !response.status().is_success() {
        let status = response.status();
        return Err(AuthorityError::InvalidStatus(status));
    }

    // Parse the response body
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Errors that can occur when querying the decision authority
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("Failed to send request to authority: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Authority request failed with status: {0}")]
    InvalidStatus(StatusCode),
    #[error("Failed to parse authority response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl AuthorityError {
    /// Whether the authority didn't answer in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthorityError::RequestError(e) if e.is_timeout())
    }
}

impl From<AuthorityError> for ApiError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::RequestError(ref e) if e.is_timeout() => {
                ApiError::gateway_timeout("Authorization service did not respond in time")
            }
            AuthorityError::RequestError(_) => {
                ApiError::bad_gateway("Failed to send request to authorization service")
            }
            AuthorityError::InvalidStatus(status) => ApiError::bad_gateway(format!(
                "Authorization service request failed with status: {}",
                status
            )),
            AuthorityError::ParseError(_) => {
                ApiError::bad_gateway("Failed to parse authorization service response")
            }
        }
    }
}
