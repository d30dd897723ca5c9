pub mod policy;

pub use policy::DecisionPolicy;

use crate::authority_client::query_is_authorized;
use crate::errors::ApiError;
use crate::models::AuthorizationQuery;
use crate::state::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::LengthLimitError;
use log::{error, info, warn};

/// Body of the response sent when the authority rejects a request
pub const ACCESS_DENIED: &str = "Access Denied";

/// Enforcement point: asks the decision authority about every request before it
/// reaches its handler and only lets it through if the configured policy permits.
pub(crate) async fn enforcement_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let enforcement = &state.config.enforcement;

    let identity = match identity_from_headers(request.headers(), &enforcement.identity_header) {
        Some(identity) => identity,
        None if enforcement.require_identity => {
            warn!("Missing '{}' identity header", enforcement.identity_header);
            return ApiError::bad_request(format!(
                "Missing '{}' header",
                enforcement.identity_header
            ))
            .into_response();
        }
        None => String::new(),
    };

    let query = AuthorizationQuery::new(&identity, request.method(), request.uri().path());

    // Buffer the body so it can be sent as context and still reach the handler
    let (query, request) = if enforcement.forward_context {
        let (parts, body) = request.into_parts();
        let bytes = match to_bytes(body, enforcement.max_body_bytes).await {
            Ok(bytes) => bytes,
            Err(ref e) if is_length_limit_error(e) => {
                warn!(
                    "Request body exceeds the limit of {} bytes",
                    enforcement.max_body_bytes
                );
                return ApiError::payload_too_large("Request body too large").into_response();
            }
            Err(_) => {
                warn!("Failed to read request body");
                return ApiError::bad_request("Failed to read request body").into_response();
            }
        };
        let context = match parse_context(&bytes) {
            Ok(context) => context,
            Err(e) => {
                warn!("Request body is not valid JSON: {}", e);
                return ApiError::bad_request("Request body is not valid JSON").into_response();
            }
        };
        (
            query.with_context(context),
            Request::from_parts(parts, Body::from(bytes)),
        )
    } else {
        (query, request)
    };

    let policy = DecisionPolicy::from(enforcement);
    match query_is_authorized(&state, &query).await {
        Ok(result) => {
            let permitted = policy.permits(result.decision.as_ref());
            let decision = result
                .decision
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "<missing>".to_string());
            info!(
                "{} {} on {}: decision {}, {}",
                query.principal,
                query.action,
                query.resource,
                decision,
                if permitted { "proceeding" } else { "rejected" }
            );
            if permitted {
                next.run(request).await
            } else {
                access_denied()
            }
        }
        Err(err) if policy.permits_on_error() => {
            warn!(
                "Authority unavailable ({}), letting {} {} on {} through under {} policy",
                err, query.principal, query.action, query.resource, policy
            );
            next.run(request).await
        }
        Err(err) => {
            error!(
                "Authority unavailable{} ({}), rejecting {} {} on {}",
                if err.is_timeout() { " (timeout)" } else { "" },
                err,
                query.principal,
                query.action,
                query.resource
            );
            ApiError::from(err).into_response()
        }
    }
}

/// Extracts the pre-authenticated identity from the request headers.
///
/// A missing or non-UTF-8 header yields `None`.
pub fn identity_from_headers(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Parses the request body as the query context; an empty body has no context
fn parse_context(bytes: &Bytes) -> Result<Option<serde_json::Value>, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes).map(Some)
}

fn is_length_limit_error(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

fn access_denied() -> Response {
    (StatusCode::FORBIDDEN, ACCESS_DENIED).into_response()
}
