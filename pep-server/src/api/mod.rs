pub(crate) mod articles;
pub(crate) mod health;

use crate::enforcement::enforcement_middleware;
use crate::state::AppState;
use axum::{middleware, Router};

/// Combines all API routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(protected_routes(state))
}

/// Creates a router for routes that are gated by the decision authority
fn protected_routes(state: &AppState) -> Router<AppState> {
    // route_layer, so unmatched paths answer 404 without querying the authority
    articles::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        enforcement_middleware,
    ))
}
