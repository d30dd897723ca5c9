use crate::openapi::ARTICLES_TAG;
use crate::state::AppState;
use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use log::debug;

const ARTICLES: [&str; 3] = ["article1", "article2", "article3"];

/// List all articles
#[utoipa::path(
    get,
    path = "/article",
    tag = ARTICLES_TAG,
    params(
        ("user" = String, Header, description = "Identity of the caller"),
    ),
    responses(
        (status = 200, description = "List of article identifiers", body = Vec<String>),
        (status = 403, description = "Access Denied", body = String),
        (status = 502, description = "Authorization service unavailable")
    )
)]
pub(crate) async fn list_articles() -> Json<Vec<&'static str>> {
    Json(ARTICLES.to_vec())
}

/// Create an article
#[utoipa::path(
    post,
    path = "/article/{id}",
    tag = ARTICLES_TAG,
    params(
        ("id" = String, Path, description = "Article identifier"),
        ("user" = String, Header, description = "Identity of the caller"),
    ),
    responses(
        (status = 200, description = "Article created", body = String),
        (status = 403, description = "Access Denied", body = String),
        (status = 502, description = "Authorization service unavailable")
    )
)]
pub(crate) async fn create_article(Path(id): Path<String>) -> &'static str {
    debug!("Creating article {}", id);
    "Article created"
}

/// Update an article
#[utoipa::path(
    put,
    path = "/article/{id}",
    tag = ARTICLES_TAG,
    params(
        ("id" = String, Path, description = "Article identifier"),
        ("user" = String, Header, description = "Identity of the caller"),
    ),
    responses(
        (status = 200, description = "Article updated", body = String),
        (status = 403, description = "Access Denied", body = String),
        (status = 502, description = "Authorization service unavailable")
    )
)]
pub(crate) async fn update_article(Path(id): Path<String>) -> &'static str {
    debug!("Updating article {}", id);
    "Article updated"
}

/// Delete an article
#[utoipa::path(
    delete,
    path = "/article/{id}",
    tag = ARTICLES_TAG,
    params(
        ("id" = String, Path, description = "Article identifier"),
        ("user" = String, Header, description = "Identity of the caller"),
    ),
    responses(
        (status = 200, description = "Article deleted", body = String),
        (status = 403, description = "Access Denied", body = String),
        (status = 502, description = "Authorization service unavailable")
    )
)]
pub(crate) async fn delete_article(Path(id): Path<String>) -> &'static str {
    debug!("Deleting article {}", id);
    "Article deleted"
}

/// Mock article routes; every one of them sits behind the enforcement middleware
pub(super) fn router() -> Router<AppState> {
    Router::new().route("/article", get(list_articles)).route(
        "/article/{id}",
        post(create_article)
            .put(update_article)
            .delete(delete_article),
    )
}
