use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const ARTICLES_TAG: &str = "Articles API";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::health::health_check,
        crate::api::articles::list_articles,
        crate::api::articles::create_article,
        crate::api::articles::update_article,
        crate::api::articles::delete_article,
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = ARTICLES_TAG, description = "Article endpoints, protected by the enforcement point"),
    ),
    info(
        title = "Policy Enforcement Point API",
        description = "Demo service gating every article route through an external decision authority",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
