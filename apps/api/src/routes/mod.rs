pub mod health;
pub mod params;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::articles::handlers as articles;
use crate::auth::require_admin;
use crate::banners::handlers as banners;
use crate::blocks::handlers as blocks;
use crate::media::handlers as media;
use crate::public::handlers as public;
use crate::search::handlers as search;
use crate::state::AppState;
use crate::taxonomy::handlers as taxonomy;
use crate::tenants::handlers as tenants;

/// Headroom for multipart boundaries and the non-file fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/public/:tenant", public_routes())
        .nest("/api/admin", admin_routes(&state))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/theme", get(public::site_theme))
        .route("/:lang/articles", get(public::list_articles))
        .route("/:lang/articles/popular", get(public::popular_articles))
        .route("/:lang/articles/:slug", get(public::article_detail))
        .route("/:lang/categories", get(public::list_categories))
        .route("/:lang/categories/:slug", get(public::category_detail))
        .route("/:lang/tags", get(public::list_tags))
        .route("/:lang/writers/:id", get(public::writer_detail))
        .route("/:lang/banners", get(public::live_banners))
        .route("/:lang/blocks/:key", get(public::content_block))
        .route("/:lang/search", get(public::search_articles))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // Tenants
        .route("/tenants", get(tenants::list_tenants).post(tenants::create_tenant))
        .route(
            "/tenants/:id",
            get(tenants::get_tenant)
                .put(tenants::update_tenant)
                .delete(tenants::delete_tenant),
        )
        .route(
            "/tenants/:id/theme",
            get(tenants::get_theme).put(tenants::put_theme),
        )
        // Articles
        .route(
            "/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route(
            "/articles/:id",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/articles/:id/publish", post(articles::publish_article))
        .route("/articles/:id/unpublish", post(articles::unpublish_article))
        .route(
            "/articles/:id/translate",
            post(articles::translate_article_handler),
        )
        .route(
            "/articles/:id/suggest-tags",
            post(articles::suggest_article_tags),
        )
        // Taxonomy
        .route(
            "/categories",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route(
            "/categories/:id",
            put(taxonomy::update_category).delete(taxonomy::delete_category),
        )
        .route(
            "/categories/:id/translate",
            post(taxonomy::translate_category),
        )
        .route("/tags", get(taxonomy::list_tags).post(taxonomy::create_tag))
        .route("/tags/suggest", post(taxonomy::suggest_tags))
        .route(
            "/tags/:id",
            put(taxonomy::update_tag).delete(taxonomy::delete_tag),
        )
        .route("/tags/:id/translate", post(taxonomy::translate_tag))
        .route(
            "/writers",
            get(taxonomy::list_writers).post(taxonomy::create_writer),
        )
        .route(
            "/writers/:id",
            put(taxonomy::update_writer).delete(taxonomy::delete_writer),
        )
        .route("/writers/:id/translate", post(taxonomy::translate_writer))
        // Site furniture
        .route(
            "/banners",
            get(banners::list_banners).post(banners::create_banner),
        )
        .route(
            "/banners/:id",
            put(banners::update_banner).delete(banners::delete_banner),
        )
        .route(
            "/content-blocks",
            get(blocks::list_blocks).post(blocks::create_block),
        )
        .route(
            "/content-blocks/:id",
            put(blocks::update_block).delete(blocks::delete_block),
        )
        .route(
            "/content-blocks/:id/translate",
            post(blocks::translate_block),
        )
        // Media
        .route(
            "/media",
            get(media::list_media)
                .post(media::upload_media)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/media/:id", delete(media::delete_media))
        // AI
        .route("/ai/generate-article", post(ai::generate_article))
        .route("/ai/generate-image", post(ai::generate_image))
        // Search
        .route("/search/reindex", post(search::reindex))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::state::testing::test_state;

    async fn send(request: Request<Body>) -> StatusCode {
        let app = build_router(test_state().await);
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_responds_without_database() {
        let status = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_requires_bearer_token() {
        let status = send(
            Request::get("/api/admin/tenants")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let status = send(
            Request::get("/api/admin/tenants")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_validation_runs_after_auth() {
        // Missing tenant_id is rejected by the query extractor before any database access.
        let status = send(
            Request::get("/api/admin/categories")
                .header(header::AUTHORIZATION, "Bearer secret-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let status = send(Request::get("/api/nope").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_public_rejects_unknown_language_before_lookup() {
        let status = send(
            Request::get("/api/public/tokyo-eats/fr/articles")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
