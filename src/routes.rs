// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{auth, community, interaction},
    state::AppState,
    store::images::UPLOAD_ROUTE,
    utils::jwt::identify_caller,
};

/// Assembles the main application router.
///
/// * Merges the user and community sub-routers.
/// * Serves uploaded images from the configured upload directory.
/// * Applies global middleware (Trace, CORS) and optional caller identification.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let user_routes = Router::new()
        .route("/signup", post(auth::sign_up))
        .route("/login", post(auth::login));

    let community_routes = Router::new()
        .route(
            "/posts",
            get(community::list_posts)
                .post(community::upload_post)
                .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/main", get(community::main_page_posts))
        .route("/comments", post(interaction::add_comment))
        .route("/posts/{post_id}/comments", get(interaction::list_comments))
        .route("/posts/{post_id}/like", post(interaction::add_like));

    Router::new()
        .nest("/api/user", user_routes)
        .nest("/api/community", community_routes)
        .nest_service(
            &format!("/{}", UPLOAD_ROUTE),
            ServeDir::new(&config.upload_dir),
        )
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::from_fn_with_state(config, identify_caller)),
        )
        .with_state(state)
}
