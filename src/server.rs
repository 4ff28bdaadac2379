use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api;
use crate::catalog::CatalogApi;
use crate::config::Config;
use crate::db::FavouriteRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn FavouriteRepo>,
    pub catalog: Arc<dyn CatalogApi>,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn FavouriteRepo>, catalog: Arc<dyn CatalogApi>) -> Self {
        Self {
            config: Arc::new(config),
            db,
            catalog,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/api/movies", get(api::popular_movies))
        .route("/api/search", get(api::search_movies))
        .route("/api/movies/:id", get(api::get_movie))
        .route("/api/movies/:id/watch", get(api::watch_movie));

    let favourite_routes = Router::new()
        .route(
            "/api/favourites",
            get(api::list_favourites).post(api::add_favourite),
        )
        .route("/api/favourites/:id", delete(api::remove_favourite))
        .route("/api/stats", get(api::favourite_stats));

    Router::new()
        .route("/health", get(api::health))
        .merge(catalog_routes)
        .merge(favourite_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
