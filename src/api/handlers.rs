use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, warn};

use super::types::*;
use crate::catalog::{image_url, CatalogPage};
use crate::db::{FavouriteItem, Outcome, StoreResult, WriteResponse};
use crate::favourites::FavouriteStats;
use crate::server::AppState;
use crate::util::QueryParams;
use crate::watch::watch_links;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn popular_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<CatalogPage>, StatusCode> {
    let page = params.page().ok_or(StatusCode::BAD_REQUEST)?;
    state.catalog.popular(page).await.map(Json).map_err(|e| {
        warn!("Error fetching movies: {}", e);
        StatusCode::BAD_GATEWAY
    })
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<CatalogPage>, StatusCode> {
    let page = params.page().ok_or(StatusCode::BAD_REQUEST)?;
    let query = params
        .get("query")
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(StatusCode::BAD_REQUEST)?;

    state.catalog.search(query, page).await.map(Json).map_err(|e| {
        warn!("Error searching movies for '{}': {}", query, e);
        StatusCode::BAD_GATEWAY
    })
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<MovieResponse>, StatusCode> {
    let detail = state.catalog.movie(movie_id).await.map_err(|e| {
        warn!("Error fetching movie {}: {}", movie_id, e);
        StatusCode::NOT_FOUND
    })?;

    let image_base = &state.config.tmdb.image_base;
    Ok(Json(MovieResponse {
        poster_url: image_url(image_base, "w500", detail.item.poster_path.as_deref()),
        backdrop_url: image_url(image_base, "w1280", detail.item.backdrop_path.as_deref()),
        detail,
    }))
}

pub async fn watch_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> Result<Json<WatchResponse>, StatusCode> {
    let detail = state.catalog.movie(movie_id).await.map_err(|e| {
        warn!("Error fetching movie {} for watch page: {}", movie_id, e);
        StatusCode::NOT_FOUND
    })?;

    Ok(Json(WatchResponse {
        id: movie_id,
        links: watch_links(movie_id, &detail.item.title, &state.config.watch),
        title: detail.item.title,
    }))
}

pub async fn list_favourites(
    State(state): State<AppState>,
) -> Result<Json<Vec<FavouriteItem>>, StatusCode> {
    state.db.list().await.map(Json).map_err(|e| {
        error!("Error fetching favourites: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn favourite_stats(
    State(state): State<AppState>,
) -> Result<Json<FavouriteStats>, StatusCode> {
    let items = state.db.list().await.map_err(|e| {
        error!("Error fetching favourites: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(FavouriteStats::from_items(&items)))
}

pub async fn add_favourite(
    State(state): State<AppState>,
    Json(item): Json<FavouriteItem>,
) -> (StatusCode, Json<WriteResponse>) {
    write_response(state.db.add(&item).await, "Failed to add favourite")
}

pub async fn remove_favourite(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
) -> (StatusCode, Json<WriteResponse>) {
    write_response(state.db.remove(movie_id).await, "Failed to remove favourite")
}

fn write_response(result: StoreResult<Outcome>, failure: &str) -> (StatusCode, Json<WriteResponse>) {
    match result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(WriteResponse {
                success: true,
                message: outcome.message().to_string(),
                outcome: Some(outcome),
            }),
        ),
        Err(e) => {
            error!("{}: {}", failure, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WriteResponse {
                    success: false,
                    message: failure.to_string(),
                    outcome: None,
                }),
            )
        }
    }
}
