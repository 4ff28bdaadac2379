use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteItem {
    pub external_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl From<&CatalogItem> for FavouriteItem {
    fn from(item: &CatalogItem) -> Self {
        Self {
            external_id: item.id,
            title: item.title.clone(),
            poster_path: item.poster_path.clone(),
            backdrop_path: item.backdrop_path.clone(),
            release_date: item.release_date.clone(),
            vote_average: item.vote_average,
            overview: item.overview.clone(),
            genre_ids: item.genre_ids.clone(),
        }
    }
}

/// Result of a store write. Absence of the target state is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Added,
    AlreadyPresent,
    Removed,
    NotFound,
}

impl Outcome {
    pub fn changed(self) -> bool {
        matches!(self, Outcome::Added | Outcome::Removed)
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::Added => "Added to favourites",
            Outcome::AlreadyPresent => "Already in favourites",
            Outcome::Removed => "Favourite removed successfully",
            Outcome::NotFound => "Favourite not found or already removed",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Malformed record: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Store responded with status {0}")]
    Status(u16),
}

pub type StoreResult<T> = Result<T, StorageError>;
