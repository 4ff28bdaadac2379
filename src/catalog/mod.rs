pub mod tmdb;
pub mod types;

use async_trait::async_trait;

pub use tmdb::TmdbClient;
pub use types::{CatalogItem, CatalogPage, MovieDetail};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn popular(&self, page: u32) -> CatalogResult<CatalogPage>;
    async fn search(&self, query: &str, page: u32) -> CatalogResult<CatalogPage>;
    async fn movie(&self, id: i64) -> CatalogResult<MovieDetail>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog responded with status {0}")]
    Status(u16),
    #[error("Invalid catalog record: {0}")]
    Invalid(String),
    #[error("Catalog configuration error: {0}")]
    Config(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub fn image_url(image_base: &str, size: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{}/{}{}", image_base.trim_end_matches('/'), size, p))
}
