use async_trait::async_trait;

use super::model::*;

/// Durable set of favourites. Each call is atomic on its own.
#[async_trait]
pub trait FavouriteRepo: Send + Sync {
    async fn add(&self, item: &FavouriteItem) -> StoreResult<Outcome>;
    async fn remove(&self, external_id: i64) -> StoreResult<Outcome>;
    async fn list(&self) -> StoreResult<Vec<FavouriteItem>>;
}
