use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::*;
use super::repo::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone)]
pub struct RemoteFavourites {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteFavourites {
    pub fn new(base_url: &str) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn write_outcome(&self, resp: reqwest::Response) -> StoreResult<Outcome> {
        let status = resp.status();
        if !status.is_success() {
            return Err(StorageError::Status(status.as_u16()));
        }
        let body: WriteResponse = resp.json().await?;
        match body.outcome {
            Some(outcome) if body.success => Ok(outcome),
            _ => Err(StorageError::Status(status.as_u16())),
        }
    }
}

#[async_trait]
impl FavouriteRepo for RemoteFavourites {
    async fn add(&self, item: &FavouriteItem) -> StoreResult<Outcome> {
        let url = format!("{}/api/favourites", self.base_url);
        debug!("POST {}", url);
        let resp = self.client.post(&url).json(item).send().await?;
        self.write_outcome(resp).await
    }

    async fn remove(&self, external_id: i64) -> StoreResult<Outcome> {
        let url = format!("{}/api/favourites/{}", self.base_url, external_id);
        debug!("DELETE {}", url);
        let resp = self.client.delete(&url).send().await?;
        self.write_outcome(resp).await
    }

    async fn list(&self) -> StoreResult<Vec<FavouriteItem>> {
        let url = format!("{}/api/favourites", self.base_url);
        debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(StorageError::Status(status.as_u16()));
        }
        Ok(resp.json().await?)
    }
}
