use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::types::*;
use super::{CatalogApi, CatalogError, CatalogResult};
use crate::config::TmdbConfig;

const TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    access_token: String,
    language: String,
}

impl TmdbClient {
    /// Builds a client from config, falling back to `TMDB_ACCESS_TOKEN` for the token.
    pub fn new(config: &TmdbConfig) -> CatalogResult<Self> {
        let access_token = config
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                CatalogError::Config(format!("no tmdb access_token configured and {} not set", TOKEN_ENV))
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token,
            language: config.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> CatalogResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Catalog request: GET {} {:?}", url, query);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Catalog responded with status {} for {}", status, path);
            return Err(CatalogError::Status(status.as_u16()));
        }
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn popular(&self, page: u32) -> CatalogResult<CatalogPage> {
        let raw: RawPage = self
            .get_json(
                "/movie/popular",
                &[("language", self.language.clone()), ("page", page.to_string())],
            )
            .await?;
        let page = raw.validate(page);
        info!(
            "Popular page {} of {}, {} results",
            page.page,
            page.total_pages,
            page.items.len()
        );
        Ok(page)
    }

    async fn search(&self, query: &str, page: u32) -> CatalogResult<CatalogPage> {
        let raw: RawPage = self
            .get_json(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("language", self.language.clone()),
                    ("page", page.to_string()),
                ],
            )
            .await?;
        let page = raw.validate(page);
        info!(
            "Search '{}' page {} of {}, {} total results",
            query, page.page, page.total_pages, page.total_results
        );
        Ok(page)
    }

    async fn movie(&self, id: i64) -> CatalogResult<MovieDetail> {
        let raw: RawDetail = self
            .get_json(&format!("/movie/{}", id), &[("language", self.language.clone())])
            .await?;
        raw.validate()
            .ok_or_else(|| CatalogError::Invalid(format!("movie {} has no usable title", id)))
    }
}
