use std::sync::Arc;

use tracing::info;

use crate::browser::{BrowseError, CatalogBrowser};
use crate::catalog::{CatalogApi, CatalogPage};
use crate::config::Config;
use crate::db::{FavouriteItem, FavouriteRepo, StoreResult};
use crate::favourites::{FailurePolicy, FavouritesSync, Toggle};

pub struct Session {
    favourites: Arc<FavouritesSync>,
    browser: CatalogBrowser,
}

impl Session {
    pub fn new(
        store: Arc<dyn FavouriteRepo>,
        catalog: Arc<dyn CatalogApi>,
        policy: FailurePolicy,
        page_window: u32,
    ) -> Self {
        let favourites = Arc::new(FavouritesSync::new(store, policy));
        let browser = CatalogBrowser::new(catalog, favourites.clone(), page_window);
        Self {
            favourites,
            browser,
        }
    }

    pub fn from_config(
        store: Arc<dyn FavouriteRepo>,
        catalog: Arc<dyn CatalogApi>,
        config: &Config,
    ) -> Self {
        Self::new(
            store,
            catalog,
            config.favourites.on_write_failure,
            config.browser.page_window,
        )
    }

    pub async fn start(&self) -> Result<CatalogPage, BrowseError> {
        let (phase, page) = tokio::join!(self.favourites.load(), self.browser.load_page(1));
        info!("Session started, favourites {:?}", phase);
        page
    }

    pub async fn load_page(&self, page: u32) -> Result<CatalogPage, BrowseError> {
        self.browser.load_page(page).await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, BrowseError> {
        self.browser.search(query, page).await
    }

    pub async fn toggle_favourite(&self, item: FavouriteItem) -> Toggle {
        self.favourites.toggle(item).await
    }

    pub async fn remove_favourite(&self, external_id: i64) -> Option<Toggle> {
        self.favourites.unfavourite(external_id).await
    }

    pub async fn became_active(&self) -> StoreResult<Option<usize>> {
        self.favourites.became_active().await
    }

    pub fn favourites(&self) -> &FavouritesSync {
        &self.favourites
    }

    pub fn browser(&self) -> &CatalogBrowser {
        &self.browser
    }
}
