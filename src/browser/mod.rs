pub mod pagination;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogApi, CatalogItem, CatalogPage};
use crate::favourites::FavouritesSync;

pub use pagination::{check_page, page_window};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("Pages start at 1")]
    PageZero,
    #[error("Page {page} is out of range (total pages: {total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowseError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Response discarded, a newer request was made")]
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Listing {
    Popular,
    Search(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub favourited: bool,
}

#[derive(Debug)]
struct BrowserState {
    listing: Listing,
    items: Vec<CatalogItem>,
    current_page: u32,
    // only known once a page of the current listing has been loaded
    total_pages: Option<u32>,
    total_results: u64,
    request_seq: u64,
}

pub struct CatalogBrowser {
    catalog: Arc<dyn CatalogApi>,
    favourites: Arc<FavouritesSync>,
    window: u32,
    state: Mutex<BrowserState>,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<dyn CatalogApi>, favourites: Arc<FavouritesSync>, window: u32) -> Self {
        Self {
            catalog,
            favourites,
            window,
            state: Mutex::new(BrowserState {
                listing: Listing::Popular,
                items: Vec::new(),
                current_page: 1,
                total_pages: None,
                total_results: 0,
                request_seq: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn load_page(&self, page: u32) -> Result<CatalogPage, BrowseError> {
        self.fetch(Listing::Popular, page).await
    }

    /// Blank queries are rejected without a request.
    pub async fn search(&self, query: &str, page: u32) -> Result<CatalogPage, BrowseError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return Err(ValidationError::EmptyQuery.into());
        }
        self.fetch(Listing::Search(query.to_string()), page).await
    }

    pub async fn clear_search(&self) -> Result<CatalogPage, BrowseError> {
        self.fetch(Listing::Popular, 1).await
    }

    async fn fetch(&self, listing: Listing, page: u32) -> Result<CatalogPage, BrowseError> {
        let seq = {
            let mut state = self.lock();
            let known = if state.listing == listing {
                state.total_pages
            } else {
                None
            };
            check_page(page, known)?;
            state.request_seq += 1;
            state.request_seq
        };

        let result = match &listing {
            Listing::Popular => self.catalog.popular(page).await,
            Listing::Search(query) => self.catalog.search(query, page).await,
        };

        let mut state = self.lock();
        if seq != state.request_seq {
            debug!("Discarding stale catalog response for page {}", page);
            return Err(BrowseError::Superseded);
        }

        match result {
            Ok(data) => {
                info!(
                    "Showing page {} of {} ({} results)",
                    data.page, data.total_pages, data.total_results
                );
                state.listing = listing;
                state.items = data.items.clone();
                state.current_page = data.page;
                state.total_pages = Some(data.total_pages.max(1));
                state.total_results = data.total_results;
                Ok(data)
            }
            Err(e) => {
                warn!("Catalog request for page {} failed: {}", page, e);
                if state.listing != listing {
                    state.total_pages = None;
                }
                state.listing = listing;
                state.items.clear();
                state.current_page = page;
                state.total_results = 0;
                Ok(CatalogPage::empty(page))
            }
        }
    }

    pub fn is_favourited(&self, external_id: i64) -> bool {
        self.favourites.is_favourited(external_id)
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.lock().items.clone()
    }

    pub fn annotated(&self) -> Vec<AnnotatedItem> {
        self.items()
            .into_iter()
            .map(|item| AnnotatedItem {
                favourited: self.favourites.is_favourited(item.id),
                item,
            })
            .collect()
    }

    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.lock().total_pages
    }

    pub fn total_results(&self) -> u64 {
        self.lock().total_results
    }

    pub fn query(&self) -> Option<String> {
        match self.lock().listing {
            Listing::Search(ref q) => Some(q.clone()),
            Listing::Popular => None,
        }
    }

    pub fn page_window(&self) -> Vec<u32> {
        let state = self.lock();
        page_window(
            state.current_page,
            state.total_pages.unwrap_or(0),
            self.window,
        )
    }
}
