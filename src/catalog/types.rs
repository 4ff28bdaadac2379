use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub adult: bool,
    pub video: bool,
    pub genre_ids: Vec<i64>,
}

/// One page of catalog results. `page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<CatalogItem>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

impl CatalogPage {
    pub fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub tagline: Option<String>,
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub budget: u64,
    pub revenue: u64,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
}

// Wire shapes. Everything is optional here; `validate` decides what is usable.

#[derive(Debug, Deserialize)]
pub(crate) struct RawPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub popularity: Option<f64>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDetail {
    #[serde(flatten)]
    pub movie: RawMovie,
    pub tagline: Option<String>,
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    #[serde(default)]
    pub genres: Vec<RawNamedWithId>,
    #[serde(default)]
    pub production_companies: Vec<RawNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNamedWithId {
    pub id: i64,
    pub name: String,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

impl RawMovie {
    /// `None` without an id or a usable title.
    pub fn validate(self) -> Option<CatalogItem> {
        let id = self.id?;
        let original_title = non_empty(self.original_title);
        let title = match non_empty(self.title).or_else(|| original_title.clone()) {
            Some(t) => t,
            None => {
                warn!("Dropping catalog record {} without a title", id);
                return None;
            }
        };
        Some(CatalogItem {
            id,
            original_title: original_title.unwrap_or_else(|| title.clone()),
            title,
            original_language: self.original_language.unwrap_or_else(|| "en".to_string()),
            overview: self.overview.unwrap_or_default(),
            poster_path: non_empty(self.poster_path),
            backdrop_path: non_empty(self.backdrop_path),
            release_date: non_empty(self.release_date),
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            popularity: self.popularity.unwrap_or(0.0),
            adult: self.adult.unwrap_or(false),
            video: self.video.unwrap_or(false),
            genre_ids: self.genre_ids,
        })
    }
}

impl RawPage {
    pub fn validate(self, requested: u32) -> CatalogPage {
        let total = self.results.len();
        let items: Vec<CatalogItem> = self
            .results
            .into_iter()
            .filter_map(RawMovie::validate)
            .collect();
        if items.len() != total {
            warn!("Dropped {} invalid catalog records", total - items.len());
        }
        CatalogPage {
            items,
            page: self.page.unwrap_or(requested),
            total_pages: self.total_pages.unwrap_or(1),
            total_results: self.total_results.unwrap_or(0),
        }
    }
}

impl RawDetail {
    pub fn validate(self) -> Option<MovieDetail> {
        let mut movie = self.movie;
        if movie.genre_ids.is_empty() {
            movie.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        let item = movie.validate()?;
        Some(MovieDetail {
            item,
            tagline: non_empty(self.tagline),
            runtime: self.runtime,
            status: self.status,
            budget: self.budget.unwrap_or(0),
            revenue: self.revenue.unwrap_or(0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            production_companies: self
                .production_companies
                .into_iter()
                .map(|c| c.name)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_fills_defaults() {
        let raw: RawMovie = serde_json::from_str(r#"{"id": 550, "title": "Fight Club"}"#).unwrap();
        let item = raw.validate().unwrap();
        assert_eq!(item.id, 550);
        assert_eq!(item.original_title, "Fight Club");
        assert_eq!(item.vote_average, 0.0);
        assert!(item.genre_ids.is_empty());
        assert!(item.release_date.is_none());
    }

    #[test]
    fn test_validate_drops_records_without_id_or_title() {
        let page: RawPage = serde_json::from_str(
            r#"{"page": 2, "total_pages": 9, "total_results": 170, "results": [
                {"id": 1, "title": "Kept", "release_date": ""},
                {"title": "No id"},
                {"id": 3, "title": "  "},
                {"id": 4, "original_title": "Le Titre"}
            ]}"#,
        )
        .unwrap();
        let page = page.validate(2);
        let ids: Vec<i64> = page.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(page.items[0].release_date, None);
        assert_eq!(page.items[1].title, "Le Titre");
        assert_eq!(page.total_pages, 9);
        assert_eq!(page.total_results, 170);
    }

    #[test]
    fn test_detail_takes_genre_ids_from_genres() {
        let raw: RawDetail = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "runtime": 136, "budget": 63000000,
                "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
                "production_companies": [{"name": "Village Roadshow Pictures"}]}"#,
        )
        .unwrap();
        let detail = raw.validate().unwrap();
        assert_eq!(detail.item.genre_ids, vec![28, 878]);
        assert_eq!(detail.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(detail.runtime, Some(136));
        assert_eq!(detail.revenue, 0);
    }
}
