use serde::{Deserialize, Serialize};

use crate::db::FavouriteItem;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FavouriteStats {
    pub count: usize,
    pub highest_rated: Option<f64>,
    pub oldest_year: Option<i32>,
}

impl FavouriteStats {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a FavouriteItem>) -> Self {
        let mut stats = FavouriteStats::default();
        for item in items {
            stats.count += 1;
            stats.highest_rated = Some(match stats.highest_rated {
                Some(r) => r.max(item.vote_average),
                None => item.vote_average,
            });
            if let Some(year) = item.release_date.as_deref().and_then(release_year) {
                stats.oldest_year = Some(stats.oldest_year.map_or(year, |y| y.min(year)));
            }
        }
        stats
    }
}

pub fn release_year(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}
