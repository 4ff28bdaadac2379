use serde::{Deserialize, Serialize};

use crate::catalog::MovieDetail;
use crate::watch::WatchLink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResponse {
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchResponse {
    pub id: i64,
    pub title: String,
    pub links: Vec<WatchLink>,
}
