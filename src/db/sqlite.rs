use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use super::model::*;
use super::repo::*;

type FavouriteRow = (
    i64,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<String>,
    Option<String>,
);

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(db_path: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        // Every connection to an in-memory database is a database of its own.
        let max_connections = if db_path.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let repo = Self { pool };

        repo.init_schema().await?;

        info!("Database initialized at {}", db_path);

        Ok(repo)
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let schema = include_str!("schema.sql");
        sqlx::query(schema).execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_item(row: FavouriteRow) -> StoreResult<FavouriteItem> {
    let genre_ids = match row.7.as_deref() {
        Some(s) if !s.is_empty() => serde_json::from_str(s)?,
        _ => Vec::new(),
    };
    Ok(FavouriteItem {
        external_id: row.0,
        title: row.1,
        poster_path: row.2,
        backdrop_path: row.3,
        release_date: row.4,
        vote_average: row.5.unwrap_or(0.0),
        overview: row.6.unwrap_or_default(),
        genre_ids,
    })
}

#[async_trait]
impl FavouriteRepo for SqliteRepository {
    async fn add(&self, item: &FavouriteItem) -> StoreResult<Outcome> {
        let genre_ids = serde_json::to_string(&item.genre_ids)?;
        let result = sqlx::query(
            "INSERT INTO favourite
            (tmdb_id, title, poster_path, backdrop_path, release_date, vote_average, overview, genre_ids, created)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(tmdb_id) DO NOTHING",
        )
        .bind(item.external_id)
        .bind(&item.title)
        .bind(&item.poster_path)
        .bind(&item.backdrop_path)
        .bind(&item.release_date)
        .bind(item.vote_average)
        .bind(&item.overview)
        .bind(genre_ids)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!("Movie {} is already in favourites", item.external_id);
            return Ok(Outcome::AlreadyPresent);
        }
        info!("Added favourite: {}", item.title);
        Ok(Outcome::Added)
    }

    async fn remove(&self, external_id: i64) -> StoreResult<Outcome> {
        let result = sqlx::query("DELETE FROM favourite WHERE tmdb_id = ?")
            .bind(external_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("No favourite found with tmdb_id {}", external_id);
            return Ok(Outcome::NotFound);
        }
        info!("Removed favourite with tmdb_id {}", external_id);
        Ok(Outcome::Removed)
    }

    async fn list(&self) -> StoreResult<Vec<FavouriteItem>> {
        let rows = sqlx::query_as::<_, FavouriteRow>(
            "SELECT tmdb_id, title, poster_path, backdrop_path, release_date, vote_average, overview, genre_ids
             FROM favourite",
        )
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(row_to_item)
            .collect::<StoreResult<Vec<_>>>()?;
        debug!("Fetched {} favourites", items.len());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str) -> FavouriteItem {
        FavouriteItem {
            external_id: id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            backdrop_path: None,
            release_date: Some("1999-03-31".to_string()),
            vote_average: 8.2,
            overview: "A hacker learns the truth.".to_string(),
            genre_ids: vec![28, 878],
        }
    }

    async fn memory_repo() -> SqliteRepository {
        SqliteRepository::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let repo = memory_repo().await;
        assert_eq!(repo.add(&item(603, "The Matrix")).await.unwrap(), Outcome::Added);
        assert_eq!(
            repo.add(&item(603, "The Matrix")).await.unwrap(),
            Outcome::AlreadyPresent
        );
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_never_overwrites() {
        let repo = memory_repo().await;
        repo.add(&item(603, "The Matrix")).await.unwrap();
        repo.add(&item(603, "Renamed")).await.unwrap();
        let items = repo.list().await.unwrap();
        assert_eq!(items[0].title, "The Matrix");
    }

    #[tokio::test]
    async fn test_remove_absent_is_not_an_error() {
        let repo = memory_repo().await;
        assert_eq!(repo.remove(42).await.unwrap(), Outcome::NotFound);

        repo.add(&item(42, "Hitchhiker")).await.unwrap();
        assert_eq!(repo.remove(42).await.unwrap(), Outcome::Removed);
        assert_eq!(repo.remove(42).await.unwrap(), Outcome::NotFound);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_keeps_all_fields() {
        let repo = memory_repo().await;
        let original = item(603, "The Matrix");
        repo.add(&original).await.unwrap();
        repo.add(&item(604, "The Matrix Reloaded")).await.unwrap();

        let mut items = repo.list().await.unwrap();
        items.sort_by_key(|i| i.external_id);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], original);
    }

    #[tokio::test]
    async fn test_malformed_genre_ids_is_a_storage_error() {
        let repo = memory_repo().await;
        sqlx::query("INSERT INTO favourite (tmdb_id, title, genre_ids) VALUES (1, 'Broken', 'not json')")
            .execute(&repo.pool)
            .await
            .unwrap();
        assert!(matches!(
            repo.list().await,
            Err(StorageError::Serialization(_))
        ));
    }
}
