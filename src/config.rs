use serde::{Deserialize, Serialize};

use crate::favourites::FailurePolicy;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub favourites: FavouritesConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default = "default_tmdb_base")]
    pub base_url: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base(),
            access_token: None,
            language: default_language(),
            image_base: default_image_base(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FavouritesConfig {
    #[serde(default)]
    pub on_write_failure: FailurePolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowserConfig {
    #[serde(default = "default_page_window")]
    pub page_window: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            page_window: default_page_window(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WatchConfig {
    /// `{id}` in a provider url is replaced by the movie id.
    #[serde(default)]
    pub embeds: Vec<EmbedProvider>,
    #[serde(default)]
    pub direct: Vec<EmbedProvider>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbedProvider {
    pub name: String,
    pub url: String,
}

fn default_port() -> String {
    "3000".to_string()
}

fn default_tmdb_base() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_page_window() -> u32 {
    5
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        Self::from_yaml(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn get_database_path(&self) -> String {
        match self.database.sqlite {
            Some(ref sqlite) => sqlite.filename.clone(),
            None => "sqlite://cinefav.db".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.listen.port, "3000");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.browser.page_window, 5);
        assert_eq!(config.favourites.on_write_failure, FailurePolicy::Keep);
        assert_eq!(config.get_database_path(), "sqlite://cinefav.db");
        assert!(config.watch.embeds.is_empty());
        assert!(config.watch.direct.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(
            r#"
listen:
  address: 127.0.0.1
  port: "8080"
database:
  sqlite:
    filename: "sqlite:///var/lib/cinefav/favourites.db"
tmdb:
  access_token: secret
  language: nl-NL
favourites:
  on_write_failure: revert
browser:
  page_window: 7
watch:
  embeds:
    - name: Local player
      url: "https://player.example/embed/{id}"
  direct:
    - name: Direct player
      url: "https://direct.example/movie?tmdb={id}"
"#,
        )
        .unwrap();
        assert_eq!(config.listen.address.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.get_database_path(), "sqlite:///var/lib/cinefav/favourites.db");
        assert_eq!(config.tmdb.access_token.as_deref(), Some("secret"));
        assert_eq!(config.tmdb.image_base, "https://image.tmdb.org/t/p");
        assert_eq!(config.favourites.on_write_failure, FailurePolicy::Revert);
        assert_eq!(config.browser.page_window, 7);
        assert_eq!(config.watch.embeds[0].name, "Local player");
        assert_eq!(config.watch.direct[0].url, "https://direct.example/movie?tmdb={id}");
    }
}
