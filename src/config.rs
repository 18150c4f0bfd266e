use std::net::SocketAddr;

use anyhow::{Context, bail};

/// Smallest secret accepted for deriving the cookie signing key.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub secret_key: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_url: String,
    pub database_url: String,
    pub tmdb_rps: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `var`, which returns the value of a setting
    /// if one is present.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "5000".to_string()).parse().context("PORT")?;

        let secret_key = var("SECRET_KEY").unwrap_or_default();
        if secret_key.len() < MIN_SECRET_LEN {
            bail!("SECRET_KEY must be set to at least {MIN_SECRET_LEN} bytes");
        }

        let tmdb_api_key = var("TMDB_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .or_else(|| var("API_KEY"))
            .unwrap_or_default();
        if tmdb_api_key.trim().is_empty() {
            bail!("TMDB_API_KEY (or API_KEY) must be set");
        }

        let tmdb_base_url =
            var("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_url =
            var("TMDB_IMAGE_URL").unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let database_url = var("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://movie-database.db?mode=rwc".to_string());

        let tmdb_rps: u32 = var("TMDB_RPS").and_then(|s| s.parse().ok()).unwrap_or(4);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            secret_key,
            tmdb_api_key: tmdb_api_key.trim().to_string(),
            tmdb_base_url,
            tmdb_image_url,
            database_url,
            tmdb_rps,
        })
    }
}
