use std::{num::NonZeroU32, sync::Arc};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Candidate, MovieDetails};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata provider unavailable: {0}")]
    Unavailable(String),

    #[error("metadata request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("no movie with id {0} at the metadata provider")]
    NotFound(i64),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Source of movie metadata: free-text search and lookup by provider id.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search_by_title(&self, query: &str) -> Result<Vec<Candidate>>;

    async fn fetch_by_id(&self, external_id: i64) -> Result<MovieDetails>;
}

pub struct TmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        image_base_url: String,
        rps: u32,
    ) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN));
        Self {
            client,
            api_key,
            base_url,
            image_base_url,
            limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_by_title(&self, query: &str) -> Result<Vec<Candidate>> {
        self.limiter.until_ready().await;

        tracing::debug!(query = %query, "searching TMDB");
        let resp = self
            .client
            .get(self.url("/search/movie"))
            .query(&[("api_key", self.api_key.as_str()), ("query", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::Unavailable(format!("search returned {status}")));
        }

        let body: SearchResponse = resp.json().await?;
        Ok(body.results.into_iter().map(Candidate::from).collect())
    }

    async fn fetch_by_id(&self, external_id: i64) -> Result<MovieDetails> {
        self.limiter.until_ready().await;

        tracing::debug!(tmdb_id = external_id, "fetching TMDB movie");
        let resp = self
            .client
            .get(self.url(&format!("/movie/{external_id}")))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => return Err(MetadataError::NotFound(external_id)),
            status if !status.is_success() => {
                return Err(MetadataError::Unavailable(format!("movie lookup returned {status}")));
            },
            _ => {},
        }

        let body: MovieResponse = resp.json().await?;
        body.into_details(&self.image_base_url)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchMovie>,
}

#[derive(Debug, Deserialize)]
struct SearchMovie {
    id: i64,
    title: String,
    release_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    overview: String,
}

impl From<SearchMovie> for Candidate {
    fn from(m: SearchMovie) -> Self {
        Candidate {
            external_id: m.id,
            title: m.title,
            release_date: m.release_date.filter(|d| !d.trim().is_empty()),
            poster_path: m.poster_path,
            overview: m.overview,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    title: String,
    release_date: Option<String>,
    poster_path: Option<String>,
    #[serde(default)]
    overview: String,
}

impl MovieResponse {
    fn into_details(self, image_base_url: &str) -> Result<MovieDetails> {
        let year = self
            .release_date
            .as_deref()
            .and_then(release_year)
            .ok_or_else(|| {
                MetadataError::Unavailable(format!("{} has no usable release date", self.title))
            })?;

        let poster_path = self
            .poster_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MetadataError::Unavailable(format!("{} has no poster", self.title)))?;

        Ok(MovieDetails {
            poster_url: poster_url(image_base_url, poster_path),
            title: self.title,
            year,
            description: self.overview,
        })
    }
}

/// Year of a `YYYY-MM-DD` release date. Falls back to the leading component
/// when the rest of the date is partial.
pub fn release_year(release_date: &str) -> Option<i32> {
    let release_date = release_date.trim();
    if let Ok(date) = release_date.parse::<jiff::civil::Date>() {
        return Some(i32::from(date.year()));
    }
    release_date.split('-').next()?.parse().ok()
}

pub fn poster_url(image_base_url: &str, poster_path: &str) -> String {
    format!("{image_base_url}{poster_path}")
}
