use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use movierank::{
    AppState,
    config::Config,
    models::{Candidate, MovieDetails},
    store::MovieStore,
    tmdb::{MetadataError, MetadataProvider},
};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DUNE_ID: i64 = 438631;
pub const FLAKY_ID: i64 = 500;

/// Build a test `Config`; nothing in it points at a real service.
pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        secret_key: "test-secret-that-is-long-enough-for-cookie-signing".to_string(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_base_url: "http://tmdb.invalid/3".to_string(),
        tmdb_image_url: IMAGE_BASE.to_string(),
        database_url: "sqlite::memory:".to_string(),
        tmdb_rps: 100,
    }
}

/// Metadata provider that answers from a fixed catalogue and records searches.
#[derive(Default)]
pub struct FakeMetadata {
    pub movies: HashMap<i64, MovieDetails>,
    pub searches: Mutex<Vec<String>>,
}

impl FakeMetadata {
    pub fn with_dune() -> Self {
        let mut movies = HashMap::new();
        movies.insert(
            DUNE_ID,
            MovieDetails {
                title: "Dune".to_string(),
                year: 2021,
                poster_url: format!("{IMAGE_BASE}/abc.jpg"),
                description: "Paul Atreides travels to Arrakis.".to_string(),
            },
        );
        Self { movies, searches: Mutex::default() }
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataProvider for FakeMetadata {
    async fn search_by_title(&self, query: &str) -> Result<Vec<Candidate>, MetadataError> {
        self.searches.lock().unwrap().push(query.to_string());
        Ok(self
            .movies
            .iter()
            .filter(|(_, m)| m.title.to_lowercase().contains(&query.to_lowercase()))
            .map(|(id, m)| Candidate {
                external_id: *id,
                title: m.title.clone(),
                release_date: Some(format!("{}-10-22", m.year)),
                poster_path: Some("/abc.jpg".to_string()),
                overview: m.description.clone(),
            })
            .collect())
    }

    async fn fetch_by_id(&self, external_id: i64) -> Result<MovieDetails, MetadataError> {
        if external_id == FLAKY_ID {
            return Err(MetadataError::Unavailable("connection reset".to_string()));
        }
        self.movies.get(&external_id).cloned().ok_or(MetadataError::NotFound(external_id))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MovieStore,
    pub metadata: Arc<FakeMetadata>,
}

pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let db = movierank::db::connect_and_migrate(&config.database_url).await.unwrap();
    let store = MovieStore::new(db);
    let metadata = Arc::new(FakeMetadata::with_dune());

    let state = AppState::new(Arc::new(config), store.clone(), metadata.clone());
    TestApp { router: movierank::router(state), store, metadata }
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_form(
    app: &TestApp,
    uri: &str,
    cookie: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers().get(header::LOCATION).expect("missing Location header").to_str().unwrap()
}

/// Fetches a form page and returns the cookie to send back with the hidden
/// token embedded in the page.
pub async fn form_session(app: &TestApp, uri: &str) -> (String, String) {
    let response = get(app, uri).await;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("form page must set the csrf cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let body = body_string(response).await;
    let marker = r#"name="csrf_token" value=""#;
    let start = body.find(marker).expect("form must carry a csrf field") + marker.len();
    let end = start + body[start..].find('"').unwrap();
    (cookie, body[start..end].to_string())
}
