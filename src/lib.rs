pub mod config;
pub mod csrf;
pub mod db;
pub mod entities;
pub mod error;
pub mod forms;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod store;
pub mod templates;
pub mod tmdb;

use std::sync::Arc;

use axum::{Router, extract::FromRef, routing::get};
use axum_extra::extract::cookie::Key;
use tower_http::trace::TraceLayer;

use crate::{config::Config, store::MovieStore, tmdb::MetadataProvider};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MovieStore,
    pub metadata: Arc<dyn MetadataProvider>,
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: MovieStore,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        let cookie_key = Key::derive_from(config.secret_key.as_bytes());
        Self { config, store, metadata, cookie_key }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/add", get(routes::add_form).post(routes::add_search))
        .route("/find", get(routes::find))
        .route("/edit", get(routes::edit_form).post(routes::edit_submit))
        .route("/delete/{id}", get(routes::delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
