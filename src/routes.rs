use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState, csrf,
    error::{AppError, AppResult},
    forms::{self, AddMovieForm, FormErrors, RateMovieForm},
    ranking, templates,
};

const EXPIRED_FORM: &str = "The form has expired. Please submit it again.";

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<String>,
}

pub async fn index(State(state): State<AppState>) -> AppResult<Html<String>> {
    let movies = state.store.list_all().await?;
    let rankings = ranking::compute_rankings(&movies);
    state.store.persist_rankings(&rankings).await?;

    let movies = ranking::apply_rankings(movies, &rankings);
    Ok(Html(templates::index_page(&movies)))
}

pub async fn add_form(jar: SignedCookieJar) -> (SignedCookieJar, Html<String>) {
    let (jar, token) = csrf::issue(jar);
    (jar, Html(templates::add_page(&token, "", &FormErrors::new())))
}

pub async fn add_search(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<AddMovieForm>,
) -> AppResult<Response> {
    if !csrf::verify(&jar, &form.csrf_token) {
        let (jar, token) = csrf::issue(jar);
        let errors = FormErrors::single("form", EXPIRED_FORM);
        return Ok((jar, Html(templates::add_page(&token, &form.name, &errors))).into_response());
    }

    let query = match forms::validate_add(&form) {
        Ok(query) => query,
        Err(errors) => {
            let body = templates::add_page(&form.csrf_token, &form.name, &errors);
            return Ok(Html(body).into_response());
        },
    };

    let candidates = state.metadata.search_by_title(&query).await?;
    info!(query = %query, results = candidates.len(), "movie search");
    Ok(Html(templates::select_page(&query, &candidates)).into_response())
}

pub async fn find(State(state): State<AppState>, Query(q): Query<IdQuery>) -> AppResult<Redirect> {
    let Some(raw) = q.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Redirect::to("/add"));
    };
    let external_id: i64 =
        raw.parse().map_err(|_| AppError::bad_request(format!("invalid movie id: {raw}")))?;

    let details = state.metadata.fetch_by_id(external_id).await?;
    let movie = state.store.insert(details).await?;

    info!(movie_id = movie.id, tmdb_id = external_id, title = %movie.title, "added movie");
    Ok(Redirect::to(&format!("/edit?id={}", movie.id)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let id = movie_id(&q)?;
    let movie = state.store.get_by_id(id).await?;

    let (jar, token) = csrf::issue(jar);
    let rating = movie.rating.map(templates::format_rating).unwrap_or_default();
    Ok((jar, Html(templates::edit_page(&movie, &token, &rating, &FormErrors::new()))))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(q): Query<IdQuery>,
    Form(form): Form<RateMovieForm>,
) -> AppResult<Response> {
    let id = movie_id(&q)?;
    let movie = state.store.get_by_id(id).await?;

    if !csrf::verify(&jar, &form.csrf_token) {
        let (jar, token) = csrf::issue(jar);
        let errors = FormErrors::single("form", EXPIRED_FORM);
        let body = templates::edit_page(&movie, &token, &form.rating, &errors);
        return Ok((jar, Html(body)).into_response());
    }

    let rating = match forms::validate_rating(&form) {
        Ok(rating) => rating,
        Err(errors) => {
            let body = templates::edit_page(&movie, &form.csrf_token, &form.rating, &errors);
            return Ok(Html(body).into_response());
        },
    };

    state.store.update_rating(id, rating).await?;
    info!(movie_id = id, rating = rating, "rated movie");
    Ok(Redirect::to("/").into_response())
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Redirect> {
    let movie = state.store.delete(id).await?;
    info!(movie_id = id, title = %movie.title, "deleted movie");
    Ok(Redirect::to("/"))
}

fn movie_id(q: &IdQuery) -> AppResult<i32> {
    let raw = q
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("missing movie id"))?;
    raw.parse().map_err(|_| AppError::bad_request(format!("invalid movie id: {raw}")))
}
