use serde::Serialize;

/// A search hit from the metadata provider, offered to the user for selection.
#[derive(Clone, Debug, Serialize)]
pub struct Candidate {
    pub external_id: i64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub overview: String,
}

/// Full metadata for one movie, ready to be stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub year: i32,
    pub poster_url: String,
    pub description: String,
}
