use serde::Deserialize;

pub const MAX_RATING: f64 = 10.0;

#[derive(Debug, Default, Deserialize)]
pub struct AddMovieForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RateMovieForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError { field, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages attached to `field`, in submission order.
    pub fn for_field(&self, field: &str) -> impl Iterator<Item = &str> {
        self.0.iter().filter(move |e| e.field == field).map(|e| e.message.as_str())
    }
}

/// Returns the trimmed movie title to search for.
pub fn validate_add(form: &AddMovieForm) -> Result<String, FormErrors> {
    let name = form.name.trim();
    if name.is_empty() {
        return Err(FormErrors::single("name", "This field is required."));
    }
    Ok(name.to_string())
}

/// Returns the submitted rating as a number between 0 and 10.
pub fn validate_rating(form: &RateMovieForm) -> Result<f64, FormErrors> {
    let raw = form.rating.trim();
    if raw.is_empty() {
        return Err(FormErrors::single("rating", "This field is required."));
    }

    let rating: f64 = raw
        .parse()
        .map_err(|_| FormErrors::single("rating", "Rating must be a number, e.g. 7.5."))?;

    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
        return Err(FormErrors::single("rating", "Rating must be between 0 and 10."));
    }
    Ok(rating)
}
