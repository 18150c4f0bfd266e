use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{csrf, entities::movie, forms::FormErrors, models::Candidate};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

const INPUT_CLASS: &str = "mt-2 w-full rounded-md border border-gray-300 px-3 py-2 focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500";
const BUTTON_CLASS: &str =
    "w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700";

pub fn index_page(movies: &[movie::Model]) -> String {
    page(
        "My Top Movies",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    div class="flex items-start justify-between gap-6" {
                        div {
                            h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                            p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                        }
                        a class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                    }

                    @if movies.is_empty() {
                        div class="mt-10 bg-white shadow rounded-lg p-8" {
                            p class="text-gray-600" { "No movies yet. Add one to start your list." }
                        }
                    } @else {
                        div class="mt-10 space-y-4" {
                            @for movie in movies {
                                (movie_card(movie))
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(csrf_token: &str, name: &str, errors: &FormErrors) -> String {
    form_page(
        "Add a Movie",
        html! {
            form class="mt-8 space-y-6" method="post" action="/add" {
                (form_errors(errors))
                (csrf_field(csrf_token))
                div {
                    label class="block text-sm font-medium text-gray-700" for="name" { "Movie Title" }
                    input class=(INPUT_CLASS) name="name" id="name" value=(name) autofocus;
                    (field_errors(errors, "name"))
                }
                button class=(BUTTON_CLASS) type="submit" { "Add Movie" }
            }
        },
    )
}

pub fn select_page(query: &str, candidates: &[Candidate]) -> String {
    page(
        "Select Movie",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { "Select Movie" }
                        p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                        @if candidates.is_empty() {
                            p class="mt-6 text-gray-600" { "No matching movies found." }
                            a class="mt-4 inline-block text-blue-600 hover:text-blue-800" href="/add" { "Try another title" }
                        } @else {
                            ul class="mt-6 divide-y divide-gray-200" {
                                @for candidate in candidates {
                                    li class="py-3" {
                                        a class="text-blue-600 hover:text-blue-800" href=(format!("/find?id={}", candidate.external_id)) {
                                            (candidate.title)
                                            @if let Some(date) = &candidate.release_date {
                                                span class="ml-2 text-gray-500" { "- " (date) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn edit_page(movie: &movie::Model, csrf_token: &str, rating: &str, errors: &FormErrors) -> String {
    form_page(
        &movie.title,
        html! {
            p class="mt-2 text-gray-600" { "Edit Movie Rating" }
            form class="mt-8 space-y-6" method="post" action=(format!("/edit?id={}", movie.id)) {
                (form_errors(errors))
                (csrf_field(csrf_token))
                div {
                    label class="block text-sm font-medium text-gray-700" for="rating" { "Your Rating Out of 10 e.g. 7.5" }
                    input class=(INPUT_CLASS) name="rating" id="rating" inputmode="decimal" value=(rating) autofocus;
                    (field_errors(errors, "rating"))
                }
                button class=(BUTTON_CLASS) type="submit" { "Done" }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: String) -> String {
    let heading = status.canonical_reason().unwrap_or("Error");
    page(
        heading,
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { (heading) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn form_page(heading: &str, inner: Markup) -> String {
    page(
        heading,
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-2xl mx-auto px-6 py-12" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-3xl font-bold text-gray-900" { (heading) }
                        (inner)
                    }
                }
            }
        },
    )
}

fn movie_card(movie: &movie::Model) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg p-6 flex gap-6" {
            img class="w-28 rounded-md object-cover" src=(movie.img_url) alt=(movie.title);
            div class="flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        @if let Some(ranking) = movie.ranking {
                            span class="mr-2 text-blue-600" { "#" (ranking) }
                        }
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    span class="text-lg font-semibold text-gray-700" {
                        @match movie.rating {
                            Some(rating) => { (format_rating(rating)) " / 10" }
                            None => { span class="text-sm font-normal text-gray-500" { "not rated" } }
                        }
                    }
                }
                p class="mt-3 text-sm text-gray-700" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(format!("/edit?id={}", movie.id)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete/{}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

fn csrf_field(token: &str) -> Markup {
    html! { input type="hidden" name=(csrf::FIELD_NAME) value=(token); }
}

fn form_errors(errors: &FormErrors) -> Markup {
    html! {
        @for message in errors.for_field("form") {
            p class="rounded-md bg-red-50 px-3 py-2 text-sm text-red-700" { (message) }
        }
    }
}

fn field_errors(errors: &FormErrors, field: &str) -> Markup {
    html! {
        @for message in errors.for_field(field) {
            p class="mt-2 text-sm text-red-600" { (message) }
        }
    }
}

/// Ratings render without a trailing `.0` for whole numbers.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 { format!("{rating:.0}") } else { rating.to_string() }
}
