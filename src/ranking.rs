use std::cmp::Ordering;

use crate::entities::movie;

/// Ranks movies by ascending rating: the worst-rated movie ranks 1 and the
/// best-rated ranks `count`. Unrated movies sort lowest; ties keep id order.
pub fn compute_rankings(movies: &[movie::Model]) -> Vec<(i32, i32)> {
    let mut order: Vec<&movie::Model> = movies.iter().collect();
    order.sort_by(|a, b| by_rating(a.rating, b.rating).then(a.id.cmp(&b.id)));

    order.iter().enumerate().map(|(index, movie)| (movie.id, index as i32 + 1)).collect()
}

/// Sets the derived `ranking` on each movie and returns them best-ranked first.
pub fn apply_rankings(
    mut movies: Vec<movie::Model>,
    rankings: &[(i32, i32)],
) -> Vec<movie::Model> {
    for &(id, ranking) in rankings {
        if let Some(movie) = movies.iter_mut().find(|m| m.id == id) {
            movie.ranking = Some(ranking);
        }
    }
    movies.sort_by_key(|m| std::cmp::Reverse(m.ranking));
    movies
}

fn by_rating(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
