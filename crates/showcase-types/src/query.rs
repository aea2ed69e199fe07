//! Read-side helpers over cached records.

use crate::show::Show;

/// Shows listing `genre`, in input order. Matching is case-sensitive.
pub fn shows_in_genre<'a, I>(shows: I, genre: &str) -> Vec<&'a Show>
where
    I: IntoIterator<Item = &'a Show>,
{
    shows.into_iter().filter(|show| show.has_genre(genre)).collect()
}

/// A copy of `shows` ordered by average rating, highest first.
///
/// Unrated shows score zero. Ties keep their input order.
pub fn sort_by_rating<'a, I>(shows: I) -> Vec<Show>
where
    I: IntoIterator<Item = &'a Show>,
{
    let mut sorted: Vec<Show> = shows.into_iter().cloned().collect();
    sorted.sort_by(|a, b| b.rating_or_zero().total_cmp(&a.rating_or_zero()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::Rating;

    fn rated(id: u64, average: Option<f64>) -> Show {
        let mut show = Show::new(id, format!("Show {id}"), &[]);
        show.rating = Rating { average };
        show
    }

    fn ids<'a>(shows: impl IntoIterator<Item = &'a Show>) -> Vec<u64> {
        shows.into_iter().map(|s| s.id.into_inner()).collect()
    }

    #[test]
    fn filters_by_genre_in_order() {
        let shows = vec![
            Show::new(1, "Drama Show", &["Drama"]),
            Show::new(2, "Comedy Show", &["Comedy"]),
            Show::new(3, "Another Drama", &["Drama", "Thriller"]),
        ];
        assert_eq!(ids(shows_in_genre(&shows, "Drama")), vec![1, 3]);
        assert_eq!(ids(shows_in_genre(&shows, "Thriller")), vec![3]);
        assert!(shows_in_genre(&shows, "Horror").is_empty());
        assert!(shows_in_genre(&shows, "drama").is_empty());
        assert_eq!(shows.len(), 3);
    }

    #[test]
    fn sorts_highest_rating_first_with_unrated_last() {
        let shows = vec![rated(1, Some(7.0)), rated(2, None), rated(3, Some(9.1)), rated(4, Some(0.5))];
        assert_eq!(ids(&sort_by_rating(&shows)), vec![3, 1, 4, 2]);
        assert_eq!(ids(&shows), vec![1, 2, 3, 4]);
    }

    #[test]
    fn equal_ratings_keep_input_order() {
        let shows = vec![rated(5, Some(8.0)), rated(6, None), rated(7, Some(8.0)), rated(8, None)];
        assert_eq!(ids(&sort_by_rating(&shows)), vec![5, 7, 6, 8]);
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        assert!(sort_by_rating(std::iter::empty::<&Show>()).is_empty());
    }
}
