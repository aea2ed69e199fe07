//! Catalog records as delivered by the show provider.
//!
//! Only the fields the cache and its clients read are typed. Everything
//! else the provider sends is kept in [`Show::extra`] and written back out
//! unchanged, so cached records round-trip without loss.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Provider-assigned show identifier.
///
/// Serialized as a bare integer. Used as the key of the cached record map,
/// where JSON encodes it as a string key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct ShowId(#[ts(type = "number")] pub u64);

impl ShowId {
    /// Return the raw provider identifier.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ShowId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Show {
    /// Unique provider identifier.
    pub id: ShowId,
    /// Display name.
    pub name: String,
    /// Genre labels in provider order. Duplicates are kept and each one
    /// counts towards the genre tally.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Aggregate audience rating.
    #[serde(default)]
    pub rating: Rating,
    /// Poster imagery, absent for some records.
    #[serde(default)]
    pub image: Option<Image>,
    /// HTML summary text.
    #[serde(default)]
    pub summary: Option<String>,
    /// Provider fields the cache does not interpret, passed through as-is.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Show {
    /// Build a record with the given id, name, and genres and no other data.
    pub fn new(id: u64, name: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id: ShowId(id),
            name: name.into(),
            genres: genres.iter().map(|g| (*g).to_owned()).collect(),
            rating: Rating::default(),
            image: None,
            summary: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Whether the record lists `genre` (case-sensitive).
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// The average rating, with an unrated show scoring zero.
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.average.unwrap_or(0.0)
    }
}

/// Audience rating block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Rating {
    /// Mean rating, `null` when the show has not been rated.
    pub average: Option<f64>,
}

/// Poster image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Image {
    /// Medium-sized poster URL.
    pub medium: String,
    /// Full-size poster URL.
    pub original: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_provider_record_and_keeps_unknown_fields() {
        let json = r#"{
            "id": 1,
            "name": "Under the Dome",
            "genres": ["Drama", "Science-Fiction", "Thriller"],
            "rating": {"average": 6.5},
            "image": {"medium": "m.jpg", "original": "o.jpg"},
            "summary": "<p>Dome.</p>",
            "language": "English",
            "premiered": "2013-06-24"
        }"#;
        let show: Show = serde_json::from_str(json).unwrap();
        assert_eq!(show.id, ShowId(1));
        assert_eq!(show.genres.len(), 3);
        assert_eq!(show.rating.average, Some(6.5));
        assert_eq!(
            show.extra.get("language").and_then(serde_json::Value::as_str),
            Some("English")
        );

        let back = serde_json::to_value(&show).unwrap();
        assert_eq!(back.get("premiered").and_then(serde_json::Value::as_str), Some("2013-06-24"));
    }

    #[test]
    fn missing_optional_blocks_default() {
        let show: Show = serde_json::from_str(r#"{"id": 7, "name": "Bare", "image": null}"#)
            .unwrap();
        assert!(show.genres.is_empty());
        assert!(show.image.is_none());
        assert!(show.rating.average.is_none());
        assert!(show.rating_or_zero().abs() < f64::EPSILON);
    }

    #[test]
    fn has_genre_is_case_sensitive() {
        let show = Show::new(1, "Drama Show", &["Drama"]);
        assert!(show.has_genre("Drama"));
        assert!(!show.has_genre("drama"));
    }
}
