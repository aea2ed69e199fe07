//! Per-genre occurrence tallies.
//!
//! [`GenreCounts`] is the value persisted under `store:genreCounts`. A tally
//! counts genre *tokens*, not distinct shows: a record listing `Drama`
//! twice adds two to `Drama`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::show::Show;

/// Genre label to occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct GenreCounts(#[ts(type = "Record<string, number>")] BTreeMap<String, u64>);

impl GenreCounts {
    /// An empty tally.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Tally every genre token of every show.
    pub fn from_shows<'a, I>(shows: I) -> Self
    where
        I: IntoIterator<Item = &'a Show>,
    {
        let mut counts = Self::new();
        for show in shows {
            for genre in &show.genres {
                counts.increment(genre, 1);
            }
        }
        counts
    }

    /// Add every entry of `delta` into this tally, creating missing genres.
    pub fn merge(&mut self, delta: &Self) -> &mut Self {
        for (genre, count) in &delta.0 {
            self.increment(genre, *count);
        }
        self
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Whether every tallied genre has reached `threshold`.
    ///
    /// An empty tally is satisfied: with no genres observed there is
    /// nothing left to fill.
    pub fn is_satisfied(&self, threshold: u64) -> bool {
        self.0.values().all(|count| *count >= threshold)
    }

    /// Count for `genre`, zero when it has never been seen.
    pub fn get(&self, genre: &str) -> u64 {
        self.0.get(genre).copied().unwrap_or(0)
    }

    /// Genres still below `threshold`, lowest count first.
    pub fn lacking(&self, threshold: u64) -> Vec<(&str, u64)> {
        let mut lacking: Vec<(&str, u64)> = self
            .0
            .iter()
            .filter(|(_, count)| **count < threshold)
            .map(|(genre, count)| (genre.as_str(), *count))
            .collect();
        lacking.sort_by_key(|(_, count)| *count);
        lacking
    }

    /// Iterate entries in genre order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(genre, count)| (genre.as_str(), *count))
    }

    /// Number of distinct genres tallied.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no genre has been tallied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn increment(&mut self, genre: &str, by: u64) {
        let entry = self.0.entry(genre.to_owned()).or_insert(0);
        *entry = entry.saturating_add(by);
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for GenreCounts {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(g, c)| (g.into(), c)).collect())
    }
}
