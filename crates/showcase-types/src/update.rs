//! Payloads pushed to stream subscribers and returned by provider search.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::genres::GenreCounts;
use crate::show::Show;

/// One stream event: the records that changed plus the current tally.
///
/// `shows` is `null` when only the tally changed (the closing event of a
/// revalidation pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShowsUpdate {
    /// Records merged by the mutation, if any.
    pub shows: Option<Vec<Show>>,
    /// Genre tally after the mutation.
    pub counts: GenreCounts,
}

impl ShowsUpdate {
    /// Payload carrying a batch of records.
    pub const fn records(shows: Vec<Show>, counts: GenreCounts) -> Self {
        Self {
            shows: Some(shows),
            counts,
        }
    }

    /// Payload carrying only a refreshed tally.
    pub const fn counts_only(counts: GenreCounts) -> Self {
        Self { shows: None, counts }
    }
}

/// One provider search result. The score is carried for completeness but
/// nothing downstream ranks by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SearchHit {
    /// Provider relevance score.
    pub score: f64,
    /// The matched record.
    pub show: Show,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_serializes_null_shows() {
        let update = ShowsUpdate::counts_only(GenreCounts::new());
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("shows").unwrap().is_null());
        assert!(json.get("counts").unwrap().as_object().unwrap().is_empty());
    }

    #[test]
    fn search_hit_decodes() {
        let hit: SearchHit =
            serde_json::from_str(r#"{"score": 0.9, "show": {"id": 3, "name": "Found"}}"#).unwrap();
        assert_eq!(hit.show.name, "Found");
    }
}
