//! Recognition records
//!
//! Records are produced in bulk by the simulated recognizer and replace the
//! previous set wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_ordinal() -> u32 {
    1
}

/// One "recognized" person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRecord {
    /// Opaque id, unique within a session
    pub id: String,

    pub display_name: String,

    /// Match confidence in [0, 1]
    pub confidence: f64,

    pub observed_at: DateTime<Utc>,

    /// 1-based camera number the person was seen on
    #[serde(default = "default_ordinal")]
    pub camera_ordinal: u32,
}

impl RecognitionRecord {
    /// Confidence as a whole percentage
    pub fn match_percent(&self) -> u32 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// A person the simulated recognizer always "sees"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub name: String,
    pub confidence: f64,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// The two people reported on every camera unless settings say otherwise
pub fn default_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("John Doe", 0.94),
        RosterEntry::new("Jane Smith", 0.87),
    ]
}

/// Build the fabricated result set: every roster entry once per camera
/// ordinal `1..=camera_count`, grouped by ordinal.
pub fn synthesize_records(
    roster: &[RosterEntry],
    camera_count: usize,
    now: DateTime<Utc>,
) -> Vec<RecognitionRecord> {
    (1..=camera_count.max(1) as u32)
        .flat_map(|ordinal| {
            roster
                .iter()
                .enumerate()
                .map(move |(k, entry)| RecognitionRecord {
                    id: format!("{}-cam{}", k + 1, ordinal),
                    display_name: entry.name.clone(),
                    confidence: entry.confidence,
                    observed_at: now,
                    camera_ordinal: ordinal,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_two_records_per_camera() {
        let now = Utc::now();
        for n in 1..=5 {
            let records = synthesize_records(&default_roster(), n, now);
            assert_eq!(records.len(), 2 * n);

            for ordinal in 1..=n as u32 {
                let count = records.iter().filter(|r| r.camera_ordinal == ordinal).count();
                assert_eq!(count, 2);
            }
        }
    }

    #[test]
    fn test_ids_unique_and_stable() {
        let records = synthesize_records(&default_roster(), 2, Utc::now());
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1-cam1", "2-cam1", "1-cam2", "2-cam2"]);

        let unique: HashSet<&str> = ids.into_iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_zero_cameras_treated_as_one() {
        let records = synthesize_records(&default_roster(), 0, Utc::now());
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.camera_ordinal == 1));
    }

    #[test]
    fn test_match_percent_rounds() {
        let mut record = synthesize_records(&default_roster(), 1, Utc::now()).remove(0);
        assert_eq!(record.match_percent(), 94);

        record.confidence = 0.875;
        assert_eq!(record.match_percent(), 88);
    }

    #[test]
    fn test_missing_ordinal_defaults_to_one() {
        let record: RecognitionRecord = serde_json::from_str(
            r#"{"id":"x","displayName":"A","confidence":0.5,"observedAt":"2024-01-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(record.camera_ordinal, 1);
    }
}
