//! Recognition result panel
//!
//! Builds the render model for the results list. With a single camera the
//! records are shown as one flat list; with several they are split into one
//! section per camera ordinal.

use super::config::CameraEndpoint;
use super::record::RecognitionRecord;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// One displayed person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub id: String,
    pub name: String,
    /// Wall-clock time the person was observed, e.g. "3:04:05 PM"
    pub time_label: String,
    /// Rounded match percentage
    pub match_percent: u32,
}

/// Records seen on one camera
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSection {
    pub ordinal: u32,
    pub title: String,
    pub location: Option<String>,
    pub rows: Vec<ResultRow>,
}

/// What the result panel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "layout", content = "items", rename_all = "lowercase")]
pub enum ResultView {
    Flat(Vec<ResultRow>),
    Grouped(Vec<CameraSection>),
}

impl ResultView {
    /// Attach camera locations to sections, taking the first endpoint with a
    /// matching ordinal.
    pub fn annotate_locations(&mut self, endpoints: &[CameraEndpoint]) {
        if let ResultView::Grouped(sections) = self {
            for section in sections.iter_mut() {
                section.location = endpoints
                    .iter()
                    .find(|e| e.ordinal == section.ordinal)
                    .map(|e| e.location.clone());
            }
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            ResultView::Flat(rows) => rows.len(),
            ResultView::Grouped(sections) => sections.iter().map(|s| s.rows.len()).sum(),
        }
    }
}

/// Format an observation time as a short local clock reading
pub fn time_label<Tz>(observed_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    observed_at.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

fn row(record: &RecognitionRecord) -> ResultRow {
    ResultRow {
        id: record.id.clone(),
        name: record.display_name.clone(),
        time_label: time_label(&record.observed_at, &Local),
        match_percent: record.match_percent(),
    }
}

/// Build the panel contents; `None` means the panel is hidden.
pub fn render(active: bool, records: &[RecognitionRecord], camera_count: usize) -> Option<ResultView> {
    if !active || records.is_empty() {
        return None;
    }

    if camera_count <= 1 {
        return Some(ResultView::Flat(records.iter().map(row).collect()));
    }

    // BTreeMap keeps ordinals ascending; push order keeps records stable
    let mut groups: BTreeMap<u32, Vec<ResultRow>> = BTreeMap::new();
    for record in records {
        groups.entry(record.camera_ordinal).or_default().push(row(record));
    }

    let sections = groups
        .into_iter()
        .map(|(ordinal, rows)| CameraSection {
            ordinal,
            title: format!("Camera {}", ordinal),
            location: None,
            rows,
        })
        .collect();

    Some(ResultView::Grouped(sections))
}
