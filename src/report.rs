// 📊 Visit report - Exportable snapshot of the journey so far
//
// Built on demand from tracker state; serializes to JSON or CSV.

use crate::catalog::{Catalog, PoiId};
use crate::tracker::VisitTracker;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One visited POI in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitedPoi {
    pub id: PoiId,
    pub name: String,
    pub poi_type: String,
    pub distance: String,
    pub visited_at: Option<DateTime<Utc>>,
}

/// Snapshot of visit state for export or the stats API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitReport {
    pub total_pois: usize,
    pub visited_count: usize,
    pub progress: u8,
    pub visited: Vec<VisitedPoi>,
    pub exported_at: DateTime<Utc>,
}

impl VisitReport {
    /// Snapshot the tracker. Visited entries follow catalog order.
    pub fn build(catalog: &Catalog, tracker: &VisitTracker) -> Self {
        let visited = tracker
            .visited_pois()
            .into_iter()
            .map(|poi| VisitedPoi {
                id: poi.id,
                name: poi.name.clone(),
                poi_type: poi.poi_type.as_str().to_string(),
                distance: poi.distance.clone(),
                visited_at: tracker.visited_at(poi.id),
            })
            .collect();

        VisitReport {
            total_pois: catalog.len(),
            visited_count: tracker.visited_count(),
            progress: tracker.progress(),
            visited,
            exported_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize visit report")
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))
    }

    /// CSV with one row per visited POI.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(["id", "name", "type", "distance", "visited_at"])
            .context("Failed to write CSV header")?;

        for poi in &self.visited {
            let visited_at = poi
                .visited_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            writer
                .write_record([
                    poi.id.to_string(),
                    poi.name.clone(),
                    poi.poi_type.clone(),
                    poi.distance.clone(),
                    visited_at,
                ])
                .context("Failed to write CSV row")?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV writer")?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let csv = self.to_csv()?;
        std::fs::write(path.as_ref(), csv)
            .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Coordinates, Poi, PoiType};
    use std::sync::Arc;

    fn catalog() -> Arc<Catalog> {
        let poi = |id, name: &str| Poi {
            id,
            name: name.to_string(),
            poi_type: PoiType::Town,
            distance: format!("{} km from Shanghai", id * 1000),
            description: String::new(),
            story: String::new(),
            coordinates: Coordinates::new(30.0, 100.0),
            images: vec![],
            tips: vec![],
        };
        Arc::new(Catalog::new(vec![poi(1, "Kangding"), poi(2, "Litang")]))
    }

    #[test]
    fn test_report_matches_tracker_state() {
        let catalog = catalog();
        let mut tracker = VisitTracker::new(catalog.clone());
        tracker.mark_visited(2);

        let report = VisitReport::build(&catalog, &tracker);

        assert_eq!(report.total_pois, 2);
        assert_eq!(report.visited_count, 1);
        assert_eq!(report.progress, 50);
        assert_eq!(report.visited.len(), 1);
        assert_eq!(report.visited[0].name, "Litang");
        assert!(report.visited[0].visited_at.is_some());
    }

    #[test]
    fn test_empty_report() {
        let catalog = catalog();
        let tracker = VisitTracker::new(catalog.clone());

        let report = VisitReport::build(&catalog, &tracker);

        assert_eq!(report.visited_count, 0);
        assert_eq!(report.progress, 0);
        assert!(report.visited.is_empty());
    }

    #[test]
    fn test_json_export() {
        let catalog = catalog();
        let mut tracker = VisitTracker::new(catalog.clone());
        tracker.mark_visited(1);

        let json = VisitReport::build(&catalog, &tracker).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_pois"], 2);
        assert_eq!(value["progress"], 50);
        assert_eq!(value["visited"][0]["name"], "Kangding");
        assert!(value["exported_at"].is_string());
    }

    #[test]
    fn test_csv_export() {
        let catalog = catalog();
        let mut tracker = VisitTracker::new(catalog.clone());
        tracker.mark_visited(1);
        tracker.mark_visited(2);

        let csv = VisitReport::build(&catalog, &tracker).to_csv().unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next().unwrap(), "id,name,type,distance,visited_at");
        assert!(lines.next().unwrap().starts_with("1,Kangding,Town,"));
        assert!(lines.next().unwrap().starts_with("2,Litang,Town,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_export_empty() {
        let catalog = catalog();
        let tracker = VisitTracker::new(catalog.clone());

        let csv = VisitReport::build(&catalog, &tracker).to_csv().unwrap();
        assert_eq!(csv.trim(), "id,name,type,distance,visited_at");
    }
}
