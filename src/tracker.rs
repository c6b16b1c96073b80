// ✅ Visit Tracker - Visited set and completion progress
//
// Owned state, passed in explicitly; no page-wide singleton. The catalog is
// shared read-only, the visited set grows only through mark_visited and is
// cleared only by reset.

use crate::catalog::{Catalog, Poi, PoiId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// One successful mark_visited call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub poi_id: PoiId,
    pub visited_at: DateTime<Utc>,
}

/// Tracks which catalog POIs the user has seen.
pub struct VisitTracker {
    catalog: Arc<Catalog>,
    visited: HashSet<PoiId>,
    log: Vec<VisitRecord>,
}

impl VisitTracker {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        VisitTracker {
            catalog,
            visited: HashSet::new(),
            log: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mark a POI as visited.
    ///
    /// Returns `true` when the id was newly inserted. Unknown ids and
    /// already-visited ids are benign no-ops, not errors.
    pub fn mark_visited(&mut self, id: PoiId) -> bool {
        if !self.catalog.contains(id) {
            return false;
        }

        let inserted = self.visited.insert(id);
        if inserted {
            self.log.push(VisitRecord {
                poi_id: id,
                visited_at: Utc::now(),
            });
        }
        inserted
    }

    pub fn is_visited(&self, id: PoiId) -> bool {
        self.visited.contains(&id)
    }

    /// Completion percentage, rounded to the nearest integer.
    ///
    /// An empty catalog reports 0 rather than dividing by zero.
    pub fn progress(&self) -> u8 {
        let total = self.catalog.len();
        if total == 0 {
            return 0;
        }
        ((self.visited.len() as f64 / total as f64) * 100.0).round() as u8
    }

    /// Clear all visit state.
    pub fn reset(&mut self) {
        self.visited.clear();
        self.log.clear();
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Read-only snapshot of the visited set.
    pub fn visited(&self) -> &HashSet<PoiId> {
        &self.visited
    }

    /// Visited POIs in catalog order.
    pub fn visited_pois(&self) -> Vec<&Poi> {
        self.catalog
            .iter()
            .filter(|p| self.visited.contains(&p.id))
            .collect()
    }

    /// Visit records in the order the visits happened.
    pub fn visit_log(&self) -> &[VisitRecord] {
        &self.log
    }

    /// Timestamp of the visit to one POI, if any.
    pub fn visited_at(&self, id: PoiId) -> Option<DateTime<Utc>> {
        self.log.iter().find(|r| r.poi_id == id).map(|r| r.visited_at)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Coordinates, Poi, PoiType};

    fn mini_catalog(names: &[(PoiId, &str)]) -> Arc<Catalog> {
        let pois = names
            .iter()
            .map(|&(id, name)| Poi {
                id,
                name: name.to_string(),
                poi_type: PoiType::Town,
                distance: String::new(),
                description: String::new(),
                story: String::new(),
                coordinates: Coordinates::new(30.0, 100.0),
                images: vec![],
                tips: vec![],
            })
            .collect();
        Arc::new(Catalog::new(pois))
    }

    #[test]
    fn test_starts_empty() {
        let tracker = VisitTracker::new(mini_catalog(&[(1, "Potala Palace"), (2, "New Dukou")]));

        assert_eq!(tracker.visited_count(), 0);
        assert_eq!(tracker.progress(), 0);
        assert!(!tracker.is_visited(1));
        assert!(tracker.visit_log().is_empty());
    }

    #[test]
    fn test_mark_visited() {
        let mut tracker =
            VisitTracker::new(mini_catalog(&[(1, "Potala Palace"), (2, "New Dukou")]));

        assert!(tracker.mark_visited(2));
        assert!(tracker.is_visited(2));
        assert!(!tracker.is_visited(1));
        assert_eq!(tracker.progress(), 50);
        assert_eq!(tracker.visit_log().len(), 1);
        assert_eq!(tracker.visit_log()[0].poi_id, 2);
    }

    #[test]
    fn test_mark_visited_is_idempotent() {
        let mut tracker =
            VisitTracker::new(mini_catalog(&[(1, "Potala Palace"), (2, "New Dukou")]));

        assert!(tracker.mark_visited(2));
        assert!(!tracker.mark_visited(2));

        assert_eq!(tracker.visited_count(), 1);
        assert_eq!(tracker.visit_log().len(), 1);
        assert_eq!(tracker.progress(), 50);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut tracker =
            VisitTracker::new(mini_catalog(&[(1, "Potala Palace"), (2, "New Dukou")]));

        tracker.mark_visited(2);
        assert_eq!(tracker.progress(), 50);

        assert!(!tracker.mark_visited(99));
        assert_eq!(tracker.visited_count(), 1);
        assert_eq!(tracker.progress(), 50);
        assert!(!tracker.is_visited(99));
    }

    #[test]
    fn test_progress_bounds_and_monotonicity() {
        let mut tracker = VisitTracker::new(mini_catalog(&[(1, "a"), (2, "b"), (3, "c")]));

        let mut last = tracker.progress();
        for id in [1, 2, 99, 2, 3] {
            tracker.mark_visited(id);
            let p = tracker.progress();
            assert!(p <= 100);
            assert!(p >= last, "progress went backwards: {} -> {}", last, p);
            last = p;
        }
        assert_eq!(tracker.progress(), 100);
    }

    #[test]
    fn test_progress_rounding() {
        let mut tracker = VisitTracker::new(mini_catalog(&[(1, "a"), (2, "b"), (3, "c")]));

        tracker.mark_visited(1);
        // 1/3 rounds to 33
        assert_eq!(tracker.progress(), 33);

        tracker.mark_visited(2);
        // 2/3 rounds to 67
        assert_eq!(tracker.progress(), 67);
    }

    #[test]
    fn test_empty_catalog_progress_is_zero() {
        let tracker = VisitTracker::new(mini_catalog(&[]));
        assert_eq!(tracker.progress(), 0);
    }

    #[test]
    fn test_reset() {
        let mut tracker =
            VisitTracker::new(mini_catalog(&[(1, "Potala Palace"), (2, "New Dukou")]));

        tracker.mark_visited(1);
        tracker.mark_visited(2);
        assert_eq!(tracker.progress(), 100);

        tracker.reset();
        assert_eq!(tracker.progress(), 0);
        assert_eq!(tracker.visited_count(), 0);
        assert!(tracker.visit_log().is_empty());
        assert!(!tracker.is_visited(1));
    }

    #[test]
    fn test_visited_pois_in_catalog_order() {
        let mut tracker = VisitTracker::new(mini_catalog(&[(1, "a"), (2, "b"), (3, "c")]));

        // Visit out of catalog order
        tracker.mark_visited(3);
        tracker.mark_visited(1);

        let visited: Vec<PoiId> = tracker.visited_pois().iter().map(|p| p.id).collect();
        assert_eq!(visited, vec![1, 3]);

        // Log keeps visit order
        let log: Vec<PoiId> = tracker.visit_log().iter().map(|r| r.poi_id).collect();
        assert_eq!(log, vec![3, 1]);
    }

    #[test]
    fn test_visited_at() {
        let mut tracker = VisitTracker::new(mini_catalog(&[(1, "a"), (2, "b")]));

        assert!(tracker.visited_at(1).is_none());
        tracker.mark_visited(1);
        assert!(tracker.visited_at(1).is_some());
        assert!(tracker.visited_at(2).is_none());
    }
}
