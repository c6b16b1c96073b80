// 🖼️ View models - Pure data-to-view transforms
//
// Everything a frontend renders is derived here from catalog and tracker
// state. No widget, terminal, or HTTP type appears in this module.

use crate::catalog::{Poi, PoiId};
use crate::tracker::VisitTracker;
use std::time::Duration;

/// Characters of description shown in a list row.
pub const SUMMARY_LEN: usize = 50;

/// How long the detail carousel lingers on one image.
pub const AUTO_ADVANCE: Duration = Duration::from_secs(4);

// ============================================================================
// LIST
// ============================================================================

/// One sidebar row.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiListItem {
    pub id: PoiId,
    pub name: String,
    pub summary: String,
    pub type_label: &'static str,
    pub distance: String,
    pub visited: bool,
    pub active: bool,
}

impl PoiListItem {
    pub fn from_poi(poi: &Poi, visited: bool, active: bool) -> Self {
        PoiListItem {
            id: poi.id,
            name: poi.name.clone(),
            summary: truncate(&poi.description, SUMMARY_LEN),
            type_label: poi.poi_type.as_str(),
            distance: poi.distance.clone(),
            visited,
            active,
        }
    }
}

/// Sidebar rows for a (possibly filtered) POI slice, in the given order.
pub fn poi_list(pois: &[&Poi], tracker: &VisitTracker, active: Option<PoiId>) -> Vec<PoiListItem> {
    pois.iter()
        .map(|poi| PoiListItem::from_poi(poi, tracker.is_visited(poi.id), active == Some(poi.id)))
        .collect()
}

// ============================================================================
// DETAIL
// ============================================================================

/// The detail panel content for one POI.
#[derive(Debug, Clone)]
pub struct PoiDetail {
    pub id: PoiId,
    pub title: String,
    pub type_label: &'static str,
    pub distance: String,
    pub description: String,
    pub story: String,
    pub tips: Vec<String>,
    pub images: Vec<String>,
    pub carousel: CarouselState,
}

impl PoiDetail {
    pub fn from_poi(poi: &Poi) -> Self {
        PoiDetail {
            id: poi.id,
            title: poi.name.clone(),
            type_label: poi.poi_type.as_str(),
            distance: poi.distance.clone(),
            description: poi.description.clone(),
            story: poi.story.clone(),
            tips: poi.tips.clone(),
            images: poi.images.clone(),
            carousel: CarouselState::new(poi.images.len()),
        }
    }

    /// Path of the image the carousel currently shows.
    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.carousel.index()).map(|s| s.as_str())
    }
}

// ============================================================================
// CAROUSEL
// ============================================================================

/// Position of the image carousel. Navigation wraps around; an empty
/// carousel ignores every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    index: usize,
    count: usize,
}

impl CarouselState {
    pub fn new(count: usize) -> Self {
        CarouselState { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    pub fn prev(&mut self) {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
    }

    /// Jump to an image. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.count {
            self.index = index;
        }
    }

    /// One flag per nav dot, true for the current image.
    pub fn dots(&self) -> Vec<bool> {
        (0..self.count).map(|i| i == self.index).collect()
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// The progress bar content.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub percent: u8,
    pub visited: usize,
    pub total: usize,
    pub label: String,
}

impl ProgressView {
    pub fn from_tracker(tracker: &VisitTracker) -> Self {
        let percent = tracker.progress();
        ProgressView {
            percent,
            visited: tracker.visited_count(),
            total: tracker.catalog().len(),
            label: format!("{}% complete", percent),
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Truncate to `max_chars` characters with a `...` suffix.
/// Counts chars, not bytes, so multi-byte names never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Coordinates, PoiType};
    use std::sync::Arc;

    fn sample_poi(id: PoiId, name: &str, description: &str, images: usize) -> Poi {
        Poi {
            id,
            name: name.to_string(),
            poi_type: PoiType::Lake,
            distance: "3,890 km from Shanghai".to_string(),
            description: description.to_string(),
            story: "An old story.".to_string(),
            coordinates: Coordinates::new(29.49, 96.77),
            images: (0..images).map(|i| format!("assets/img-{}.jpg", i)).collect(),
            tips: vec!["Go early".to_string()],
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");

        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 53);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        // 3-byte chars; byte slicing at 4 would panic
        let s = "新都桥镇";
        assert_eq!(truncate(s, 2), "新都...");
        assert_eq!(truncate(s, 4), "新都桥镇");
    }

    #[test]
    fn test_list_item_summary_truncation() {
        let description = "d".repeat(80);
        let poi = sample_poi(1, "Ranwu Lake", &description, 0);

        let item = PoiListItem::from_poi(&poi, false, false);
        assert_eq!(item.summary.chars().count(), SUMMARY_LEN + 3);
        assert!(item.summary.ends_with("..."));
        assert_eq!(item.type_label, "Lake");
    }

    #[test]
    fn test_poi_list_flags() {
        let catalog = Arc::new(Catalog::new(vec![
            sample_poi(1, "a", "", 0),
            sample_poi(2, "b", "", 0),
        ]));
        let mut tracker = VisitTracker::new(catalog.clone());
        tracker.mark_visited(2);

        let pois: Vec<&Poi> = catalog.iter().collect();
        let items = poi_list(&pois, &tracker, Some(1));

        assert!(!items[0].visited);
        assert!(items[0].active);
        assert!(items[1].visited);
        assert!(!items[1].active);
    }

    #[test]
    fn test_detail_from_poi() {
        let poi = sample_poi(3, "Ranwu Lake", "A mirror lake.", 2);
        let detail = PoiDetail::from_poi(&poi);

        assert_eq!(detail.title, "Ranwu Lake");
        assert_eq!(detail.carousel.count(), 2);
        assert_eq!(detail.current_image(), Some("assets/img-0.jpg"));
        assert_eq!(detail.tips.len(), 1);
    }

    #[test]
    fn test_detail_without_images() {
        let poi = sample_poi(3, "Ranwu Lake", "", 0);
        let detail = PoiDetail::from_poi(&poi);

        assert!(detail.carousel.is_empty());
        assert!(detail.current_image().is_none());
    }

    #[test]
    fn test_carousel_wraps_forward_and_back() {
        let mut carousel = CarouselState::new(3);
        assert_eq!(carousel.index(), 0);

        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        assert_eq!(carousel.index(), 0);

        carousel.prev();
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_carousel_select() {
        let mut carousel = CarouselState::new(3);

        carousel.select(2);
        assert_eq!(carousel.index(), 2);

        // Out of range is ignored
        carousel.select(7);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_carousel_empty_ignores_everything() {
        let mut carousel = CarouselState::new(0);
        carousel.next();
        carousel.prev();
        carousel.select(0);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.dots().is_empty());
    }

    #[test]
    fn test_carousel_dots() {
        let mut carousel = CarouselState::new(3);
        carousel.next();
        assert_eq!(carousel.dots(), vec![false, true, false]);
    }

    #[test]
    fn test_progress_view() {
        let catalog = Arc::new(Catalog::new(vec![
            sample_poi(1, "a", "", 0),
            sample_poi(2, "b", "", 0),
        ]));
        let mut tracker = VisitTracker::new(catalog);

        tracker.mark_visited(1);
        let view = ProgressView::from_tracker(&tracker);

        assert_eq!(view.percent, 50);
        assert_eq!(view.visited, 1);
        assert_eq!(view.total, 2);
        assert_eq!(view.label, "50% complete");
    }
}
