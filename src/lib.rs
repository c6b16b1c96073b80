// G318 Story Map - Core Library
// Exposes all modules for use in the TUI, API server, and tests

pub mod catalog;
pub mod route;
pub mod search;
pub mod tracker;
pub mod view;
pub mod report;

// Re-export commonly used types
pub use catalog::{Catalog, Coordinates, Poi, PoiId, PoiType};
pub use route::{GeoBounds, Route, RouteSegment, Waypoint};
pub use search::{filter_by_type, pois_in_bounds, search};
pub use tracker::{VisitRecord, VisitTracker};
pub use view::{
    poi_list, CarouselState, PoiDetail, PoiListItem, ProgressView, AUTO_ADVANCE, SUMMARY_LEN,
};
pub use report::{VisitReport, VisitedPoi};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
