// 🔍 POI search - Case-insensitive substring filtering over the catalog
//
// A stable filter: results keep catalog order, nothing is re-ranked. An
// empty or whitespace-only keyword means "show everything".

use crate::catalog::{Catalog, Poi, PoiType};
use crate::route::GeoBounds;

/// Find POIs whose name, type label, or description contains the keyword,
/// ignoring case. Returns the full catalog for a blank keyword and an empty
/// vec when nothing matches.
pub fn search<'a>(catalog: &'a Catalog, keyword: &str) -> Vec<&'a Poi> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return catalog.iter().collect();
    }

    let needle = keyword.to_lowercase();
    catalog.iter().filter(|poi| matches_keyword(poi, &needle)).collect()
}

/// Substring test against the fields the POI list renders.
/// `needle` must already be lowercased.
fn matches_keyword(poi: &Poi, needle: &str) -> bool {
    poi.name.to_lowercase().contains(needle)
        || poi.poi_type.as_str().to_lowercase().contains(needle)
        || poi.description.to_lowercase().contains(needle)
}

/// POIs of one type, in catalog order.
pub fn filter_by_type(catalog: &Catalog, poi_type: PoiType) -> Vec<&Poi> {
    catalog.by_type(poi_type)
}

/// POIs whose coordinates fall inside the bounds, in catalog order.
pub fn pois_in_bounds<'a>(catalog: &'a Catalog, bounds: &GeoBounds) -> Vec<&'a Poi> {
    catalog
        .iter()
        .filter(|poi| bounds.contains(&poi.coordinates))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
