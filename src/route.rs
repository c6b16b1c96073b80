// 🛣️ Route geometry - The G318 polyline and its colored segments
//
// Waypoints are route order, Shanghai first, Lhasa last. Segments reference
// waypoint indices and share their boundary waypoint with the next segment.

use crate::catalog::Coordinates;
use serde::{Deserialize, Serialize};

// ============================================================================
// WAYPOINT & SEGMENT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSegment {
    pub name: String,

    /// Hex color used when the segment is drawn
    pub color: String,

    /// Index of the first waypoint of this segment
    pub start: usize,

    /// Index of the last waypoint (inclusive, shared with the next segment)
    pub end: usize,
}

// ============================================================================
// GEO BOUNDS
// ============================================================================

/// Axis-aligned lat/lon bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Smallest box containing every coordinate. `None` on an empty input.
    pub fn from_coordinates<I>(coords: I) -> Option<GeoBounds>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;

        let mut bounds = GeoBounds {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        };

        for c in iter {
            bounds.min_lat = bounds.min_lat.min(c.lat);
            bounds.min_lon = bounds.min_lon.min(c.lon);
            bounds.max_lat = bounds.max_lat.max(c.lat);
            bounds.max_lon = bounds.max_lon.max(c.lon);
        }

        Some(bounds)
    }

    pub fn contains(&self, c: &Coordinates) -> bool {
        c.lat >= self.min_lat
            && c.lat <= self.max_lat
            && c.lon >= self.min_lon
            && c.lon <= self.max_lon
    }

    /// Box grown on every side by `ratio` of its span.
    pub fn pad(&self, ratio: f64) -> GeoBounds {
        let lat_margin = (self.max_lat - self.min_lat) * ratio;
        let lon_margin = (self.max_lon - self.min_lon) * ratio;

        GeoBounds {
            min_lat: self.min_lat - lat_margin,
            min_lon: self.min_lon - lon_margin,
            max_lat: self.max_lat + lat_margin,
            max_lon: self.max_lon + lon_margin,
        }
    }

    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

// ============================================================================
// ROUTE
// ============================================================================

/// The full highway polyline with its display segments.
pub struct Route {
    waypoints: Vec<Waypoint>,
    segments: Vec<RouteSegment>,
}

impl Route {
    /// The built-in G318 route, Shanghai to Lhasa, in three segments.
    pub fn g318() -> Self {
        let waypoints = g318_waypoints();

        let index_of = |name: &str| {
            waypoints
                .iter()
                .position(|w| w.name == name)
                .expect("built-in route waypoint")
        };

        let shanghai = index_of("Shanghai");
        let wuhan = index_of("Wuhan");
        let chengdu = index_of("Chengdu");
        let lhasa = index_of("Lhasa");

        let segments = vec![
            RouteSegment {
                name: "Shanghai - Wuhan".to_string(),
                color: "#4CAF50".to_string(),
                start: shanghai,
                end: wuhan,
            },
            RouteSegment {
                name: "Wuhan - Chengdu".to_string(),
                color: "#FF9800".to_string(),
                start: wuhan,
                end: chengdu,
            },
            RouteSegment {
                name: "Chengdu - Lhasa".to_string(),
                color: "#F44336".to_string(),
                start: chengdu,
                end: lhasa,
            },
        ];

        Route { waypoints, segments }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Waypoints of one segment, boundary points included.
    pub fn segment_waypoints(&self, segment: &RouteSegment) -> &[Waypoint] {
        let end = segment.end.min(self.waypoints.len().saturating_sub(1));
        if segment.start > end {
            return &[];
        }
        &self.waypoints[segment.start..=end]
    }

    /// Polyline length of one segment in kilometres.
    pub fn segment_length_km(&self, segment: &RouteSegment) -> f64 {
        polyline_length_km(self.segment_waypoints(segment))
    }

    /// Full polyline length in kilometres.
    pub fn total_length_km(&self) -> f64 {
        polyline_length_km(&self.waypoints)
    }

    /// Bounding box of the whole route.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_coordinates(self.waypoints.iter().map(|w| w.coordinates))
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::g318()
    }
}

fn polyline_length_km(waypoints: &[Waypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| pair[0].coordinates.distance_km(&pair[1].coordinates))
        .sum()
}

// ============================================================================
// BUILT-IN DATA
// ============================================================================

fn g318_waypoints() -> Vec<Waypoint> {
    let raw: [(&str, f64, f64); 29] = [
        ("Shanghai", 31.2304, 121.4737),
        ("Hefei", 31.8206, 117.2272),
        ("Chaohu", 31.6780, 117.8740),
        ("Anqing", 30.5433, 117.0425),
        ("Jiujiang", 29.7050, 116.0010),
        ("Wuhan", 30.5928, 114.3055),
        ("Jingzhou", 30.3349, 112.2410),
        ("Yichang", 30.6919, 111.2865),
        ("Enshi", 30.2720, 109.4880),
        ("Chongqing", 29.5630, 106.5516),
        ("Bishan", 29.5920, 106.2270),
        ("Dazu", 29.7010, 105.7070),
        ("Ziyang", 30.1280, 104.6270),
        ("Chengdu", 30.5728, 104.0668),
        ("Ya'an", 29.9870, 103.0010),
        ("Kangding", 29.9984, 101.9571),
        ("Xinduqiao", 30.0571, 101.9638),
        ("Litang", 29.9960, 100.2700),
        ("Batang", 30.0050, 99.1100),
        ("Markam", 29.6790, 98.5930),
        ("Zogang", 29.6710, 97.8410),
        ("Bangda", 30.5500, 97.1100),
        ("Baxoi", 30.0530, 96.9190),
        ("Ranwu", 29.4930, 96.7700),
        ("Bomi", 29.8590, 95.7680),
        ("Nyingchi", 29.6490, 94.3610),
        ("Gongbo'gyamda", 29.8850, 93.2460),
        ("Maizhokunggar", 29.8340, 91.7310),
        ("Lhasa", 29.6520, 91.1720),
    ];

    raw.iter()
        .map(|&(name, lat, lon)| Waypoint {
            name: name.to_string(),
            coordinates: Coordinates::new(lat, lon),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_g318_route_shape() {
        let route = Route::g318();

        assert_eq!(route.waypoints().len(), 29);
        assert_eq!(route.segments().len(), 3);

        assert_eq!(route.waypoints()[0].name, "Shanghai");
        assert_eq!(route.waypoints().last().unwrap().name, "Lhasa");
    }

    #[test]
    fn test_segments_share_boundary_waypoints() {
        let route = Route::g318();
        let segments = route.segments();

        assert_eq!(segments[0].start, 0);
        assert_eq!(segments[0].end, segments[1].start);
        assert_eq!(segments[1].end, segments[2].start);
        assert_eq!(segments[2].end, route.waypoints().len() - 1);

        // Boundary names
        assert_eq!(route.waypoints()[segments[1].start].name, "Wuhan");
        assert_eq!(route.waypoints()[segments[2].start].name, "Chengdu");
    }

    #[test]
    fn test_segment_waypoints_slicing() {
        let route = Route::g318();
        let first = &route.segments()[0];

        let points = route.segment_waypoints(first);
        assert_eq!(points.first().unwrap().name, "Shanghai");
        assert_eq!(points.last().unwrap().name, "Wuhan");
    }

    #[test]
    fn test_route_length() {
        let route = Route::g318();

        let total = route.total_length_km();
        // The polyline must be at least as long as the straight line
        // Shanghai-Lhasa (about 2,900 km) and well under a wild overestimate.
        assert!(total > 2900.0 && total < 6000.0, "got {}", total);

        let segment_sum: f64 = route
            .segments()
            .iter()
            .map(|s| route.segment_length_km(s))
            .sum();
        assert!((segment_sum - total).abs() < 1e-6);
    }

    #[test]
    fn test_bounds_contain_route() {
        let route = Route::g318();
        let bounds = route.bounds().unwrap();

        for w in route.waypoints() {
            assert!(bounds.contains(&w.coordinates), "{}", w.name);
        }

        // Somewhere far north is out
        assert!(!bounds.contains(&Coordinates::new(45.0, 100.0)));
    }

    #[test]
    fn test_bounds_pad() {
        let bounds = GeoBounds {
            min_lat: 29.0,
            min_lon: 91.0,
            max_lat: 31.0,
            max_lon: 121.0,
        };

        let padded = bounds.pad(0.1);
        assert!(padded.min_lat < bounds.min_lat);
        assert!(padded.min_lon < bounds.min_lon);
        assert!(padded.max_lat > bounds.max_lat);
        assert!(padded.max_lon > bounds.max_lon);

        // A point just outside the original box falls inside the padded one
        assert!(!bounds.contains(&Coordinates::new(31.1, 100.0)));
        assert!(padded.contains(&Coordinates::new(31.1, 100.0)));
    }

    #[test]
    fn test_bounds_empty_input() {
        assert!(GeoBounds::from_coordinates(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bounds_center() {
        let bounds = GeoBounds {
            min_lat: 29.0,
            min_lon: 91.0,
            max_lat: 31.0,
            max_lon: 121.0,
        };
        let center = bounds.center();
        assert!((center.lat - 30.0).abs() < 1e-9);
        assert!((center.lon - 106.0).abs() < 1e-9);
    }
}
