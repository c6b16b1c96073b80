// 🗺️ POI Catalog - Immutable points of interest along the G318
//
// The catalog is loaded once (built-in data or a JSON file) and never
// mutated afterwards. Lookup by id, iteration in route order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Stable POI identifier, unique across the catalog.
pub type PoiId = u32;

// ============================================================================
// COORDINATES
// ============================================================================

/// WGS84 latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinates { lat, lon }
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

// ============================================================================
// POI TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoiType {
    Bridge,
    Canyon,
    Town,
    Pass,
    Lake,
    Glacier,
    Forest,
    Peak,
    Palace,
}

impl PoiType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoiType::Bridge => "Bridge",
            PoiType::Canyon => "Canyon",
            PoiType::Town => "Town",
            PoiType::Pass => "Mountain Pass",
            PoiType::Lake => "Lake",
            PoiType::Glacier => "Glacier",
            PoiType::Forest => "Forest",
            PoiType::Peak => "Peak",
            PoiType::Palace => "Palace",
        }
    }
}

// ============================================================================
// POI RECORD
// ============================================================================

/// One point of interest along the route. Immutable once the catalog is
/// built; every field is display data except `id` and `coordinates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poi {
    /// Unique identifier, stable across catalog versions
    pub id: PoiId,

    /// Display name
    pub name: String,

    #[serde(rename = "type")]
    pub poi_type: PoiType,

    /// Display distance from the eastern terminus, e.g. "2,515 km from Shanghai"
    pub distance: String,

    pub description: String,

    /// The legend or history told at this stop
    pub story: String,

    pub coordinates: Coordinates,

    /// Image paths for the detail carousel (possibly empty)
    #[serde(default)]
    pub images: Vec<String>,

    /// Short traveller tips
    #[serde(default)]
    pub tips: Vec<String>,
}

// ============================================================================
// CATALOG
// ============================================================================

/// The full ordered collection of POIs for one deployment.
///
/// Order is route order (east to west) and is preserved by every query.
/// If the input data carries a duplicate id, lookup resolves to the first
/// occurrence.
pub struct Catalog {
    pois: Vec<Poi>,
    index: HashMap<PoiId, usize>,
}

impl Catalog {
    /// Build a catalog from an ordered POI list.
    pub fn new(pois: Vec<Poi>) -> Self {
        let mut index = HashMap::with_capacity(pois.len());
        for (i, poi) in pois.iter().enumerate() {
            index.entry(poi.id).or_insert(i);
        }
        Catalog { pois, index }
    }

    /// Catalog with the built-in G318 stops pre-loaded.
    pub fn with_defaults() -> Self {
        Catalog::new(default_pois())
    }

    /// Load a catalog from a JSON file (an array of POI records).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog file: {:?}", path.as_ref()))?;
        Catalog::from_json(&content)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let pois: Vec<Poi> = serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        Ok(Catalog::new(pois))
    }

    /// All POIs in catalog order.
    pub fn all(&self) -> &[Poi] {
        &self.pois
    }

    pub fn iter(&self) -> impl Iterator<Item = &Poi> {
        self.pois.iter()
    }

    /// Lookup by id. Unknown ids are "not found", never an error.
    pub fn get(&self, id: PoiId) -> Option<&Poi> {
        self.index.get(&id).map(|&i| &self.pois[i])
    }

    pub fn contains(&self, id: PoiId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// POIs of one type, in catalog order.
    pub fn by_type(&self, poi_type: PoiType) -> Vec<&Poi> {
        self.pois.iter().filter(|p| p.poi_type == poi_type).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// BUILT-IN DATA
// ============================================================================

/// The built-in stops, Shanghai side first, Lhasa last.
fn default_pois() -> Vec<Poi> {
    vec![
        Poi {
            id: 1,
            name: "Wuhan Yangtze River Bridge".to_string(),
            poi_type: PoiType::Bridge,
            distance: "839 km from Shanghai".to_string(),
            description: "The first bridge ever built across the Yangtze, carrying a \
                          double-deck road and railway between Wuchang and Hanyang."
                .to_string(),
            story: "Completed in 1957, it was celebrated as the first bridge over the \
                    ten-thousand-li Yangtze and turned three river towns into one city."
                .to_string(),
            coordinates: Coordinates::new(30.5490, 114.2881),
            images: vec![
                "assets/images/wuhan-bridge-1.jpg".to_string(),
                "assets/images/wuhan-bridge-2.jpg".to_string(),
            ],
            tips: vec![
                "Walk the upper deck at sunset for views of the Yellow Crane Tower".to_string(),
                "The riverside park below is a popular evening promenade".to_string(),
            ],
        },
        Poi {
            id: 2,
            name: "Enshi Grand Canyon".to_string(),
            poi_type: PoiType::Canyon,
            distance: "1,385 km from Shanghai".to_string(),
            description: "A karst canyon of sheer cliffs above the Qing River, crowned by \
                          a single free-standing rock pillar."
                .to_string(),
            story: "Local lore calls the slender Incense Burner Pillar an offering platform \
                    the mountain god left for the heavens; it has survived every recorded \
                    earthquake."
                .to_string(),
            coordinates: Coordinates::new(30.5330, 109.1190),
            images: vec![
                "assets/images/enshi-canyon-1.jpg".to_string(),
                "assets/images/enshi-canyon-2.jpg".to_string(),
            ],
            tips: vec![
                "Allow a full day for the cliff walkway loop".to_string(),
                "The cable car saves two hours of climbing".to_string(),
            ],
        },
        Poi {
            id: 3,
            name: "Ya'an".to_string(),
            poi_type: PoiType::Town,
            distance: "2,280 km from Shanghai".to_string(),
            description: "The rainy gateway city where the Sichuan basin meets the Tibetan \
                          plateau, known for misty skies and flagstone tea roads."
                .to_string(),
            story: "Ya'an was the first staging post of the ancient Tea-Horse Road; porters \
                    carried brick-tea loads heavier than themselves into the mountains to \
                    trade for Tibetan horses."
                .to_string(),
            coordinates: Coordinates::new(29.9870, 103.0010),
            images: vec!["assets/images/yaan-1.jpg".to_string()],
            tips: vec![
                "Try sweet-rain tea in an old-town teahouse".to_string(),
                "Last reliable fuel and repairs before the high passes".to_string(),
            ],
        },
        Poi {
            id: 4,
            name: "Luding Bridge".to_string(),
            poi_type: PoiType::Bridge,
            distance: "2,395 km from Shanghai".to_string(),
            description: "An iron-chain suspension bridge over the Dadu River, first hung \
                          in 1706 under the Kangxi Emperor."
                .to_string(),
            story: "In May 1935 the Red Army crossed here under fire on bare chains after \
                    the planking had been stripped, one of the most retold episodes of the \
                    Long March."
                .to_string(),
            coordinates: Coordinates::new(29.9140, 102.2340),
            images: vec![
                "assets/images/luding-bridge-1.jpg".to_string(),
                "assets/images/luding-bridge-2.jpg".to_string(),
            ],
            tips: vec![
                "The chains sway; hold the rail".to_string(),
                "Visit early morning before the tour groups".to_string(),
            ],
        },
        Poi {
            id: 5,
            name: "Kangding".to_string(),
            poi_type: PoiType::Town,
            distance: "2,445 km from Shanghai".to_string(),
            description: "A river-gorge town at 2,560 m where Han and Tibetan trade routes \
                          met, wedged between snow peaks."
                .to_string(),
            story: "The Kangding Love Song, hummed all over China, was born here; the Paoma \
                    hill it names rises directly above the rooftops."
                .to_string(),
            coordinates: Coordinates::new(29.9984, 101.9571),
            images: vec!["assets/images/kangding-1.jpg".to_string()],
            tips: vec![
                "Acclimatize here for a night before the 4,000 m passes".to_string(),
                "Evening dancing on the Zheduo River square is open to everyone".to_string(),
            ],
        },
        Poi {
            id: 6,
            name: "Zheduo Mountain Pass".to_string(),
            poi_type: PoiType::Pass,
            distance: "2,475 km from Shanghai".to_string(),
            description: "The 4,298 m first pass of the Sichuan-Tibet line, the divide \
                          between basin drizzle and plateau sunshine."
                .to_string(),
            story: "Drivers call Zheduo 'the fold' for its stacked switchbacks; the prayer \
                    flags at the summit mark the old boundary of Kham."
                .to_string(),
            coordinates: Coordinates::new(30.0830, 101.8060),
            images: vec!["assets/images/zheduo-pass-1.jpg".to_string()],
            tips: vec![
                "Altitude rises fast; keep warm clothing in the cab".to_string(),
                "The summit viewpoint is ten minutes' walk from the road".to_string(),
            ],
        },
        Poi {
            id: 7,
            name: "Xinduqiao".to_string(),
            poi_type: PoiType::Town,
            distance: "2,515 km from Shanghai".to_string(),
            description: "A poplar-lined valley of Tibetan farmhouses called the \
                          photographer's paradise for its slanting morning light."
                .to_string(),
            story: "Once the Dukou ferry crossing on the trade road, the new bridge that \
                    replaced the ferry gave the town its name."
                .to_string(),
            coordinates: Coordinates::new(30.0571, 101.9638),
            images: vec![
                "assets/images/xinduqiao-1.jpg".to_string(),
                "assets/images/xinduqiao-2.jpg".to_string(),
                "assets/images/xinduqiao-3.jpg".to_string(),
            ],
            tips: vec![
                "Golden light is best in October".to_string(),
                "Homestays fill up during holidays; book ahead".to_string(),
            ],
        },
        Poi {
            id: 8,
            name: "Litang".to_string(),
            poi_type: PoiType::Town,
            distance: "2,790 km from Shanghai".to_string(),
            description: "One of the highest towns in the world at 4,014 m, ringed by \
                          grassland and the white walls of Lithang Monastery."
                .to_string(),
            story: "Litang counts the seventh Dalai Lama among its sons, and its August \
                    horse festival once drew riders from every corner of Kham."
                .to_string(),
            coordinates: Coordinates::new(29.9960, 100.2700),
            images: vec!["assets/images/litang-1.jpg".to_string()],
            tips: vec![
                "Sleep low if you feel the altitude; the town sits above 4,000 m".to_string(),
                "Yak yogurt at the market is worth the stop".to_string(),
            ],
        },
        Poi {
            id: 9,
            name: "Seventy-Two Turns of the Nujiang".to_string(),
            poi_type: PoiType::Pass,
            distance: "3,630 km from Shanghai".to_string(),
            description: "A wall of stacked hairpins dropping nearly a vertical kilometre \
                          from the Yela pass toward the Nujiang gorge."
                .to_string(),
            story: "Truckers count the bends out loud as a ritual; a driver who loses \
                    count is said to owe the road a cup of buttered tea before going on."
                .to_string(),
            coordinates: Coordinates::new(30.0930, 97.2600),
            images: vec![
                "assets/images/nujiang-72-turns-1.jpg".to_string(),
                "assets/images/nujiang-72-turns-2.jpg".to_string(),
            ],
            tips: vec![
                "Check your brakes at the top".to_string(),
                "The viewing platform frames the whole wall of switchbacks".to_string(),
            ],
        },
        Poi {
            id: 10,
            name: "Ranwu Lake".to_string(),
            poi_type: PoiType::Lake,
            distance: "3,890 km from Shanghai".to_string(),
            description: "A glacier-fed lake whose still mornings mirror the Gangrigabu \
                          snow range."
                .to_string(),
            story: "Herders say the lake is a mirror dropped by a goddess fleeing across \
                    the mountains; in autumn the larches burn gold around the shore."
                .to_string(),
            coordinates: Coordinates::new(29.4930, 96.7700),
            images: vec![
                "assets/images/ranwu-lake-1.jpg".to_string(),
                "assets/images/ranwu-lake-2.jpg".to_string(),
            ],
            tips: vec![
                "Mirror reflections are best before 9 am".to_string(),
                "The lakeside road can flood in the summer melt".to_string(),
            ],
        },
        Poi {
            id: 11,
            name: "Midui Glacier".to_string(),
            poi_type: PoiType::Glacier,
            distance: "3,960 km from Shanghai".to_string(),
            description: "A low-altitude monsoon glacier tumbling from 6,800 m down to \
                          village fields and forest."
                .to_string(),
            story: "The glacier's tongue once reached within sight of the prayer wheels of \
                    Midui village; elders still mark its retreat by the boulders it left \
                    behind."
                .to_string(),
            coordinates: Coordinates::new(29.4630, 96.5050),
            images: vec!["assets/images/midui-glacier-1.jpg".to_string()],
            tips: vec![
                "The walk from the gate takes about an hour each way".to_string(),
                "Horses can be hired at the village".to_string(),
            ],
        },
        Poi {
            id: 12,
            name: "Lulang Forest".to_string(),
            poi_type: PoiType::Forest,
            distance: "4,120 km from Shanghai".to_string(),
            description: "A high valley of spruce and meadow below the Sejila pass, famous \
                          for pots of stone-cooked chicken."
                .to_string(),
            story: "Lulang means dragon-king valley; caravans rested here before the climb \
                    to Sejila hoping to glimpse Namcha Barwa at dawn."
                .to_string(),
            coordinates: Coordinates::new(29.7650, 94.7370),
            images: vec!["assets/images/lulang-forest-1.jpg".to_string()],
            tips: vec![
                "Try stone-pot chicken in the village".to_string(),
                "The Sejila pass viewpoint is half an hour up the road".to_string(),
            ],
        },
        Poi {
            id: 13,
            name: "Namcha Barwa".to_string(),
            poi_type: PoiType::Peak,
            distance: "4,160 km from Shanghai".to_string(),
            description: "The 7,782 m spear thrust into the sky, highest peak of the \
                          eastern Himalaya and rarely free of cloud."
                .to_string(),
            story: "Locals say the mountain hides itself from the unready; a clear summit \
                    on a first visit is counted a blessing for the whole journey."
                .to_string(),
            coordinates: Coordinates::new(29.6250, 95.0550),
            images: vec![
                "assets/images/namcha-barwa-1.jpg".to_string(),
                "assets/images/namcha-barwa-2.jpg".to_string(),
            ],
            tips: vec![
                "Best chance of a clear summit is October to December".to_string(),
                "Viewpoints line the Yarlung Tsangpo canyon road".to_string(),
            ],
        },
        Poi {
            id: 14,
            name: "Potala Palace".to_string(),
            poi_type: PoiType::Palace,
            distance: "4,550 km from Shanghai".to_string(),
            description: "The thousand-room winter palace of the Dalai Lamas rising \
                          thirteen storeys above Lhasa, terminus of the G318 journey."
                .to_string(),
            story: "Begun by Songtsen Gampo in the 7th century and rebuilt by the Great \
                    Fifth, the palace is said to stand on the shoulder of a bodhisattva's \
                    mountain."
                .to_string(),
            coordinates: Coordinates::new(29.6554, 91.1170),
            images: vec![
                "assets/images/potala-palace-1.jpg".to_string(),
                "assets/images/potala-palace-2.jpg".to_string(),
                "assets/images/potala-palace-3.jpg".to_string(),
            ],
            tips: vec![
                "Daily visitor numbers are capped; reserve tickets a day ahead".to_string(),
                "Climb slowly; Lhasa sits at 3,650 m".to_string(),
            ],
        },
    ]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mini_poi(id: PoiId, name: &str) -> Poi {
        Poi {
            id,
            name: name.to_string(),
            poi_type: PoiType::Town,
            distance: String::new(),
            description: String::new(),
            story: String::new(),
            coordinates: Coordinates::new(30.0, 100.0),
            images: vec![],
            tips: vec![],
        }
    }

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::with_defaults();

        assert_eq!(catalog.len(), 14);
        assert!(!catalog.is_empty());

        // Ids are unique
        let mut seen = std::collections::HashSet::new();
        for poi in catalog.iter() {
            assert!(seen.insert(poi.id), "duplicate id {}", poi.id);
        }

        // Route order: first stop is the easternmost, last is Lhasa
        assert_eq!(catalog.all()[0].name, "Wuhan Yangtze River Bridge");
        assert_eq!(catalog.all()[13].name, "Potala Palace");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::with_defaults();

        let potala = catalog.get(14).unwrap();
        assert_eq!(potala.name, "Potala Palace");
        assert_eq!(potala.poi_type, PoiType::Palace);
        assert!(catalog.contains(14));

        // Unknown id is "not found", not an error
        assert!(catalog.get(999).is_none());
        assert!(!catalog.contains(999));
    }

    #[test]
    fn test_duplicate_id_resolves_to_first() {
        let catalog = Catalog::new(vec![
            mini_poi(1, "First"),
            mini_poi(2, "Second"),
            mini_poi(1, "Shadowed"),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).unwrap().name, "First");
    }

    #[test]
    fn test_by_type() {
        let catalog = Catalog::with_defaults();

        let bridges = catalog.by_type(PoiType::Bridge);
        assert_eq!(bridges.len(), 2);
        assert_eq!(bridges[0].name, "Wuhan Yangtze River Bridge");
        assert_eq!(bridges[1].name, "Luding Bridge");

        assert_eq!(catalog.by_type(PoiType::Palace).len(), 1);
    }

    #[test]
    fn test_coordinates_plausible() {
        let catalog = Catalog::with_defaults();

        for poi in catalog.iter() {
            assert!(poi.coordinates.lat > 29.0 && poi.coordinates.lat < 32.0, "{}", poi.name);
            assert!(poi.coordinates.lon > 90.0 && poi.coordinates.lon < 122.0, "{}", poi.name);
        }
    }

    #[test]
    fn test_haversine_distance() {
        let shanghai = Coordinates::new(31.2304, 121.4737);
        let lhasa = Coordinates::new(29.6520, 91.1720);

        let d = shanghai.distance_km(&lhasa);
        assert!(d > 2800.0 && d < 3050.0, "got {}", d);

        // Symmetric, zero on itself
        assert!((d - lhasa.distance_km(&shanghai)).abs() < 1e-9);
        assert!(shanghai.distance_km(&shanghai).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {
                "id": 1,
                "name": "Potala Palace",
                "type": "Palace",
                "distance": "4,550 km from Shanghai",
                "description": "Winter palace above Lhasa",
                "story": "Rebuilt by the Great Fifth",
                "coordinates": { "lat": 29.6554, "lon": 91.1170 }
            }
        ]"#;

        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let poi = catalog.get(1).unwrap();
        assert_eq!(poi.name, "Potala Palace");
        assert_eq!(poi.poi_type, PoiType::Palace);
        // Optional sequences default to empty
        assert!(poi.images.is_empty());
        assert!(poi.tips.is_empty());
    }

    #[test]
    fn test_catalog_from_json_rejects_garbage() {
        assert!(Catalog::from_json("not json").is_err());
        assert!(Catalog::from_json("{\"id\": 1}").is_err());
    }
}
