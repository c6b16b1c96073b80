// G318 Story Map - Web Server
// JSON API over the catalog, search, route, and visit tracking

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use g318_story_map::{
    search, Catalog, Poi, PoiId, ProgressView, Route, VisitRecord, VisitReport, VisitTracker,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    catalog: Arc<Catalog>,
    tracker: Arc<Mutex<VisitTracker>>,
    route: Arc<Route>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl<T: Default> ApiResponse<T> {
    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: T::default(),
            error: Some(message.into()),
        }
    }
}

/// POI summary (list payload)
#[derive(Serialize)]
struct PoiSummaryResponse {
    id: PoiId,
    name: String,
    #[serde(rename = "type")]
    poi_type: &'static str,
    distance: String,
    lat: f64,
    lon: f64,
    visited: bool,
}

impl PoiSummaryResponse {
    fn from_poi(poi: &Poi, visited: bool) -> Self {
        Self {
            id: poi.id,
            name: poi.name.clone(),
            poi_type: poi.poi_type.as_str(),
            distance: poi.distance.clone(),
            lat: poi.coordinates.lat,
            lon: poi.coordinates.lon,
            visited,
        }
    }
}

/// Full POI detail (modal payload)
#[derive(Serialize, Default)]
struct PoiDetailResponse {
    id: PoiId,
    name: String,
    #[serde(rename = "type")]
    poi_type: String,
    distance: String,
    description: String,
    story: String,
    lat: f64,
    lon: f64,
    images: Vec<String>,
    tips: Vec<String>,
    visited: bool,
}

impl PoiDetailResponse {
    fn from_poi(poi: &Poi, visited: bool) -> Self {
        Self {
            id: poi.id,
            name: poi.name.clone(),
            poi_type: poi.poi_type.as_str().to_string(),
            distance: poi.distance.clone(),
            description: poi.description.clone(),
            story: poi.story.clone(),
            lat: poi.coordinates.lat,
            lon: poi.coordinates.lon,
            images: poi.images.clone(),
            tips: poi.tips.clone(),
            visited,
        }
    }
}

/// Stats response
#[derive(Serialize)]
struct StatsResponse {
    total_pois: usize,
    visited_count: usize,
    progress: u8,
    progress_label: String,
    by_type: Vec<TypeStat>,
}

#[derive(Serialize)]
struct TypeStat {
    #[serde(rename = "type")]
    poi_type: String,
    count: usize,
    visited: usize,
}

#[derive(Serialize)]
struct SegmentResponse {
    name: String,
    color: String,
    waypoints: usize,
    length_km: f64,
}

#[derive(Serialize)]
struct RouteResponse {
    total_length_km: f64,
    segments: Vec<SegmentResponse>,
    waypoints: Vec<g318_story_map::Waypoint>,
}

#[derive(Serialize)]
struct VisitActionResponse {
    id: PoiId,
    newly_visited: bool,
    progress: u8,
}

#[derive(Serialize)]
struct VisitsResponse {
    visited: Vec<PoiId>,
    log: Vec<VisitRecord>,
    progress: u8,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/pois - All POIs in catalog order
async fn get_pois(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().unwrap();

    let response: Vec<PoiSummaryResponse> = state
        .catalog
        .iter()
        .map(|poi| PoiSummaryResponse::from_poi(poi, tracker.is_visited(poi.id)))
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/pois/:id - One POI with full detail
async fn get_poi(State(state): State<AppState>, Path(id): Path<PoiId>) -> impl IntoResponse {
    let tracker = state.tracker.lock().unwrap();

    match state.catalog.get(id) {
        Some(poi) => {
            let detail = PoiDetailResponse::from_poi(poi, tracker.is_visited(poi.id));
            (StatusCode::OK, Json(ApiResponse::ok(Some(detail)))).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Option<PoiDetailResponse>>::err(format!(
                "POI not found: {}",
                id
            ))),
        )
            .into_response(),
    }
}

/// GET /api/search/:keyword - Filter POIs by keyword
async fn search_pois(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    // Decode URL-encoded keyword
    let decoded = urlencoding::decode(&keyword)
        .unwrap_or_else(|_| keyword.clone().into())
        .into_owned();

    let tracker = state.tracker.lock().unwrap();

    let response: Vec<PoiSummaryResponse> = search(&state.catalog, &decoded)
        .into_iter()
        .map(|poi| PoiSummaryResponse::from_poi(poi, tracker.is_visited(poi.id)))
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/stats - Visit statistics by POI type
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().unwrap();

    let mut type_stats: HashMap<&'static str, (usize, usize)> = HashMap::new();
    for poi in state.catalog.iter() {
        let entry = type_stats.entry(poi.poi_type.as_str()).or_insert((0, 0));
        entry.0 += 1;
        if tracker.is_visited(poi.id) {
            entry.1 += 1;
        }
    }

    let mut by_type: Vec<TypeStat> = type_stats
        .into_iter()
        .map(|(poi_type, (count, visited))| TypeStat {
            poi_type: poi_type.to_string(),
            count,
            visited,
        })
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count).then(a.poi_type.cmp(&b.poi_type)));

    let progress = ProgressView::from_tracker(&tracker);
    let stats = StatsResponse {
        total_pois: progress.total,
        visited_count: progress.visited,
        progress: progress.percent,
        progress_label: progress.label,
        by_type,
    };

    (StatusCode::OK, Json(ApiResponse::ok(stats))).into_response()
}

/// GET /api/route - Route polyline and segments
async fn get_route(State(state): State<AppState>) -> impl IntoResponse {
    let segments: Vec<SegmentResponse> = state
        .route
        .segments()
        .iter()
        .map(|segment| SegmentResponse {
            name: segment.name.clone(),
            color: segment.color.clone(),
            waypoints: state.route.segment_waypoints(segment).len(),
            length_km: state.route.segment_length_km(segment),
        })
        .collect();

    let response = RouteResponse {
        total_length_km: state.route.total_length_km(),
        segments,
        waypoints: state.route.waypoints().to_vec(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/visits - Visited ids and visit log
async fn get_visits(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().unwrap();

    let response = VisitsResponse {
        visited: tracker.visited_pois().iter().map(|p| p.id).collect(),
        log: tracker.visit_log().to_vec(),
        progress: tracker.progress(),
    };

    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// POST /api/visits/:id - Mark a POI as visited
async fn mark_visited(State(state): State<AppState>, Path(id): Path<PoiId>) -> impl IntoResponse {
    let mut tracker = state.tracker.lock().unwrap();

    let newly_visited = tracker.mark_visited(id);
    let response = VisitActionResponse {
        id,
        newly_visited,
        progress: tracker.progress(),
    };

    // Unknown ids are a benign no-op, mirrored to the client as newly_visited=false
    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// DELETE /api/visits - Reset all visit state
async fn reset_visits(State(state): State<AppState>) -> impl IntoResponse {
    let mut tracker = state.tracker.lock().unwrap();
    tracker.reset();

    (
        StatusCode::OK,
        Json(ApiResponse::ok(VisitsResponse {
            visited: vec![],
            log: vec![],
            progress: 0,
        })),
    )
        .into_response()
}

/// GET /api/report - Exportable visit report
async fn get_report(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker.lock().unwrap();
    let report = VisitReport::build(&state.catalog, &tracker);

    (StatusCode::OK, Json(ApiResponse::ok(report))).into_response()
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 G318 Story Map - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Load catalog and route
    let catalog = Arc::new(Catalog::with_defaults());
    let route = Arc::new(Route::g318());
    println!("✓ Loaded {} points of interest", catalog.len());
    println!("✓ Route: {:.0} km in {} segments", route.total_length_km(), route.segments().len());

    // Create shared state
    let state = AppState {
        tracker: Arc::new(Mutex::new(VisitTracker::new(catalog.clone()))),
        catalog,
        route,
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/pois", get(get_pois))
        .route("/pois/:id", get(get_poi))
        .route("/search/:keyword", get(search_pois))
        .route("/stats", get(get_stats))
        .route("/route", get(get_route))
        .route("/visits", get(get_visits).delete(reset_visits))
        .route("/visits/:id", post(mark_visited))
        .route("/report", get(get_report))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/pois");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
