use serde::Serialize;
use serde_json::{json, Value};

use super::geometry::{BoundingBox, LngLat, RouteGeometry};
use super::{parse_route, RouteError, RouteFormat, RouteSource};
use crate::constants::{
    ACCENT_COLOR, PLACEHOLDER_ICON, ROUTE_FIT_PADDING, ROUTE_LINE_WIDTH, START_MARKER_COLOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Start,
    Finish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: LngLat,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub width: u32,
}

/// Everything the map needs: one line layer, a camera fit, two markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    pub name: String,
    /// GeoJSON `Feature` with a single `LineString` geometry.
    pub line: Value,
    pub line_style: LineStyle,
    pub bounds: BoundingBox,
    pub padding: u32,
    pub start: Marker,
    pub finish: Marker,
}

impl RouteMap {
    pub fn new(name: &str, geometry: &RouteGeometry) -> Self {
        RouteMap {
            name: name.to_string(),
            line: json!({
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "LineString",
                    "coordinates": geometry.coordinates(),
                }
            }),
            line_style: LineStyle {
                color: ACCENT_COLOR,
                width: ROUTE_LINE_WIDTH,
            },
            bounds: geometry.bounding_box(),
            padding: ROUTE_FIT_PADDING,
            start: Marker {
                kind: MarkerKind::Start,
                position: geometry.start(),
                color: START_MARKER_COLOR,
            },
            finish: Marker {
                kind: MarkerKind::Finish,
                position: geometry.finish(),
                color: ACCENT_COLOR,
            },
        }
    }
}

/// Static stand-in shown instead of a map when a route cannot be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlaceholder {
    pub icon: &'static str,
    pub name: String,
    pub error: String,
    pub code: &'static str,
}

impl RoutePlaceholder {
    pub fn new(name: &str, error: &RouteError) -> Self {
        RoutePlaceholder {
            icon: PLACEHOLDER_ICON,
            name: name.to_string(),
            error: error.to_string(),
            code: error.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RouteView {
    Map(RouteMap),
    Placeholder(RoutePlaceholder),
}

/// Label for a route when the caller did not supply one: the file name.
pub fn display_name(route_url: &str) -> String {
    let path = route_url.split(['?', '#']).next().unwrap_or(route_url);
    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(route_url)
        .to_string()
}

async fn load_route(source: &dyn RouteSource, route_url: &str) -> Result<RouteGeometry, RouteError> {
    let bytes = source.fetch(route_url).await?;
    parse_route(RouteFormat::from_url(route_url), &bytes)
}

/// Fetches, parses and frames a route. Failures become a placeholder; this
/// never returns an error.
pub async fn load_route_view(
    source: &dyn RouteSource,
    route_url: &str,
    name: Option<&str>,
) -> RouteView {
    let name = name
        .filter(|n| !n.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| display_name(route_url));

    match load_route(source, route_url).await {
        Ok(geometry) => {
            tracing::debug!(
                "Loaded route {} ({} points)",
                route_url,
                geometry.line().0.len()
            );
            RouteView::Map(RouteMap::new(&name, &geometry))
        }
        Err(e) => {
            tracing::warn!("Error loading route {}: {}", route_url, e);
            RouteView::Placeholder(RoutePlaceholder::new(&name, &e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::source::testing::MemoryRouteSource;

    const THREE_POINTS: &str = r#"<gpx><trk><trkseg>
        <trkpt lat="39.0" lon="-105.0"/>
        <trkpt lat="39.5" lon="-105.5"/>
        <trkpt lat="39.2" lon="-104.8"/>
    </trkseg></trk></gpx>"#;

    #[tokio::test]
    async fn map_view_frames_route_with_markers() {
        let source = MemoryRouteSource::default().with_file("/routes/loop.gpx", THREE_POINTS);
        let view = load_route_view(&source, "/routes/loop.gpx", Some("Loop 10K")).await;

        let RouteView::Map(map) = view else {
            panic!("expected a map view");
        };
        assert_eq!(map.name, "Loop 10K");
        assert_eq!(map.padding, ROUTE_FIT_PADDING);
        assert_eq!(map.start.position, [-105.0, 39.0]);
        assert_eq!(map.start.color, START_MARKER_COLOR);
        assert_eq!(map.finish.position, [-104.8, 39.2]);
        assert_eq!(map.finish.kind, MarkerKind::Finish);
        assert_eq!(map.bounds.min_lng, -105.5);
        assert_eq!(map.bounds.max_lat, 39.5);
        assert_eq!(map.line["geometry"]["coordinates"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_file_becomes_placeholder() {
        let source = MemoryRouteSource::default();
        let view = load_route_view(&source, "/routes/ghost.gpx", None).await;

        assert_eq!(
            view,
            RouteView::Placeholder(RoutePlaceholder {
                icon: PLACEHOLDER_ICON,
                name: "ghost.gpx".to_string(),
                error: "Route file not found: /routes/ghost.gpx".to_string(),
                code: "route_file_not_found",
            })
        );
    }

    #[tokio::test]
    async fn unparseable_geojson_becomes_placeholder() {
        let source = MemoryRouteSource::default().with_file(
            "/routes/pins.geojson",
            r#"{"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}}"#,
        );
        let view = load_route_view(&source, "/routes/pins.geojson", None).await;
        match view {
            RouteView::Placeholder(p) => assert_eq!(p.code, "no_coordinates"),
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[tokio::test]
    async fn reloading_gives_identical_view() {
        let source = MemoryRouteSource::default().with_file("/routes/loop.gpx", THREE_POINTS);
        let first = load_route_view(&source, "/routes/loop.gpx", None).await;
        let second = load_route_view(&source, "/routes/loop.gpx", None).await;
        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn view_serializes_with_status_tag() {
        let placeholder = RouteView::Placeholder(RoutePlaceholder::new(
            "x.gpx",
            &RouteError::GpxUnparseable,
        ));
        let value = serde_json::to_value(&placeholder).unwrap();
        assert_eq!(value["status"], "placeholder");
        assert_eq!(value["code"], "gpx_unparseable");
        assert_eq!(value["error"], "Could not parse GPX");
    }

    #[test]
    fn display_name_is_the_file_name() {
        assert_eq!(display_name("/routes/2024/boulder.gpx?x=1"), "boulder.gpx");
        assert_eq!(display_name("https://cdn.example.com/a/"), "a");
    }
}
