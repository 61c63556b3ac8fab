//! Race route pipeline: fetch a GPX/GeoJSON file, extract its line, and
//! describe how to draw it.

pub mod geojson;
pub mod geometry;
pub mod gpx;
pub mod render;
pub mod source;

use thiserror::Error;

pub use geometry::{BoundingBox, LngLat, RouteGeometry};
pub use render::{load_route_view, RouteView};
pub use source::{RouteSource, SiteRouteSource};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Route file not found: {0}")]
    NotFound(String),
    #[error("Route fetch failed: {0}")]
    Fetch(String),
    #[error("Could not extract coordinates from route")]
    NoCoordinates,
    #[error("Could not parse GPX")]
    GpxUnparseable,
    #[error("Malformed route file: {0}")]
    Malformed(String),
}

impl RouteError {
    /// Stable identifier shown alongside the placeholder.
    pub fn code(&self) -> &'static str {
        match self {
            RouteError::NotFound(_) | RouteError::Fetch(_) => "route_file_not_found",
            RouteError::NoCoordinates => "no_coordinates",
            RouteError::GpxUnparseable => "gpx_unparseable",
            RouteError::Malformed(_) => "malformed_route",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFormat {
    GeoJson,
    Gpx,
}

impl RouteFormat {
    /// `.geojson` and `.json` are GeoJSON; everything else is read as GPX.
    pub fn from_url(route_url: &str) -> Self {
        let path = route_url
            .split(['?', '#'])
            .next()
            .unwrap_or(route_url)
            .to_ascii_lowercase();
        if path.ends_with(".geojson") || path.ends_with(".json") {
            RouteFormat::GeoJson
        } else {
            RouteFormat::Gpx
        }
    }
}

/// Turns fetched bytes into route geometry. Pure: the same bytes always
/// give the same geometry.
pub fn parse_route(format: RouteFormat, bytes: &[u8]) -> Result<RouteGeometry, RouteError> {
    let coordinates = match format {
        RouteFormat::GeoJson => geojson::extract_coordinates(bytes)?,
        RouteFormat::Gpx => gpx::extract_coordinates(bytes)?,
    };
    RouteGeometry::new(coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(RouteFormat::from_url("/routes/boulder.gpx"), RouteFormat::Gpx);
        assert_eq!(
            RouteFormat::from_url("/routes/leadville.geojson"),
            RouteFormat::GeoJson
        );
        assert_eq!(
            RouteFormat::from_url("https://cdn.example.com/r.JSON?v=3#top"),
            RouteFormat::GeoJson
        );
        assert_eq!(RouteFormat::from_url("/routes/no-extension"), RouteFormat::Gpx);
    }

    #[test]
    fn empty_line_string_is_no_coordinates() {
        let doc = br#"{"type": "LineString", "coordinates": []}"#;
        let err = parse_route(RouteFormat::GeoJson, doc).unwrap_err();
        assert_eq!(err.code(), "no_coordinates");
    }

    #[test]
    fn same_bytes_same_bounding_box() {
        let doc = br#"<gpx><trk><trkseg>
            <trkpt lat="40.0" lon="-105.0"/><trkpt lat="40.5" lon="-105.3"/>
        </trkseg></trk></gpx>"#;
        let first = parse_route(RouteFormat::Gpx, doc).unwrap().bounding_box();
        let second = parse_route(RouteFormat::Gpx, doc).unwrap().bounding_box();
        assert_eq!(first, second);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(RouteError::NotFound("x".into()).code(), "route_file_not_found");
        assert_eq!(RouteError::GpxUnparseable.code(), "gpx_unparseable");
        assert_eq!(RouteError::Malformed("x".into()).code(), "malformed_route");
    }
}
