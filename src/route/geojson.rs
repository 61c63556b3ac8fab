//! Coordinate extraction from GeoJSON route files.

use serde::Deserialize;

use super::geometry::LngLat;
use super::RouteError;

/// A position with at least longitude and latitude; extra ordinates
/// (elevation, time) are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
struct Position(LngLat);

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat, ..] => Ok(Position([*lng, *lat])),
            _ => Err(format!(
                "position needs at least 2 numbers, got {}",
                values.len()
            )),
        }
    }
}

/// The slice of GeoJSON a route file can contain. Anything that is not a
/// line (points, polygons, collections of those) is kept as `Other` and
/// skipped during extraction.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    FeatureCollection {
        #[serde(default)]
        features: Vec<GeoJson>,
    },
    Feature {
        #[serde(default)]
        geometry: Option<Box<GeoJson>>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    #[serde(other)]
    Other,
}

impl GeoJson {
    /// First line geometry found, depth first, in document order.
    fn line_coordinates(self) -> Option<Vec<LngLat>> {
        match self {
            GeoJson::FeatureCollection { features } => features
                .into_iter()
                .find_map(GeoJson::line_coordinates),
            GeoJson::Feature { geometry } => geometry.and_then(|g| g.line_coordinates()),
            GeoJson::LineString { coordinates } => {
                Some(coordinates.into_iter().map(|p| p.0).collect())
            }
            GeoJson::MultiLineString { coordinates } => Some(
                coordinates
                    .into_iter()
                    .flatten()
                    .map(|p| p.0)
                    .collect(),
            ),
            GeoJson::Other => None,
        }
    }
}

/// Parses a GeoJSON document and returns the coordinates of its first
/// `LineString` or `MultiLineString`.
pub fn extract_coordinates(bytes: &[u8]) -> Result<Vec<LngLat>, RouteError> {
    let document: GeoJson = serde_json::from_slice(bytes)
        .map_err(|e| RouteError::Malformed(format!("invalid GeoJSON: {e}")))?;

    document
        .line_coordinates()
        .ok_or(RouteError::NoCoordinates)
}
