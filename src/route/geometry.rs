use geo::{BoundingRect, Coord, LineString, Rect};
use serde::Serialize;

use super::RouteError;

/// A `(longitude, latitude)` pair, GeoJSON order.
pub type LngLat = [f64; 2];

/// An ordered route line. Never empty, so its bounding rectangle always
/// exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    line: LineString<f64>,
    bounds: Rect<f64>,
}

impl RouteGeometry {
    pub fn new(coordinates: Vec<LngLat>) -> Result<Self, RouteError> {
        let line = LineString::from(coordinates);
        let bounds = line.bounding_rect().ok_or(RouteError::NoCoordinates)?;
        Ok(Self { line, bounds })
    }

    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn coordinates(&self) -> Vec<LngLat> {
        self.line.coords().map(|c| lng_lat(*c)).collect()
    }

    pub fn start(&self) -> LngLat {
        lng_lat(self.line.0[0])
    }

    pub fn finish(&self) -> LngLat {
        lng_lat(self.line.0[self.line.0.len() - 1])
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from(self.bounds)
    }
}

fn lng_lat(coord: Coord<f64>) -> LngLat {
    [coord.x, coord.y]
}

/// Wire form of the route's bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox {
            min_lng: rect.min().x,
            min_lat: rect.min().y,
            max_lng: rect.max().x,
            max_lat: rect.max().y,
        }
    }
}

impl BoundingBox {
    /// `[[south, west], [north, east]]`, the corner order Leaflet's
    /// `fitBounds` takes.
    pub fn to_lat_lng_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lng], [self.max_lat, self.max_lng]]
    }
}
