//! Coordinate extraction from GPX documents.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::geometry::LngLat;
use super::RouteError;

fn point_coordinate(element: &BytesStart) -> Result<LngLat, RouteError> {
    let mut lat = None;
    let mut lon = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|_| RouteError::GpxUnparseable)?;
        let value = attr
            .unescape_value()
            .map_err(|_| RouteError::GpxUnparseable)?;
        match attr.key.local_name().as_ref() {
            b"lat" => lat = value.trim().parse::<f64>().ok(),
            b"lon" => lon = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    match (lon, lat) {
        (Some(lon), Some(lat)) if lon.is_finite() && lat.is_finite() => Ok([lon, lat]),
        _ => Err(RouteError::Malformed(
            "GPX point without numeric lat/lon".to_string(),
        )),
    }
}

/// Reads track points (`trkpt`) in document order, falling back to route
/// points (`rtept`) when the file has no track.
pub fn extract_coordinates(bytes: &[u8]) -> Result<Vec<LngLat>, RouteError> {
    let text = std::str::from_utf8(bytes).map_err(|_| RouteError::GpxUnparseable)?;
    let mut reader = Reader::from_str(text);

    let mut track_points = Vec::new();
    // Route points are a fallback: a bad one only matters without a track
    let mut route_points: Result<Vec<LngLat>, RouteError> = Ok(Vec::new());

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) | Ok(Event::Empty(element)) => {
                match element.local_name().as_ref() {
                    b"trkpt" => track_points.push(point_coordinate(&element)?),
                    b"rtept" => {
                        route_points = route_points.and_then(|mut points| {
                            points.push(point_coordinate(&element)?);
                            Ok(points)
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    "GPX parse error at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                return Err(RouteError::GpxUnparseable);
            }
        }
    }

    if !track_points.is_empty() {
        return Ok(track_points);
    }
    match route_points? {
        points if !points.is_empty() => Ok(points),
        _ => Err(RouteError::GpxUnparseable),
    }
}
