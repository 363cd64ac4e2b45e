use routeplay_core::{LatLon, RouteGeometry};
use serde::Deserialize;
use serde_json::Value;

use crate::{FailureKind, JobError};

const LINE_STRING: &str = "LineString";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Extracts the first line-shaped feature of a GeoJSON feature collection.
///
/// Coordinates arrive as `[lon, lat, ...]` and come out latitude-first.
/// Extra ordinates such as elevation are ignored.
pub fn parse_route_geometry(bytes: &[u8]) -> Result<RouteGeometry, JobError> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .map_err(|err| JobError::new(FailureKind::InvalidArtifact, err.to_string()))?;

    let geometry = collection
        .features
        .into_iter()
        .filter_map(|feature| feature.geometry)
        .find(|geometry| geometry.kind == LINE_STRING)
        .ok_or_else(|| JobError::new(FailureKind::MissingRoute, "no LineString feature"))?;

    let positions: Vec<Vec<f64>> = serde_json::from_value(geometry.coordinates)
        .map_err(|err| JobError::new(FailureKind::InvalidArtifact, err.to_string()))?;

    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| match position.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => {
                Ok(LatLon::from_lon_lat(*lon, *lat))
            }
            _ => Err(JobError::new(
                FailureKind::InvalidArtifact,
                format!("coordinate {index} is not a finite [lon, lat] pair"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(RouteGeometry::new)
}
