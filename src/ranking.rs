//! Nearest-station ranking by ellipsoidal distance.
//!
//! Distances are WGS84 geodesics (Karney's algorithm via the `geo` crate),
//! not haversine or planar approximations.

use geo::{Distance, Geodesic, Point};

use crate::model::{Coordinate, GeoError, RankedStation, StationRecord};

/// Geodesic distance in kilometres between two validated coordinates.
pub fn geodesic_distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    // geo points are (x = longitude, y = latitude)
    let pa = Point::new(a.longitude(), a.latitude());
    let pb = Point::new(b.longitude(), b.latitude());
    Geodesic::distance(pa, pb) / 1000.0
}

/// Returns the `k` stations closest to `reference`, nearest first.
///
/// Every station coordinate is validated before any distance is computed,
/// so a single bad row fails the whole query. Ties keep table order.
pub fn rank_nearest(
    reference: &Coordinate,
    stations: &[StationRecord],
    k: usize,
) -> Result<Vec<RankedStation>, GeoError> {
    let coordinates = stations
        .iter()
        .map(|s| Coordinate::new(s.latitude, s.longitude))
        .collect::<Result<Vec<_>, _>>()?;

    let mut ranked: Vec<RankedStation> = stations
        .iter()
        .zip(&coordinates)
        .map(|(station, coordinate)| RankedStation {
            station: station.clone(),
            distance_km: geodesic_distance_km(reference, coordinate),
        })
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);

    Ok(ranked)
}
