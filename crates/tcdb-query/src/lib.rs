//! Search helpers over decoded stations. These sit outside the decoder:
//! they consume the station list and add no decoding logic.

use tcdb_core::types::Station;

/// Mean Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Case-insensitive substring match on station names, preserving file
/// order.
pub fn search_names<'a>(stations: &'a [Station], needle: &str) -> Vec<&'a Station> {
    let needle = needle.to_lowercase();
    stations
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .collect()
}

/// The station closest to the given coordinates by great-circle distance.
pub fn nearest<'a>(stations: &'a [Station], latitude: f64, longitude: f64) -> Option<&'a Station> {
    stations.iter().min_by(|a, b| {
        let da = haversine_km(latitude, longitude, a.latitude, a.longitude);
        let db = haversine_km(latitude, longitude, b.latitude, b.longitude);
        da.total_cmp(&db)
    })
}

/// All stations within `radius_km` of the given coordinates, closest
/// first.
pub fn within_radius<'a>(
    stations: &'a [Station],
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Vec<&'a Station> {
    let mut hits: Vec<(f64, &Station)> = stations
        .iter()
        .filter_map(|s| {
            let d = haversine_km(latitude, longitude, s.latitude, s.longitude);
            (d <= radius_km).then_some((d, s))
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, s)| s).collect()
}

/// Great-circle distance between two points in decimal degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
