use crate::types::{NearestJson, NearestRowJson};
use crate::util::{kind_str, open_db};

pub(crate) fn cmd_nearest(
    path: &str,
    lat: f64,
    lon: f64,
    radius: Option<f64>,
    k: usize,
    json: bool,
) -> anyhow::Result<()> {
    let mut file = open_db(path)?;
    let stations = file.stations()?;
    let hits = tcdb_query::within_radius(stations, lat, lon, radius.unwrap_or(f64::INFINITY));
    let hits = &hits[..hits.len().min(k)];

    if json {
        let results = hits
            .iter()
            .map(|s| NearestRowJson {
                name: &s.name,
                latitude: s.latitude,
                longitude: s.longitude,
                distance_km: tcdb_query::haversine_km(lat, lon, s.latitude, s.longitude),
                kind: kind_str(s),
            })
            .collect();
        let out = NearestJson {
            latitude: lat,
            longitude: lon,
            radius_km: radius,
            results,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No stations within range.");
        return Ok(());
    }
    for s in hits {
        let d = tcdb_query::haversine_km(lat, lon, s.latitude, s.longitude);
        println!(
            "{d:>8.2} km  {name}  ({lat:.5}, {lon:.5})",
            name = s.name,
            lat = s.latitude,
            lon = s.longitude
        );
    }
    Ok(())
}
