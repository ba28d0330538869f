use crate::types::{SearchJson, StationRowJson};
use crate::util::{class_str, kind_str, open_db};

pub(crate) fn cmd_search(path: &str, needle: &str, json: bool) -> anyhow::Result<()> {
    let mut file = open_db(path)?;
    let stations = file.stations()?;
    let hits = tcdb_query::search_names(stations, needle);

    if json {
        let results = hits
            .iter()
            .map(|s| {
                let index = stations
                    .iter()
                    .position(|t| std::ptr::eq(t, *s))
                    .unwrap_or_default();
                StationRowJson {
                    index,
                    name: &s.name,
                    latitude: s.latitude,
                    longitude: s.longitude,
                    kind: kind_str(s),
                    class: class_str(s),
                }
            })
            .collect();
        let out = SearchJson { needle, results };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No stations match {needle:?}.");
        return Ok(());
    }
    for s in hits {
        println!(
            "{name}  ({lat:.5}, {lon:.5})  {kind}",
            name = s.name,
            lat = s.latitude,
            lon = s.longitude,
            kind = kind_str(s)
        );
    }
    Ok(())
}
