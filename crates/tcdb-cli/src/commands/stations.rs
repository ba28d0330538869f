use tcdb_core::types::Station;

use crate::types::StationRowJson;
use crate::util::{class_str, kind_str, open_db};

pub(crate) fn cmd_stations(
    path: &str,
    kind: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let mut file = open_db(path)?;
    let stations = file.stations()?;

    let selected: Vec<(usize, &Station)> = stations
        .iter()
        .enumerate()
        .filter(|(_, s)| match kind {
            Some("reference") => s.is_reference(),
            Some("subordinate") => s.is_subordinate(),
            _ => true,
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        let out: Vec<StationRowJson<'_>> = selected
            .iter()
            .map(|(index, s)| StationRowJson {
                index: *index,
                name: &s.name,
                latitude: s.latitude,
                longitude: s.longitude,
                kind: kind_str(s),
                class: class_str(s),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if selected.is_empty() {
        println!("No matching stations.");
        return Ok(());
    }
    print_table(&selected);
    Ok(())
}

fn print_table(rows: &[(usize, &Station)]) {
    let name_header = "Name";
    let mut name_w = name_header.len();
    for (_, s) in rows {
        name_w = name_w.max(s.name.len());
    }

    println!(
        "{idx:>6}  {name:<name_w$}  {lat:>10}  {lon:>11}  {kind:<11}  {class}",
        idx = "Index",
        name = name_header,
        lat = "Lat",
        lon = "Lon",
        kind = "Kind",
        class = "Class"
    );
    println!(
        "{:->6}  {:-<name_w$}  {:->10}  {:->11}  {:-<11}  {:-<7}",
        "", "", "", "", "", ""
    );
    for (index, s) in rows {
        println!(
            "{index:>6}  {name:<name_w$}  {lat:>10.5}  {lon:>11.5}  {kind:<11}  {class}",
            name = s.name,
            lat = s.latitude,
            lon = s.longitude,
            kind = kind_str(s),
            class = class_str(s)
        );
    }
}
