use tcdb_core::types::{Station, StationBody};

use crate::types::ShowJson;
use crate::util::{class_str, kind_str, open_db};

pub(crate) fn cmd_show(
    path: &str,
    name: Option<&str>,
    index: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let mut file = open_db(path)?;
    let stations = file.stations()?;

    let found: Option<(usize, &Station)> = match (name, index) {
        (Some(name), _) => stations
            .iter()
            .enumerate()
            .find(|(_, s)| s.name == name),
        (None, Some(index)) => stations.get(index).map(|s| (index, s)),
        (None, None) => {
            anyhow::bail!("missing station selector (use --name NAME or --index N)")
        }
    };
    let Some((index, station)) = found else {
        anyhow::bail!("station not found in {path}");
    };

    if json {
        let out = ShowJson {
            path,
            index,
            station,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Station: {} (index {index})", station.name);
    println!("Kind: {} ({})", kind_str(station), class_str(station));
    println!(
        "Position: {:.5}, {:.5}",
        station.latitude, station.longitude
    );
    println!("Time zone: {}", station.time_zone);
    println!("Country: {}", station.country);
    if let Some(reference) = station.reference_station {
        println!("Reference station index: {reference}");
    }
    if !station.source.is_empty() {
        println!("Source: {}", station.source);
    }
    if !station.restriction.is_empty() {
        println!("Restriction: {}", station.restriction);
    }
    if !station.comments.is_empty() {
        println!("Comments: {}", station.comments);
    }
    if !station.notes.is_empty() {
        println!("Notes: {}", station.notes);
    }
    if !station.station_id.is_empty() {
        println!(
            "Station id: {} ({})",
            station.station_id, station.station_id_context
        );
    }
    if station.date_imported != 0 {
        println!("Date imported: {}", station.date_imported);
    }
    if let (Some(min), Some(max)) = (station.min_direction, station.max_direction) {
        println!(
            "Directions: min={min} max={max} {}",
            station.direction_units
        );
    }
    println!("Level units: {}", station.level_units);

    match &station.body {
        StationBody::Reference(data) => {
            println!("Datum: {} (offset {:.4})", data.datum, data.datum_offset);
            println!("Zone offset: {:+05}", data.zone_offset);
            if data.expiration_date != 0 {
                println!("Expiration date: {}", data.expiration_date);
            }
            println!("Months on station: {}", data.months_on_station);
            if data.last_date_on_station != 0 {
                println!("Last date on station: {}", data.last_date_on_station);
            }
            println!("Confidence: {}", data.confidence);
            println!("Active constituents: {}", station.active_constituents());
            for (i, (amp, epoch)) in data.amplitudes.iter().zip(&data.epochs).enumerate() {
                if *amp > 0.0 {
                    println!("  [{i}] amplitude={amp:.4} epoch={epoch:.2}");
                }
            }
        }
        StationBody::Subordinate(data) => {
            println!(
                "Min offsets: time={}m level={:+.3} multiply={:.3}",
                data.min_time_add, data.min_level_add, data.min_level_multiply
            );
            println!(
                "Max offsets: time={}m level={:+.3} multiply={:.3}",
                data.max_time_add, data.max_level_add, data.max_level_multiply
            );
            if let Some(flood) = data.flood_begins {
                println!("Flood begins: {flood}m");
            }
            if let Some(ebb) = data.ebb_begins {
                println!("Ebb begins: {ebb}m");
            }
        }
    }
    Ok(())
}
