use crate::types::{InferJson, InferredJson};
use crate::util::open_db;

pub(crate) fn cmd_infer(path: &str, name: &str, json: bool) -> anyhow::Result<()> {
    let mut file = open_db(path)?;
    let Some(station) = file.station_by_name(name)? else {
        anyhow::bail!("station {name:?} not found in {path}");
    };
    // Inference mutates a copy; the on-disk database stays untouched.
    let mut station = station.clone();
    let before = station
        .reference_data()
        .map(|d| d.amplitudes.clone())
        .unwrap_or_default();
    let performed = file.infer_constituents(&mut station);

    let mut inferred = Vec::new();
    if performed {
        if let Some(data) = station.reference_data() {
            for (i, c) in file.constituents().iter().enumerate() {
                if before[i] == 0.0 && data.amplitudes[i] != 0.0 {
                    inferred.push((i, c.name.as_str(), data.amplitudes[i], data.epochs[i]));
                }
            }
        }
    }

    if json {
        let out = InferJson {
            station: name,
            performed,
            inferred: inferred
                .iter()
                .map(|&(_, name, amplitude, epoch)| InferredJson {
                    name,
                    amplitude,
                    epoch,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if !performed {
        println!("Inference not performed for {name} (preconditions unmet).");
        return Ok(());
    }
    if inferred.is_empty() {
        println!("Inference performed for {name}; nothing was eligible.");
        return Ok(());
    }
    println!("Inference performed for {name}:");
    for (_, constituent, amplitude, epoch) in inferred {
        println!("  {constituent}: amplitude={amplitude:.4} epoch={epoch:.2}");
    }
    Ok(())
}
