use anyhow::Context;
use std::io::Write;

use crate::types::{ExportBundleJson, ExportNdjsonRecordJson};
use crate::util::open_db;

const EXPORT_FORMAT: &str = "tcdb.export.v1";

pub(crate) fn cmd_export(
    path: &str,
    format: &str,
    out: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    if json && format != "json" {
        anyhow::bail!("--json only applies to the default json format");
    }
    let mut file = open_db(path)?;
    let station_count = file.station_count();
    let constituent_count = file.constituent_count();
    let version = file.version().map(str::to_string);
    let stations = file.stations()?;

    let body = match format {
        "json" => {
            let bundle = ExportBundleJson {
                format: EXPORT_FORMAT,
                path,
                version: version.as_deref(),
                station_count,
                constituent_count,
                stations,
            };
            let mut body = serde_json::to_string_pretty(&bundle)?;
            body.push('\n');
            body
        }
        "ndjson" => {
            let mut body = String::new();
            for (index, station) in stations.iter().enumerate() {
                let record = ExportNdjsonRecordJson { index, station };
                body.push_str(&serde_json::to_string(&record)?);
                body.push('\n');
            }
            body
        }
        other => anyhow::bail!("unknown export format {other:?}"),
    };

    match out {
        Some(out_path) => {
            let mut f = std::fs::File::create(out_path)
                .with_context(|| format!("create {out_path}"))?;
            f.write_all(body.as_bytes())
                .with_context(|| format!("write {out_path}"))?;
        }
        None => print!("{body}"),
    }
    Ok(())
}
