use crate::types::InfoJson;
use crate::util::{fmt_u64_commas, open_db};

pub(crate) fn cmd_info(path: &str, json: bool) -> anyhow::Result<()> {
    let file = open_db(path)?;

    if json {
        let out = InfoJson {
            path,
            version: file.version(),
            last_modified: file.last_modified(),
            major_rev: file.params().major_rev,
            minor_rev: file.params().minor_rev,
            station_count: file.station_count(),
            constituent_count: file.constituent_count(),
            start_year: file.start_year(),
            number_of_years: file.number_of_years(),
            end_of_file: file.end_of_file(),
            checksum: file.checksum(),
            constituent_data_offset: file.tables().constituent_data_offset,
            station_records_offset: file.tables().station_records_offset,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Path: {path}");
    println!("Version: {}", file.version().unwrap_or("(none)"));
    println!("Last modified: {}", file.last_modified().unwrap_or("(none)"));
    println!(
        "Revision: {}.{}",
        file.params().major_rev,
        file.params().minor_rev
    );
    println!("Stations: {}", fmt_u64_commas(u64::from(file.station_count())));
    println!("Constituents: {}", file.constituent_count());
    let (from, to) = file.year_range();
    println!("Years: {from}..{to}");
    if let Some(eof) = file.end_of_file() {
        println!("End of file: {}", fmt_u64_commas(eof));
    }
    println!("Checksum: 0x{:08x}", file.checksum());
    println!(
        "Constituent data offset: {}",
        file.tables().constituent_data_offset
    );
    println!(
        "Station records offset: {}",
        file.tables().station_records_offset
    );
    Ok(())
}
