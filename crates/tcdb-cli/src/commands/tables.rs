use crate::types::TablesJson;
use crate::util::open_db;

pub(crate) fn cmd_tables(path: &str, table: &str, json: bool) -> anyhow::Result<()> {
    let file = open_db(path)?;
    let tables = file.tables();
    let entries: &[String] = match table {
        "level-units" => &tables.level_units,
        "direction-units" => &tables.direction_units,
        "restrictions" => &tables.restrictions,
        "tzfiles" => &tables.tzfiles,
        "countries" => &tables.countries,
        "datums" => &tables.datums,
        "legalese" => &tables.legaleses,
        "constituents" => &tables.constituent_names,
        other => anyhow::bail!("unknown table {other:?}"),
    };

    if json {
        let out = TablesJson { table, entries };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    for (i, entry) in entries.iter().enumerate() {
        println!("{i:>4}  {entry}");
    }
    Ok(())
}
