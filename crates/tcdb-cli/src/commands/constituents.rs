use crate::types::{ConstituentDetailJson, ConstituentRowJson};
use crate::util::open_db;

pub(crate) fn cmd_constituents(path: &str, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let file = open_db(path)?;

    if let Some(name) = name {
        let Some(c) = file.constituent(name) else {
            anyhow::bail!("constituent {name:?} not found in {path}");
        };
        if json {
            let out = ConstituentDetailJson {
                index: c.index,
                name: &c.name,
                speed: c.speed,
                start_year: file.start_year(),
                equilibrium: &c.equilibrium,
                node_factors: &c.node_factors,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("Constituent: {} (index {})", c.name, c.index);
            println!("Speed: {:.7} deg/hr", c.speed);
            for (i, (eq, node)) in c.equilibrium.iter().zip(&c.node_factors).enumerate() {
                let year = file.start_year() + i as i32;
                println!("  {year}: equilibrium={eq:.2} node_factor={node:.4}");
            }
        }
        return Ok(());
    }

    if json {
        let out: Vec<ConstituentRowJson<'_>> = file
            .constituents()
            .iter()
            .map(|c| ConstituentRowJson {
                index: c.index,
                name: &c.name,
                speed: c.speed,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let name_w = file
        .constituents()
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4);
    for c in file.constituents() {
        println!("{:<name_w$}  {:>12.7} deg/hr", c.name, c.speed);
    }
    Ok(())
}
