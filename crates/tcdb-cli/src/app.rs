use crate::cli::{Cli, Command};

/// Dispatch to the command handlers.
pub(crate) fn run(cli: Cli) -> anyhow::Result<()> {
    let json = cli.json;
    match cli.cmd {
        Command::Info { path } => crate::commands::info::cmd_info(&path, json),
        Command::Validate { path } => crate::commands::validate::cmd_validate(&path, json),
        Command::Constituents { path, name } => {
            crate::commands::constituents::cmd_constituents(&path, name.as_deref(), json)
        }
        Command::Stations { path, kind, limit } => {
            crate::commands::stations::cmd_stations(&path, kind.as_deref(), limit, json)
        }
        Command::Show { path, name, index } => {
            crate::commands::show::cmd_show(&path, name.as_deref(), index, json)
        }
        Command::Search { path, needle } => {
            crate::commands::search::cmd_search(&path, &needle, json)
        }
        Command::Nearest {
            path,
            lat,
            lon,
            radius,
            k,
        } => crate::commands::nearest::cmd_nearest(&path, lat, lon, radius, k, json),
        Command::Infer { path, name } => crate::commands::infer::cmd_infer(&path, &name, json),
        Command::Tables { path, table } => crate::commands::tables::cmd_tables(&path, &table, json),
        Command::Export { path, format, out } => {
            crate::commands::export::cmd_export(&path, &format, out.as_deref(), json)
        }
    }
}
