use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tcd",
    version,
    long_about = "Tools for inspecting and querying TCD tide databases.\n\nNotes:\n  - Databases are read-only; no command modifies a file.\n  - Station enumeration follows on-disk record order."
)]
/// Main command-line interface structure for the tcd tool.
///
/// This struct uses `clap` to parse command-line arguments and subcommands.
pub(crate) struct Cli {
    /// Emit machine-readable JSON instead of human output.
    #[arg(long)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print header metadata and computed section offsets.
    Info {
        /// Database path (e.g. `harmonics.tcd`).
        path: String,
    },
    /// Validate that a database file is readable and well-formed.
    Validate {
        /// Database path.
        path: String,
    },
    /// List constituent speeds, or print one constituent in full.
    Constituents {
        /// Database path.
        path: String,
        /// Constituent name (e.g. `M2`); prints per-year vectors.
        #[arg(long)]
        name: Option<String>,
    },
    /// List stations as a table.
    Stations {
        /// Database path.
        path: String,
        /// Restrict to one record kind.
        #[arg(long, value_parser = ["reference", "subordinate"])]
        kind: Option<String>,
        /// Print at most this many stations.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one station in full detail.
    Show {
        /// Database path.
        path: String,
        /// Exact station name.
        #[arg(long)]
        name: Option<String>,
        /// Station index in record order (alternative to `--name`).
        #[arg(long)]
        index: Option<usize>,
    },
    /// Find stations whose name contains a substring (case-insensitive).
    Search {
        /// Database path.
        path: String,
        /// Substring to look for.
        needle: String,
    },
    /// Find the stations closest to a coordinate.
    Nearest {
        /// Database path.
        path: String,
        /// Latitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in decimal degrees.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Only consider stations within this many kilometers.
        #[arg(long)]
        radius: Option<f64>,
        /// Number of stations to return.
        #[arg(short, long, default_value_t = 1)]
        k: usize,
    },
    /// Infer missing constituents for a reference station and print them.
    Infer {
        /// Database path.
        path: String,
        /// Exact station name.
        #[arg(long)]
        name: String,
    },
    /// Dump one lookup table.
    Tables {
        /// Database path.
        path: String,
        /// Which table to dump.
        #[arg(long, value_parser = [
            "level-units",
            "direction-units",
            "restrictions",
            "tzfiles",
            "countries",
            "datums",
            "legalese",
            "constituents",
        ])]
        table: String,
    },
    /// Export all stations to a stable JSON/NDJSON format.
    Export {
        /// Database path.
        path: String,
        /// Output format: `json` or `ndjson`.
        #[arg(long, default_value = "json", value_parser = ["json", "ndjson"])]
        format: String,
        /// Optional output file path (defaults to stdout).
        #[arg(long)]
        out: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_parses() {
        let cli = Cli::try_parse_from(["tcd", "info", "harmonics.tcd"]).expect("parse");
        assert!(!cli.json);
        match cli.cmd {
            Command::Info { path } => assert_eq!(path, "harmonics.tcd"),
            _ => panic!("expected info command"),
        }
    }

    #[test]
    fn stations_parses_kind_and_limit() {
        let cli = Cli::try_parse_from([
            "tcd",
            "stations",
            "harmonics.tcd",
            "--kind",
            "reference",
            "--limit",
            "10",
        ])
        .expect("parse");
        match cli.cmd {
            Command::Stations { kind, limit, .. } => {
                assert_eq!(kind.as_deref(), Some("reference"));
                assert_eq!(limit, Some(10));
            }
            _ => panic!("expected stations command"),
        }
    }

    #[test]
    fn stations_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["tcd", "stations", "harmonics.tcd", "--kind", "weird"])
            .is_err());
    }

    #[test]
    fn nearest_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "tcd",
            "nearest",
            "harmonics.tcd",
            "--lat",
            "37.8",
            "--lon",
            "-122.4",
        ])
        .expect("parse");
        match cli.cmd {
            Command::Nearest { lat, lon, radius, k, .. } => {
                assert_eq!(lat, 37.8);
                assert_eq!(lon, -122.4);
                assert_eq!(radius, None);
                assert_eq!(k, 1);
            }
            _ => panic!("expected nearest command"),
        }
    }

    #[test]
    fn export_parses_defaults() {
        let cli = Cli::try_parse_from(["tcd", "export", "harmonics.tcd"]).expect("parse");
        match cli.cmd {
            Command::Export { format, out, .. } => {
                assert_eq!(format, "json");
                assert_eq!(out, None);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn tables_rejects_unknown_table() {
        assert!(
            Cli::try_parse_from(["tcd", "tables", "harmonics.tcd", "--table", "nope"]).is_err()
        );
    }

    #[test]
    fn json_flag_is_global_to_the_tool() {
        let cli =
            Cli::try_parse_from(["tcd", "--json", "validate", "harmonics.tcd"]).expect("parse");
        assert!(cli.json);
    }
}
