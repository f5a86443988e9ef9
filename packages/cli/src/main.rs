#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for gridding administrative boundaries.
//!
//! Grids a boundary `GeoJSON` into square cells, stores the clipped
//! polygons in `DuckDB`, and answers point and state-code queries against
//! them.

mod config;
mod output;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use config::Settings;
use geogrid_database::SpatialStore;
use geogrid_grid_models::ReferenceKind;
use geogrid_spatial::PolygonIndex;

#[derive(Parser)]
#[command(name = "geogrid", about = "Boundary gridding and polygon lookup tool")]
struct Cli {
    /// `DuckDB` database file (default: `data/geogrid.duckdb`)
    #[arg(long, global = true, env = "GEOGRID_DB_PATH")]
    db: Option<PathBuf>,
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Polygon table to use: STATE or COUNTRY (default: STATE)
    #[arg(long, global = true)]
    reference: Option<ReferenceKind>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load state records (`[{"id", "name", "code"}]` JSON) into the states table
    SeedStates {
        /// JSON file of state records
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Grid a boundary file and store the clipped polygons
    Extract {
        /// Boundary `GeoJSON` file
        #[arg(long, env = "GEOGRID_INPUT")]
        input: Option<PathBuf>,
        /// Grid cell size in kilometres (default: 33)
        #[arg(long, env = "GEOGRID_GRID_KM")]
        grid_km: Option<f64>,
        /// Comma-separated state names to grid (matches the `state` property)
        #[arg(long, value_delimiter = ',')]
        only_states: Vec<String>,
        /// Replace previously stored polygons of this reference kind (kept if the run fails)
        #[arg(long)]
        replace: bool,
    },
    /// Find the stored polygon containing a point
    Lookup {
        /// Longitude
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Write `GeoJSON` here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Look up many points against an in-memory index of stored polygons
    Locate {
        /// Points as `lon,lat`, repeatable
        #[arg(long = "point", required = true, value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<(f64, f64)>,
    },
    /// List stored polygons of the given state codes
    ByCodes {
        /// Comma-separated state codes (e.g. "OG,KD")
        #[arg(long, value_delimiter = ',', required = true)]
        codes: Vec<String>,
        /// Write `GeoJSON` here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List every stored polygon
    List {
        /// Write `GeoJSON` here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print how many polygons are stored
    Count,
}

fn parse_point(value: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = value
        .split_once(',')
        .ok_or_else(|| format!("expected lon,lat, got {value:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude {lon:?}: {e}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude {lat:?}: {e}"))?;
    Ok((lon, lat))
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let db_path = settings.db_path(cli.db);
    let reference = settings.reference(cli.reference);
    let conn = geogrid_database::open(&db_path)?;

    match cli.command {
        Commands::SeedStates { file } => {
            let file = settings
                .states_file(file)
                .ok_or("no states file given (use --file or states_file in the config)")?;
            let records = geogrid_database::states::read_states_file(&file)?;
            let written = geogrid_database::states::seed_states(&conn, &records)?;
            println!("Seeded {written} states into {}", db_path.display());
        }
        Commands::Extract {
            input,
            grid_km,
            only_states,
            replace,
        } => {
            let input = settings
                .input(input)
                .ok_or("no boundary file given (use --input, GEOGRID_INPUT or input in the config)")?;
            let grid_km = settings.grid_km(grid_km);

            let store = SpatialStore::with_loaded_states(conn, reference)?;
            let features = geogrid_grid::boundary::read_boundary_file(&input)?;
            let summary =
                pipeline::run_extraction(&store, features, grid_km, &only_states, replace)?;

            println!("{:<18} {}", "REFERENCE", summary.reference);
            println!("{:<18} {}", "GRID KM", summary.grid_km);
            println!("{:<18} {}", "FEATURES", summary.feature_count);
            println!("{:<18} {}", "REPAIR FAILURES", summary.repair_failures);
            println!("{:<18} {}", "GRID CELLS", summary.cell_count);
            println!("{:<18} {}", "CLIPPED PIECES", summary.clipped_count);
            println!("{:<18} {}", "INSERTED", summary.inserted);
            println!("{:<18} {}", "UNRESOLVED STATES", summary.unresolved);
        }
        Commands::Lookup { lon, lat, output } => {
            let store = SpatialStore::with_loaded_states(conn, reference)?;
            let found = store.find_containing(lon, lat)?;
            if found.is_none() {
                log::info!("No {reference} polygon contains ({lon}, {lat})");
            }
            let polygons: Vec<_> = found.into_iter().collect();
            output::write_polygons(&polygons, output.as_deref())?;
        }
        Commands::Locate { points } => {
            let store = SpatialStore::with_loaded_states(conn, reference)?;
            let index = PolygonIndex::load(&store)?;

            println!(
                "{:<24} {:<8} {:<6} {:<6} {:<6}",
                "POINT", "ID", "STATE", "ROW", "COL"
            );
            println!("{}", "-".repeat(54));
            for (lon, lat) in points {
                let point = format!("{lon},{lat}");
                match index.lookup(lon, lat) {
                    Some(polygon) => println!(
                        "{:<24} {:<8} {:<6} {:<6} {:<6}",
                        point,
                        polygon.id.map_or_else(|| "-".to_string(), |id| id.to_string()),
                        polygon.state.as_ref().map_or("-", |s| s.code.as_str()),
                        polygon.metadata.row_index,
                        polygon.metadata.col_index,
                    ),
                    None => println!("{point:<24} -"),
                }
            }
        }
        Commands::ByCodes { codes, output } => {
            let store = SpatialStore::with_loaded_states(conn, reference)?;
            let polygons = store.find_by_codes(&codes)?;
            log::info!(
                "{} polygons for {}",
                polygons.len(),
                codes.join(", ")
            );
            output::write_polygons(&polygons, output.as_deref())?;
        }
        Commands::List { output } => {
            let store = SpatialStore::with_loaded_states(conn, reference)?;
            let polygons = store.find_all()?;
            output::write_polygons(&polygons, output.as_deref())?;
        }
        Commands::Count => {
            let store = SpatialStore::with_loaded_states(conn, reference)?;
            println!("{} {reference} polygons", store.count()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("3.5,-7.25").unwrap(), (3.5, -7.25));
        assert_eq!(parse_point(" 3.5 , 7 ").unwrap(), (3.5, 7.0));
        assert!(parse_point("3.5").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn parses_extract_arguments() {
        let cli = Cli::try_parse_from([
            "geogrid",
            "--reference",
            "country",
            "extract",
            "--grid-km",
            "10",
            "--only-states",
            "Ogun,Kaduna",
        ])
        .unwrap();

        assert_eq!(cli.reference, Some(ReferenceKind::Country));
        match cli.command {
            Commands::Extract {
                grid_km,
                only_states,
                replace,
                ..
            } => {
                assert_eq!(grid_km, Some(10.0));
                assert_eq!(only_states, vec!["Ogun".to_string(), "Kaduna".to_string()]);
                assert!(!replace);
            }
            _ => panic!("expected extract"),
        }
    }
}
