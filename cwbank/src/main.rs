use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cwdata::{Banks, GameData, Identified, LoadConfig, TileType, UnitType};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a Computer Wars data set", long_about = None)]
struct Args {
    /// Path to the bank manifest
    manifest: PathBuf,

    /// Load configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load data sets whose country turn orders clash
    #[arg(long)]
    allow_invalid_turn_orders: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the entry names of a bank, e.g. `unitTypes`
    #[arg(long)]
    list: Option<String>,

    /// Print a unit type's effective weapons
    #[arg(long)]
    unit: Option<String>,

    /// Print the structures a tile type belongs to
    #[arg(long)]
    tile: Option<String>,
}

/// Bank sizes keyed the way the manifest names them, in load order.
fn bank_names(banks: &Banks) -> Vec<(&'static str, Vec<&str>)> {
    vec![
        ("commanders", banks.commanders.names().collect()),
        ("weathers", banks.weathers.names().collect()),
        ("environments", banks.environments.names().collect()),
        ("countries", banks.countries.names().collect()),
        ("movementTypes", banks.movement_types.names().collect()),
        ("structures", banks.structures.names().collect()),
        ("tileTypes", banks.tile_types.names().collect()),
        ("terrains", banks.terrains.names().collect()),
        ("unitTypes", banks.unit_types.names().collect()),
        ("weapons", banks.weapons.names().collect()),
    ]
}

/// Formats a damage table sorted by target.
fn damage_table(table: &HashMap<String, i32>) -> String {
    if table.is_empty() {
        return "(none)".to_string();
    }
    let mut entries: Vec<_> = table.iter().collect();
    entries.sort();
    entries
        .iter()
        .map(|(target, damage)| format!("{} {}", target, damage))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_unit(data: &GameData, name: &str) -> Result<()> {
    let unit = data
        .get::<UnitType>(name)
        .with_context(|| format!("Failed to look up unit type {}", name))?;
    println!(
        "{} (movement type {}, price {}, {} MP, {} HP)",
        unit.script_name(),
        unit.movement_type_name(),
        unit.price(),
        unit.movement_points(),
        unit.max_displayed_hp()
    );
    for weapon in unit.weapons() {
        let ammo = if weapon.has_infinite_ammo() {
            "infinite".to_string()
        } else {
            weapon.max_ammo().to_string()
        };
        println!(
            "  {}: ammo {}, range {}-{}",
            weapon.script_name(),
            ammo,
            weapon.low_range(),
            weapon.high_range()
        );
        println!("    units: {}", damage_table(weapon.units()));
        println!("    hidden units: {}", damage_table(weapon.hidden_units()));
        println!("    terrains: {}", damage_table(weapon.terrains()));
    }
    Ok(())
}

fn print_tile(data: &GameData, name: &str) -> Result<()> {
    let tile = data
        .get::<TileType>(name)
        .with_context(|| format!("Failed to look up tile type {}", name))?;
    let structures: Vec<_> = tile.structures().map(|s| s.script_name().to_owned()).collect();
    println!(
        "{}: paintable {}",
        tile.script_name(),
        if tile.is_paintable() { "yes" } else { "no" }
    );
    if structures.is_empty() {
        println!("  structures: (none)");
    } else {
        println!("  structures: {}", structures.join(", "));
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let mut config = match &args.config {
        Some(path) => LoadConfig::from_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => LoadConfig::default(),
    };
    if args.allow_invalid_turn_orders {
        config.reject_invalid_turn_orders = false;
    }

    let data = GameData::load(&args.manifest, &config)
        .with_context(|| format!("Failed to load {}", args.manifest.display()))?;

    let banks = bank_names(data.banks());
    for (key, names) in &banks {
        println!("{}: {}", key, names.len());
    }

    if let Some(list) = &args.list {
        let Some((_, names)) = banks.iter().find(|(key, _)| *key == list.as_str()) else {
            bail!("Unknown bank {}", list);
        };
        for name in names {
            println!("{}", name);
        }
    }
    if let Some(unit) = &args.unit {
        print_unit(&data, unit)?;
    }
    if let Some(tile) = &args.tile {
        print_tile(&data, tile)?;
    }

    Ok(())
}
