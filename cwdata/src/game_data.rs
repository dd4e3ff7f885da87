//! Loading a whole data set and querying it once resolved.

use std::path::Path;

use cwjson::{JsonReader, type_name};
use serde_json::Value;

use crate::bank::{Bank, BankIndex, BankRecord};
use crate::commanders::Commander;
use crate::config::LoadConfig;
use crate::countries::Country;
use crate::environments::Environment;
use crate::error::BankError;
use crate::links::Links;
use crate::movement_types::MovementType;
use crate::structures::Structure;
use crate::terrains::Terrain;
use crate::tile_types::TileType;
use crate::turn_order::check_country_turn_order_ids;
use crate::unit_types::UnitType;
use crate::view::{Linkable, Linked};
use crate::weapons::Weapon;
use crate::weathers::Weather;

/// Every bank of a data set, as loaded and before resolution.
#[derive(Debug, Clone, Default)]
pub struct Banks {
    pub commanders: Bank<Commander>,
    pub weathers: Bank<Weather>,
    pub environments: Bank<Environment>,
    pub countries: Bank<Country>,
    pub movement_types: Bank<MovementType>,
    pub structures: Bank<Structure>,
    pub tile_types: Bank<TileType>,
    pub terrains: Bank<Terrain>,
    pub unit_types: Bank<UnitType>,
    pub weapons: Bank<Weapon>,
}

/// Loads the bank whose document `manifest` names under `key`. Paths are
/// relative to `dir`.
fn load_bank<T: BankRecord>(
    manifest: &JsonReader<'_>,
    dir: &Path,
    key: &str,
) -> Result<Bank<T>, BankError> {
    match manifest.read::<String>(&[key]) {
        Ok(path) => Bank::load(&dir.join(path)),
        Err(e) => {
            log::warn!("{}: {}; leaving {} empty", manifest.context(), e, T::BANK_NAME);
            Ok(Bank::new())
        }
    }
}

impl Banks {
    /// Loads every bank listed in the manifest at `path`.
    ///
    /// The manifest maps bank keys (`countries`, `unitTypes`...) to document
    /// paths relative to the manifest. An unlisted bank stays empty; a
    /// document that cannot be read or parsed fails the whole load.
    pub fn load_manifest(path: &Path) -> Result<Banks, BankError> {
        let text = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: Value = serde_json::from_str(&text).map_err(|source| BankError::Json {
            origin: path.display().to_string(),
            source,
        })?;
        if !root.is_object() {
            return Err(BankError::NotAnObject {
                bank: "manifest",
                found: type_name(&root),
            });
        }

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let context = path.display().to_string();
        let manifest = JsonReader::new(&root, &context);
        Ok(Banks {
            commanders: load_bank(&manifest, dir, "commanders")?,
            weathers: load_bank(&manifest, dir, "weathers")?,
            environments: load_bank(&manifest, dir, "environments")?,
            countries: load_bank(&manifest, dir, "countries")?,
            movement_types: load_bank(&manifest, dir, "movementTypes")?,
            structures: load_bank(&manifest, dir, "structures")?,
            tile_types: load_bank(&manifest, dir, "tileTypes")?,
            terrains: load_bank(&manifest, dir, "terrains")?,
            unit_types: load_bank(&manifest, dir, "unitTypes")?,
            weapons: load_bank(&manifest, dir, "weapons")?,
        })
    }
}

/// A fully resolved data set.
///
/// Only constructible by resolving a set of banks, so readers never see
/// a partially resolved graph. Shareable across threads once built.
#[derive(Debug, Clone)]
pub struct GameData {
    banks: Banks,
    links: Links,
}

impl GameData {
    /// Runs every resolution pass over `banks`.
    pub fn resolve(banks: Banks) -> GameData {
        let links = Links::build(&banks);
        GameData { banks, links }
    }

    /// Loads the manifest at `path`, checks country turn orders, and resolves
    /// the result.
    pub fn load(path: &Path, config: &LoadConfig) -> Result<GameData, BankError> {
        let banks = Banks::load_manifest(path)?;
        if !check_country_turn_order_ids(&banks.countries) {
            if config.reject_invalid_turn_orders {
                return Err(BankError::InvalidTurnOrders);
            }
            log::warn!("Country turn order IDs are invalid; loading anyway");
        }
        Ok(GameData::resolve(banks))
    }

    /// Recomputes the resolved state from scratch and swaps it in.
    pub fn relink(&mut self) {
        self.links = Links::build(&self.banks);
    }

    pub fn banks(&self) -> &Banks {
        &self.banks
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Looks up a record that must exist.
    pub fn get<T: Linkable>(&self, name: &str) -> Result<Linked<'_, T>, BankError> {
        let bank = T::bank(&self.banks);
        bank.require(name)?;
        self.find(name).ok_or_else(|| BankError::NotFound {
            bank: T::BANK_NAME,
            name: name.to_owned(),
        })
    }

    /// Looks up a record that may be missing.
    pub fn find<T: Linkable>(&self, name: &str) -> Option<Linked<'_, T>> {
        T::bank(&self.banks)
            .index_of(name)
            .and_then(|index| self.at(index))
    }

    pub fn at<T: Linkable>(&self, index: BankIndex<T>) -> Option<Linked<'_, T>> {
        let record = T::bank(&self.banks).at(index)?;
        let links = T::links(&self.links, index.get())?;
        Some(Linked::new(self, index, record, links))
    }

    /// Every record of a bank in insertion order.
    pub fn iter<T: Linkable>(&self) -> impl Iterator<Item = Linked<'_, T>> {
        T::bank(&self.banks)
            .indexed()
            .filter_map(|(index, _)| self.at(index))
    }
}
