//! The resolved overlay: cross references turned into bank indices, and
//! per-country maps re-keyed by turn order.
//!
//! Records themselves never change once loaded. Everything a resolution pass
//! computes lives here instead, in vectors parallel to the banks, so the whole
//! overlay can be rebuilt from scratch and swapped in at once.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::bank::{Bank, BankIndex, BankRecord};
use crate::common::Identified;
use crate::game_data::Banks;
use crate::membership::{is_tile_paintable, structure_membership};
use crate::movement_types::MovementType;
use crate::structures::{Structure, StructureTile};
use crate::terrains::Terrain;
use crate::tile_types::TileType;
use crate::turn_order::{ArmyId, rekey_by_turn_order};
use crate::unit_types::UnitType;
use crate::weapons::Weapon;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainLinks {
    pub(crate) primary_tile_type: Option<BankIndex<TileType>>,
    pub(crate) pictures: HashMap<ArmyId, String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileTypeLinks {
    pub(crate) terrain: Option<BankIndex<Terrain>>,
    pub(crate) structures: Vec<BankIndex<Structure>>,
    pub(crate) paintable: bool,
    pub(crate) owned_tiles: HashMap<ArmyId, String>,
    pub(crate) owned_properties: HashMap<ArmyId, String>,
}

#[derive(Debug, Clone, Default)]
pub struct UnitTypeLinks {
    pub(crate) movement_type: Option<BankIndex<MovementType>>,
    pub(crate) can_load: Vec<BankIndex<UnitType>>,
    pub(crate) can_capture: Vec<BankIndex<Terrain>>,
    pub(crate) can_unload_from: Vec<BankIndex<Terrain>>,
    pub(crate) weapons: IndexMap<String, Arc<Weapon>>,
    pub(crate) pictures: HashMap<ArmyId, String>,
    pub(crate) sprites: HashMap<ArmyId, String>,
    pub(crate) destroyed_sprites: HashMap<ArmyId, String>,
    pub(crate) capturing_sprites: HashMap<ArmyId, String>,
    pub(crate) captured_sprites: HashMap<ArmyId, String>,
}

// Weapons compare equal by name alone, so merged weapons are compared by the
// documents they were decoded from.
impl PartialEq for UnitTypeLinks {
    fn eq(&self, other: &Self) -> bool {
        let same_weapons = self.weapons.len() == other.weapons.len()
            && self
                .weapons
                .iter()
                .zip(&other.weapons)
                .all(|((a_name, a), (b_name, b))| a_name == b_name && a.json() == b.json());

        same_weapons
            && self.movement_type == other.movement_type
            && self.can_load == other.can_load
            && self.can_capture == other.can_capture
            && self.can_unload_from == other.can_unload_from
            && self.pictures == other.pictures
            && self.sprites == other.sprites
            && self.destroyed_sprites == other.destroyed_sprites
            && self.capturing_sprites == other.capturing_sprites
            && self.captured_sprites == other.captured_sprites
    }
}

/// A structure cell's tile types as bank indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTile {
    pub(crate) tile: Option<BankIndex<TileType>>,
    pub(crate) destroyed: Option<BankIndex<TileType>>,
    pub(crate) deleted: Option<BankIndex<TileType>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureLinks {
    pub(crate) root: ResolvedTile,
    pub(crate) dependents: Vec<ResolvedTile>,
    pub(crate) owned_icons: HashMap<ArmyId, String>,
}

/// Resolved state for every linked bank, indexed like the banks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    pub(crate) terrains: Vec<TerrainLinks>,
    pub(crate) tile_types: Vec<TileTypeLinks>,
    pub(crate) unit_types: Vec<UnitTypeLinks>,
    pub(crate) structures: Vec<StructureLinks>,
}

/// Resolves `name` in `bank`, logging a miss. `owner` names the record doing
/// the lookup.
fn resolve<T: BankRecord>(bank: &Bank<T>, name: &str, owner: &str) -> Option<BankIndex<T>> {
    let index = bank.index_of(name);
    if index.is_none() {
        log::debug!(
            "{}: no {} entry named \"{}\"; leaving it unresolved",
            owner,
            T::BANK_NAME,
            name
        );
    }
    index
}

/// Resolves a list of names, keeping declared order and dropping unknown ones.
fn resolve_all<T: BankRecord>(
    bank: &Bank<T>,
    names: &[String],
    owner: &str,
) -> Vec<BankIndex<T>> {
    names
        .iter()
        .filter_map(|name| resolve(bank, name, owner))
        .collect()
}

fn resolve_tile(tile_types: &Bank<TileType>, tile: &StructureTile, owner: &str) -> ResolvedTile {
    ResolvedTile {
        tile: resolve(tile_types, &tile.tile, owner),
        destroyed: tile
            .destroyed
            .as_deref()
            .and_then(|name| resolve(tile_types, name, owner)),
        deleted: tile
            .deleted
            .as_deref()
            .and_then(|name| resolve(tile_types, name, owner)),
    }
}

impl Links {
    /// Runs every resolution pass over `banks`.
    ///
    /// The result depends on nothing but the banks, so building twice from
    /// the same banks gives equal overlays.
    pub fn build(banks: &Banks) -> Links {
        let tile_types = Self::tile_type_pass(banks);
        let terrains = Self::terrain_pass(banks, &tile_types);
        let unit_types = Self::unit_type_pass(banks);
        let structures = Self::structure_pass(banks);
        Links {
            terrains,
            tile_types,
            unit_types,
            structures,
        }
    }

    fn tile_type_pass(banks: &Banks) -> Vec<TileTypeLinks> {
        let membership = structure_membership(&banks.tile_types, &banks.structures);
        banks
            .tile_types
            .iter()
            .zip(membership)
            .map(|((name, tile_type), structures)| TileTypeLinks {
                terrain: resolve(&banks.terrains, tile_type.terrain_name(), name),
                paintable: is_tile_paintable(&structures, tile_type.always_paintable()),
                structures,
                owned_tiles: rekey_by_turn_order(tile_type.owned_tiles(), &banks.countries),
                owned_properties: rekey_by_turn_order(
                    tile_type.owned_properties(),
                    &banks.countries,
                ),
            })
            .collect()
    }

    /// Needs the tile type pass for paintability.
    fn terrain_pass(banks: &Banks, tile_types: &[TileTypeLinks]) -> Vec<TerrainLinks> {
        banks
            .terrains
            .iter()
            .map(|(name, terrain)| {
                let primary_tile_type = terrain.primary_tile_type_name().and_then(|tile_name| {
                    let index = resolve(&banks.tile_types, tile_name, name)?;
                    let tile_type = banks.tile_types.at(index)?;
                    if tile_type.terrain_name() != terrain.script_name() {
                        log::debug!(
                            "{}: primary tile type \"{}\" belongs to terrain \"{}\"",
                            name,
                            tile_name,
                            tile_type.terrain_name()
                        );
                        return None;
                    }
                    tile_types
                        .get(index.get())
                        .is_some_and(|links| links.paintable)
                        .then_some(index)
                });
                TerrainLinks {
                    primary_tile_type,
                    pictures: rekey_by_turn_order(terrain.pictures(), &banks.countries),
                }
            })
            .collect()
    }

    fn unit_type_pass(banks: &Banks) -> Vec<UnitTypeLinks> {
        banks
            .unit_types
            .iter()
            .map(|(name, unit_type)| {
                let context = format!("{}.{}", UnitType::BANK_NAME, name);
                let mut weapons = IndexMap::new();
                for loadout in unit_type.weapon_overrides() {
                    match banks.weapons.get(&loadout.weapon) {
                        Some(base) => {
                            let weapon = base.merged(&loadout.overrides, &context);
                            weapons.insert(loadout.weapon.clone(), Arc::new(weapon));
                        }
                        None => log::warn!(
                            "{}: weapon \"{}\" is not in the weapon bank; skipping it",
                            context,
                            loadout.weapon
                        ),
                    }
                }

                let countries = &banks.countries;
                UnitTypeLinks {
                    movement_type: resolve(
                        &banks.movement_types,
                        unit_type.movement_type_name(),
                        name,
                    ),
                    can_load: resolve_all(&banks.unit_types, unit_type.can_load_names(), name),
                    can_capture: resolve_all(&banks.terrains, unit_type.can_capture_names(), name),
                    can_unload_from: resolve_all(
                        &banks.terrains,
                        unit_type.can_unload_from_names(),
                        name,
                    ),
                    weapons,
                    pictures: rekey_by_turn_order(unit_type.pictures(), countries),
                    sprites: rekey_by_turn_order(unit_type.sprites(), countries),
                    destroyed_sprites: rekey_by_turn_order(unit_type.destroyed_sprites(), countries),
                    capturing_sprites: rekey_by_turn_order(unit_type.capturing_sprites(), countries),
                    captured_sprites: rekey_by_turn_order(unit_type.captured_sprites(), countries),
                }
            })
            .collect()
    }

    fn structure_pass(banks: &Banks) -> Vec<StructureLinks> {
        banks
            .structures
            .iter()
            .map(|(name, structure)| StructureLinks {
                root: resolve_tile(&banks.tile_types, structure.root(), name),
                dependents: structure
                    .dependents()
                    .iter()
                    .map(|dependent| resolve_tile(&banks.tile_types, &dependent.tile, name))
                    .collect(),
                owned_icons: rekey_by_turn_order(structure.owned_icons(), &banks.countries),
            })
            .collect()
    }
}
