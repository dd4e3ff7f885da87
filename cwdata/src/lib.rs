//! Static game data for Computer Wars.
//!
//! Each kind of record lives in its own [`Bank`], loaded from one JSON
//! document. Records name each other by script name; once every bank is
//! loaded, [`GameData::resolve`] turns those names into bank indices, builds
//! the turn order keyed maps, merges unit type weapon overrides and works out
//! which structures each tile type belongs to.

pub mod bank;
pub mod commanders;
pub mod common;
pub mod config;
pub mod countries;
pub mod environments;
pub mod error;
pub mod game_data;
pub mod links;
pub mod membership;
pub mod merge;
pub mod movement_types;
pub mod structures;
pub mod terrains;
pub mod tile_types;
pub mod turn_order;
pub mod unit_types;
pub mod view;
pub mod weapons;
pub mod weathers;

pub use bank::{Bank, BankIndex, BankRecord, LoadContext};
pub use commanders::Commander;
pub use common::{Colour, CommonProperties, HasCommonProperties, Identified, Offset, ScriptName};
pub use config::LoadConfig;
pub use countries::Country;
pub use environments::Environment;
pub use error::BankError;
pub use game_data::{Banks, GameData};
pub use links::Links;
pub use movement_types::MovementType;
pub use structures::{DependentTile, LinkedTile, Structure, StructureTile};
pub use terrains::{FowVisibility, Terrain};
pub use tile_types::TileType;
pub use turn_order::{ArmyId, CountryKey, check_country_turn_order_ids, rekey_by_turn_order};
pub use unit_types::{HP_GRANULARITY, UnitSounds, UnitSpriteSheets, UnitType, WeaponOverride};
pub use view::{Linkable, Linked};
pub use weapons::Weapon;
pub use weathers::{ParticleLayer, Velocity, Weather};
