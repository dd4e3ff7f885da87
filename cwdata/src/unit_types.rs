use std::collections::HashMap;
use std::sync::Arc;

use cwdata_derive::Identified;
use cwjson::{JsonReader, type_name};
use serde_json::Value;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;
use crate::movement_types::MovementType;
use crate::terrains::Terrain;
use crate::turn_order::CountryKey;
use crate::view::Linked;
use crate::weapons::Weapon;

/// Internal HP units per displayed HP point.
pub const HP_GRANULARITY: u32 = 10;

/// Converts internal HP to the value shown to players, rounding up so a unit
/// with any HP left never shows zero.
pub fn displayed_hp(internal: u32) -> u32 {
    internal.div_ceil(HP_GRANULARITY)
}

/// Converts displayed HP to internal HP.
pub fn internal_hp(displayed: u32) -> u32 {
    displayed.saturating_mul(HP_GRANULARITY)
}

/// Spritesheets used to draw a unit on the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSpriteSheets {
    pub idle: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub selected: String,
}

impl UnitSpriteSheets {
    fn from_json(json: &JsonReader<'_>) -> Self {
        let mut sheets = UnitSpriteSheets::default();
        json.optional(&mut sheets.idle, &["spritesheets", "idle"]);
        json.optional(&mut sheets.up, &["spritesheets", "up"]);
        json.optional(&mut sheets.down, &["spritesheets", "down"]);
        json.optional(&mut sheets.left, &["spritesheets", "left"]);
        json.optional(&mut sheets.right, &["spritesheets", "right"]);
        json.optional(&mut sheets.selected, &["spritesheets", "selected"]);
        sheets
    }
}

/// Sound keys a unit plays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSounds {
    pub hide: String,
    pub unhide: String,
    pub destroy: String,
    pub movement: String,
    pub movement_hidden: String,
    /// Per-terrain replacements for `movement`.
    pub terrains: HashMap<String, String>,
}

impl UnitSounds {
    fn from_json(json: &JsonReader<'_>) -> Self {
        let mut sounds = UnitSounds::default();
        json.optional(&mut sounds.hide, &["sounds", "hide"]);
        json.optional(&mut sounds.unhide, &["sounds", "unhide"]);
        json.optional(&mut sounds.destroy, &["sounds", "destroy"]);
        json.optional(&mut sounds.movement, &["sounds", "move"]);
        json.optional(&mut sounds.movement_hidden, &["sounds", "movehidden"]);
        json.map(&mut sounds.terrains, &["sounds", "terrains"]);
        sounds
    }

    /// Sound played when moving over `terrain`.
    pub fn movement_on(&self, terrain: &str) -> &str {
        self.terrains
            .get(terrain)
            .map(String::as_str)
            .unwrap_or(&self.movement)
    }
}

/// A weapon a unit type is armed with, and how it differs from the base
/// weapon of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponOverride {
    pub weapon: String,
    pub overrides: Value,
}

#[derive(Debug, Clone, Identified)]
pub struct UnitType {
    script_name: String,
    common: CommonProperties,
    movement_type: String,
    price: u32,
    max_fuel: i32,
    max_hp: u32,
    movement_points: u32,
    vision: u32,
    pictures: HashMap<String, String>,
    sprites: HashMap<String, String>,
    destroyed_sprites: HashMap<String, String>,
    capturing_sprites: HashMap<String, String>,
    captured_sprites: HashMap<String, String>,
    sprite_sheets: UnitSpriteSheets,
    can_load: Vec<String>,
    load_limit: u32,
    turn_start_priority: u32,
    can_capture: Vec<String>,
    can_unload_from: Vec<String>,
    can_hide: bool,
    weapons: Vec<WeaponOverride>,
    ignores_defence: bool,
    sounds: UnitSounds,
}

/// Looks up a per-country sprite.
fn sprite<'a>(map: &'a HashMap<String, String>, country: &str) -> Option<&'a str> {
    map.get(country).map(String::as_str)
}

impl UnitType {
    /// Name of this unit type's movement type, as written in the data.
    pub fn movement_type_name(&self) -> &str {
        &self.movement_type
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    /// Maximum fuel. Negative means the unit never runs out.
    pub fn max_fuel(&self) -> i32 {
        self.max_fuel
    }

    pub fn has_infinite_fuel(&self) -> bool {
        self.max_fuel < 0
    }

    /// Maximum HP in internal units, see [`HP_GRANULARITY`].
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Maximum HP as shown to players.
    pub fn max_displayed_hp(&self) -> u32 {
        displayed_hp(self.max_hp)
    }

    pub fn movement_points(&self) -> u32 {
        self.movement_points
    }

    pub fn vision(&self) -> u32 {
        self.vision
    }

    pub fn picture(&self, country: &str) -> Option<&str> {
        sprite(&self.pictures, country)
    }

    /// Map sprite for `country`.
    pub fn sprite(&self, country: &str) -> Option<&str> {
        sprite(&self.sprites, country)
    }

    pub fn destroyed_sprite(&self, country: &str) -> Option<&str> {
        sprite(&self.destroyed_sprites, country)
    }

    pub fn capturing_sprite(&self, country: &str) -> Option<&str> {
        sprite(&self.capturing_sprites, country)
    }

    pub fn captured_sprite(&self, country: &str) -> Option<&str> {
        sprite(&self.captured_sprites, country)
    }

    pub(crate) fn pictures(&self) -> &HashMap<String, String> {
        &self.pictures
    }

    pub(crate) fn sprites(&self) -> &HashMap<String, String> {
        &self.sprites
    }

    pub(crate) fn destroyed_sprites(&self) -> &HashMap<String, String> {
        &self.destroyed_sprites
    }

    pub(crate) fn capturing_sprites(&self) -> &HashMap<String, String> {
        &self.capturing_sprites
    }

    pub(crate) fn captured_sprites(&self) -> &HashMap<String, String> {
        &self.captured_sprites
    }

    pub fn sprite_sheets(&self) -> &UnitSpriteSheets {
        &self.sprite_sheets
    }

    /// Names of the unit types this one can load, as written in the data.
    pub fn can_load_names(&self) -> &[String] {
        &self.can_load
    }

    pub fn load_limit(&self) -> u32 {
        self.load_limit
    }

    /// Higher priorities are processed first at the start of a turn.
    pub fn turn_start_priority(&self) -> u32 {
        self.turn_start_priority
    }

    pub fn can_capture_names(&self) -> &[String] {
        &self.can_capture
    }

    pub fn can_unload_from_names(&self) -> &[String] {
        &self.can_unload_from
    }

    pub fn can_hide(&self) -> bool {
        self.can_hide
    }

    /// The weapon loadout as written, in precedence order.
    pub fn weapon_overrides(&self) -> &[WeaponOverride] {
        &self.weapons
    }

    pub fn ignores_defence(&self) -> bool {
        self.ignores_defence
    }

    pub fn sounds(&self) -> &UnitSounds {
        &self.sounds
    }
}

impl BankRecord for UnitType {
    const BANK_NAME: &'static str = "unit types";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut movement_type = String::new();
        let mut price = 0;
        let mut max_fuel = 0;
        let mut max_hp = 0u32;
        let mut movement_points = 0;
        let mut vision = 0;
        json.required(&mut movement_type, &["movetype"]);
        json.required(&mut price, &["price"]);
        json.required(&mut max_fuel, &["fuel"]);
        json.required(&mut max_hp, &["hp"]);
        json.required(&mut movement_points, &["mp"]);
        json.required(&mut vision, &["vision"]);

        let hp_ceiling = i32::MAX as u32 / HP_GRANULARITY;
        if max_hp > hp_ceiling {
            log::warn!(
                "{}: hp {} is too large; capping it at {}",
                json.context(),
                max_hp,
                hp_ceiling
            );
            max_hp = hp_ceiling;
        }

        let mut pictures = HashMap::new();
        let mut sprites = HashMap::new();
        let mut destroyed_sprites = HashMap::new();
        let mut capturing_sprites = HashMap::new();
        let mut captured_sprites = HashMap::new();
        json.map(&mut pictures, &["pictures"]);
        json.map(&mut sprites, &["sprites"]);
        json.map(&mut destroyed_sprites, &["destroyedsprites"]);
        json.map(&mut capturing_sprites, &["capturingsprites"]);
        json.map(&mut captured_sprites, &["capturedsprites"]);

        let mut can_load = Vec::new();
        let mut can_capture = Vec::new();
        let mut can_unload_from = Vec::new();
        json.list(&mut can_load, &["canload"]);
        json.list(&mut can_capture, &["cancapture"]);
        json.list(&mut can_unload_from, &["canunloadfrom"]);

        let mut load_limit = 0;
        let mut turn_start_priority = 0;
        let mut can_hide = false;
        let mut ignores_defence = false;
        json.optional(&mut load_limit, &["loadlimit"]);
        json.optional(&mut turn_start_priority, &["turnstartpriority"]);
        json.optional(&mut can_hide, &["canhide"]);
        json.optional(&mut ignores_defence, &["ignoresdefence"]);

        let mut weapons = Vec::new();
        if let Some(found) = json.lookup(&["weapons"]) {
            match found.as_object() {
                Some(loadout) => {
                    weapons.extend(loadout.iter().map(|(name, overrides)| WeaponOverride {
                        weapon: name.clone(),
                        overrides: overrides.clone(),
                    }))
                }
                None => log::warn!(
                    "{}: \"weapons\" is of type {}, expected object; ignoring it",
                    json.context(),
                    type_name(found)
                ),
            }
        }

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            movement_type,
            price,
            max_fuel,
            max_hp: internal_hp(max_hp),
            movement_points,
            vision,
            pictures,
            sprites,
            destroyed_sprites,
            capturing_sprites,
            captured_sprites,
            sprite_sheets: UnitSpriteSheets::from_json(json),
            can_load,
            load_limit,
            turn_start_priority,
            can_capture,
            can_unload_from,
            can_hide,
            weapons,
            ignores_defence,
            sounds: UnitSounds::from_json(json),
        }
    }
}

impl<'a> Linked<'a, UnitType> {
    pub fn movement_type(&self) -> Option<Linked<'a, MovementType>> {
        self.links()
            .movement_type
            .and_then(|index| self.data().at(index))
    }

    /// Unit types this one can load, in declared order, unknown names left out.
    pub fn loadable_unit_types(&self) -> impl Iterator<Item = Linked<'a, UnitType>> + use<'a> {
        let data = self.data();
        self.links()
            .can_load
            .iter()
            .filter_map(move |&index| data.at(index))
    }

    pub fn capturable_terrains(&self) -> impl Iterator<Item = Linked<'a, Terrain>> + use<'a> {
        let data = self.data();
        self.links()
            .can_capture
            .iter()
            .filter_map(move |&index| data.at(index))
    }

    pub fn unloadable_terrains(&self) -> impl Iterator<Item = Linked<'a, Terrain>> + use<'a> {
        let data = self.data();
        self.links()
            .can_unload_from
            .iter()
            .filter_map(move |&index| data.at(index))
    }

    /// Whether this unit type can load `unit_type`.
    pub fn can_load(&self, unit_type: &str) -> bool {
        self.data()
            .banks()
            .unit_types
            .index_of(unit_type)
            .is_some_and(|index| self.links().can_load.contains(&index))
    }

    pub fn can_capture(&self, terrain: &str) -> bool {
        self.data()
            .banks()
            .terrains
            .index_of(terrain)
            .is_some_and(|index| self.links().can_capture.contains(&index))
    }

    pub fn can_unload_from(&self, terrain: &str) -> bool {
        self.data()
            .banks()
            .terrains
            .index_of(terrain)
            .is_some_and(|index| self.links().can_unload_from.contains(&index))
    }

    /// Effective weapons, base weapons combined with this unit type's
    /// overrides, in precedence order.
    pub fn weapons(&self) -> impl Iterator<Item = &'a Arc<Weapon>> + use<'a> {
        self.links().weapons.values()
    }

    /// Effective weapon named `name`.
    pub fn weapon(&self, name: &str) -> Option<&'a Arc<Weapon>> {
        self.links().weapons.get(name)
    }

    pub fn weapon_count(&self) -> usize {
        self.links().weapons.len()
    }

    /// The first weapon in precedence order that uses ammo.
    pub fn first_weapon_with_finite_ammo(&self) -> Option<&'a Arc<Weapon>> {
        self.links()
            .weapons
            .values()
            .find(|weapon| !weapon.has_infinite_ammo())
    }

    pub fn picture<'k>(&self, country: impl Into<CountryKey<'k>>) -> Option<&'a str> {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.picture(name),
            CountryKey::TurnOrder(id) => self.links().pictures.get(&id).map(String::as_str),
        }
    }

    pub fn sprite<'k>(&self, country: impl Into<CountryKey<'k>>) -> Option<&'a str> {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.sprite(name),
            CountryKey::TurnOrder(id) => self.links().sprites.get(&id).map(String::as_str),
        }
    }

    pub fn destroyed_sprite<'k>(&self, country: impl Into<CountryKey<'k>>) -> Option<&'a str> {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.destroyed_sprite(name),
            CountryKey::TurnOrder(id) => {
                self.links().destroyed_sprites.get(&id).map(String::as_str)
            }
        }
    }

    pub fn capturing_sprite<'k>(&self, country: impl Into<CountryKey<'k>>) -> Option<&'a str> {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.capturing_sprite(name),
            CountryKey::TurnOrder(id) => {
                self.links().capturing_sprites.get(&id).map(String::as_str)
            }
        }
    }

    pub fn captured_sprite<'k>(&self, country: impl Into<CountryKey<'k>>) -> Option<&'a str> {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.captured_sprite(name),
            CountryKey::TurnOrder(id) => {
                self.links().captured_sprites.get(&id).map(String::as_str)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Bank;
    use serde_json::json;

    fn unit(doc: Value) -> Arc<UnitType> {
        let bank = Bank::<UnitType>::from_value(&json!({ "Unit": doc })).unwrap();
        Arc::clone(bank.require("Unit").unwrap())
    }

    #[test]
    fn test_hp_conversions() {
        assert_eq!(displayed_hp(100), 10);
        assert_eq!(displayed_hp(91), 10);
        assert_eq!(displayed_hp(90), 9);
        assert_eq!(displayed_hp(0), 0);
        assert_eq!(internal_hp(7), 70);
        assert_eq!(internal_hp(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_unit_type() {
        let tank = unit(json!({
            "movetype": "Treads",
            "price": 7000,
            "fuel": 70,
            "hp": 10,
            "mp": 6,
            "vision": 3,
            "sprites": { "Orange Star": "ostank" },
            "spritesheets": { "idle": "unit.idle", "selected": "unit.selected" },
            "canload": ["Infantry", 4, "Mech"],
            "turnstartpriority": 2,
            "weapons": { "Cannon": { "ammo": 6 }, "MG": {} },
            "sounds": { "move": "tread", "terrains": { "Sea": "splash" } }
        }));

        assert_eq!(tank.movement_type_name(), "Treads");
        assert_eq!(tank.price(), 7000);
        assert!(!tank.has_infinite_fuel());
        assert_eq!(tank.max_hp(), 100);
        assert_eq!(tank.max_displayed_hp(), 10);
        assert_eq!(tank.sprite("Orange Star"), Some("ostank"));
        assert_eq!(tank.sprite("Blue Moon"), None);
        assert_eq!(tank.sprite_sheets().idle, "unit.idle");
        assert_eq!(tank.sprite_sheets().up, "");
        assert_eq!(tank.can_load_names(), ["Infantry", "Mech"]);
        assert_eq!(tank.turn_start_priority(), 2);
        assert_eq!(tank.sounds().movement_on("Sea"), "splash");
        assert_eq!(tank.sounds().movement_on("Plains"), "tread");

        let loadout: Vec<_> = tank
            .weapon_overrides()
            .iter()
            .map(|w| w.weapon.as_str())
            .collect();
        assert_eq!(loadout, ["Cannon", "MG"]);
        assert_eq!(tank.weapon_overrides()[0].overrides, json!({ "ammo": 6 }));
    }

    #[test]
    fn test_hp_is_capped_before_scaling() {
        let unit = unit(json!({ "hp": 4_000_000_000u32, "fuel": -1 }));
        assert_eq!(unit.max_hp(), i32::MAX as u32 / HP_GRANULARITY * HP_GRANULARITY);
        assert!(unit.has_infinite_fuel());
    }
}
