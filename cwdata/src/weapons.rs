use std::collections::HashMap;
use std::ops::RangeInclusive;

use cwdata_derive::Identified;
use cwjson::{FromJson, JsonReader, type_name};
use serde_json::Value;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;
use crate::merge::merge_weapon_json;

/// A weapon a unit type can be armed with.
#[derive(Debug, Clone, Identified)]
pub struct Weapon {
    script_name: String,
    common: CommonProperties,
    max_ammo: i32,
    low_range: u32,
    high_range: u32,
    can_attack_after_moving: bool,
    can_counterattack_directly: bool,
    can_counterattack_indirectly: bool,
    units: HashMap<String, i32>,
    hidden_units: HashMap<String, i32>,
    terrains: HashMap<String, i32>,
    /// The document this weapon was decoded from, kept for override merges.
    json: Value,
}

impl Weapon {
    /// Maximum ammo. Negative means the weapon never runs out.
    pub fn max_ammo(&self) -> i32 {
        self.max_ammo
    }

    pub fn has_infinite_ammo(&self) -> bool {
        self.max_ammo < 0
    }

    pub fn low_range(&self) -> u32 {
        self.low_range
    }

    pub fn high_range(&self) -> u32 {
        self.high_range
    }

    /// Distances, in tiles, this weapon can fire at.
    pub fn range(&self) -> RangeInclusive<u32> {
        self.low_range..=self.high_range
    }

    pub fn can_attack_after_moving(&self) -> bool {
        self.can_attack_after_moving
    }

    pub fn can_counterattack_directly(&self) -> bool {
        self.can_counterattack_directly
    }

    pub fn can_counterattack_indirectly(&self) -> bool {
        self.can_counterattack_indirectly
    }

    pub fn can_attack_unit(&self, unit_type: &str, hidden: bool) -> bool {
        self.unit_table(hidden).contains_key(unit_type)
    }

    /// Base damage against a unit type, `None` if it cannot be attacked.
    pub fn base_damage_unit(&self, unit_type: &str, hidden: bool) -> Option<i32> {
        self.unit_table(hidden).get(unit_type).copied()
    }

    pub fn can_attack_terrain(&self, terrain: &str) -> bool {
        self.terrains.contains_key(terrain)
    }

    /// Base damage against a terrain, `None` if it cannot be attacked.
    pub fn base_damage_terrain(&self, terrain: &str) -> Option<i32> {
        self.terrains.get(terrain).copied()
    }

    pub fn units(&self) -> &HashMap<String, i32> {
        &self.units
    }

    pub fn hidden_units(&self) -> &HashMap<String, i32> {
        &self.hidden_units
    }

    pub fn terrains(&self) -> &HashMap<String, i32> {
        &self.terrains
    }

    /// The JSON document this weapon was built from.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Builds a new weapon from this one combined with an override document.
    ///
    /// `context` names the unit type doing the override, for logging.
    pub fn merged(&self, over: &Value, context: &str) -> Weapon {
        let merged = merge_weapon_json(&self.json, over, context);
        let context = format!("{}.{}", context, self.script_name);
        Weapon::from_json(
            &self.script_name,
            &JsonReader::new(&merged, &context),
            &mut LoadContext::new(),
        )
    }

    fn unit_table(&self, hidden: bool) -> &HashMap<String, i32> {
        if hidden {
            &self.hidden_units
        } else {
            &self.units
        }
    }
}

/// `true` copies the visible damage for the same unit type, an integer is
/// used as is.
fn read_hidden_units(json: &JsonReader<'_>, units: &HashMap<String, i32>) -> HashMap<String, i32> {
    let mut hidden_units = HashMap::new();
    let Some(found) = json.lookup(&["hiddenunits"]) else {
        return hidden_units;
    };
    let Some(table) = found.as_object() else {
        log::warn!(
            "{}: \"hiddenunits\" is of type {}, expected object; ignoring it",
            json.context(),
            type_name(found)
        );
        return hidden_units;
    };

    for (unit_type, value) in table {
        match value {
            Value::Bool(true) => {
                if let Some(&damage) = units.get(unit_type) {
                    hidden_units.insert(unit_type.clone(), damage);
                }
            }
            Value::Bool(false) => {}
            other => match i32::from_json(other) {
                Ok(damage) => {
                    hidden_units.insert(unit_type.clone(), damage);
                }
                Err(_) => log::warn!(
                    "{}: value at {{\"hiddenunits\", \"{}\"}} is of type {}, expected integer or boolean; skipping it",
                    json.context(),
                    unit_type,
                    type_name(other)
                ),
            },
        }
    }
    hidden_units
}

impl BankRecord for Weapon {
    const BANK_NAME: &'static str = "weapons";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut max_ammo = 0;
        json.optional(&mut max_ammo, &["ammo"]);

        let mut low_range = 1u32;
        let mut high_range = 1u32;
        json.optional(&mut low_range, &["lowrange"]);
        json.optional(&mut high_range, &["highrange"]);
        if low_range > high_range {
            std::mem::swap(&mut low_range, &mut high_range);
        }

        let mut can_attack_after_moving = true;
        let mut can_counterattack_directly = true;
        let mut can_counterattack_indirectly = false;
        json.optional(&mut can_attack_after_moving, &["canattackaftermoving"]);
        json.optional(&mut can_counterattack_directly, &["cancounterattackdirectly"]);
        json.optional(&mut can_counterattack_indirectly, &["cancounterattackindirectly"]);

        let mut units = HashMap::new();
        json.map(&mut units, &["units"]);
        let mut terrains = HashMap::new();
        json.map(&mut terrains, &["terrains"]);
        let hidden_units = read_hidden_units(json, &units);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            max_ammo,
            low_range,
            high_range,
            can_attack_after_moving,
            can_counterattack_directly,
            can_counterattack_indirectly,
            units,
            hidden_units,
            terrains,
            json: json.value().clone(),
        }
    }
}
