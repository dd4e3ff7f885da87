use std::collections::HashMap;

use cwdata_derive::Identified;
use cwjson::{FromJson, JsonReader, Rejection};
use serde_json::Value;

use crate::bank::{BankRecord, LoadContext};
use crate::common::{CommonProperties, HasCommonProperties};
use crate::tile_types::TileType;
use crate::turn_order::CountryKey;
use crate::view::Linked;

/// How a terrain behaves under fog of war.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FowVisibility {
    /// Visible only when inside an army's vision.
    #[default]
    Normal,
    /// Units on it are hidden unless adjacent.
    Hidden,
    /// Always visible, fog or not.
    Visible,
}

impl FromJson for FowVisibility {
    const EXPECTED: &'static str = "\"normal\", \"hidden\" or \"visible\"";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let text = value.as_str().ok_or(Rejection::WrongType)?;
        match text.to_ascii_lowercase().as_str() {
            "normal" => Ok(FowVisibility::Normal),
            "hidden" => Ok(FowVisibility::Hidden),
            "visible" => Ok(FowVisibility::Visible),
            _ => Err(Rejection::OutOfRange),
        }
    }
}

/// A kind of terrain, e.g. plains or a city.
#[derive(Debug, Clone, Identified)]
pub struct Terrain {
    script_name: String,
    common: CommonProperties,
    max_hp: u32,
    defence: u32,
    move_costs: HashMap<String, i32>,
    pictures: HashMap<String, String>,
    primary_tile_type: Option<String>,
    fow_visibility: FowVisibility,
    show_owner_when_hidden: bool,
}

impl Terrain {
    /// Move cost of terrain that cannot be crossed.
    pub const IMPASSABLE: i32 = -1;

    /// Maximum HP, never above `i32::MAX`.
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn defence(&self) -> u32 {
        self.defence
    }

    /// Movement points needed to enter this terrain, [`Terrain::IMPASSABLE`]
    /// if the movement type has no cost configured.
    pub fn move_cost(&self, movement_type: &str) -> i32 {
        self.move_costs
            .get(movement_type)
            .copied()
            .unwrap_or(Self::IMPASSABLE)
    }

    /// Picture shown for a country's ownership, falling back to the icon.
    pub fn picture(&self, country: &str) -> &str {
        self.pictures
            .get(country)
            .map(String::as_str)
            .unwrap_or_else(|| self.icon_name())
    }

    pub(crate) fn pictures(&self) -> &HashMap<String, String> {
        &self.pictures
    }

    /// Name of the tile type painted when this terrain is selected in an
    /// editor, as written in the data.
    pub fn primary_tile_type_name(&self) -> Option<&str> {
        self.primary_tile_type.as_deref()
    }

    pub fn fow_visibility(&self) -> FowVisibility {
        self.fow_visibility
    }

    pub fn show_owner_when_hidden(&self) -> bool {
        self.show_owner_when_hidden
    }
}

impl BankRecord for Terrain {
    const BANK_NAME: &'static str = "terrains";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut max_hp = 0u32;
        json.required(&mut max_hp, &["hp"]);
        if max_hp > i32::MAX as u32 {
            log::warn!(
                "{}: hp {} is too large; capping it at {}",
                json.context(),
                max_hp,
                i32::MAX
            );
            max_hp = i32::MAX as u32;
        }

        let mut defence = 0u32;
        json.required(&mut defence, &["defence"]);

        let mut move_costs = HashMap::new();
        json.map(&mut move_costs, &["movecosts"]);
        let mut pictures = HashMap::new();
        json.map(&mut pictures, &["pictures"]);

        let mut fow_visibility = FowVisibility::default();
        json.optional(&mut fow_visibility, &["fowvisibility"]);
        let mut show_owner_when_hidden = false;
        json.optional(&mut show_owner_when_hidden, &["showownerwhenhidden"]);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            max_hp,
            defence,
            move_costs,
            pictures,
            primary_tile_type: json.maybe(&["primarytiletype"]),
            fow_visibility,
            show_owner_when_hidden,
        }
    }
}

impl<'a> Linked<'a, Terrain> {
    /// The tile type painted for this terrain, if it exists, points back at
    /// this terrain and is paintable on its own.
    pub fn primary_tile_type(&self) -> Option<Linked<'a, TileType>> {
        self.links()
            .primary_tile_type
            .and_then(|index| self.data().at(index))
    }

    /// Whether this terrain can be painted on its own.
    pub fn is_paintable(&self) -> bool {
        self.links().primary_tile_type.is_some()
    }

    /// Picture for a country given by name or turn order ID, falling back to
    /// the icon.
    pub fn picture<'k>(&self, country: impl Into<CountryKey<'k>>) -> &'a str {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.picture(name),
            CountryKey::TurnOrder(id) => self
                .links()
                .pictures
                .get(&id)
                .map(String::as_str)
                .unwrap_or_else(|| record.icon_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Bank;
    use serde_json::json;

    fn terrains(doc: Value) -> Bank<Terrain> {
        Bank::from_value(&doc).unwrap()
    }

    #[test]
    fn test_minimal_terrain() {
        let bank = terrains(json!({ "Plains": { "hp": 100, "defence": 2, "icon": "plainsicon" } }));
        let plains = bank.require("Plains").unwrap();
        assert_eq!(plains.max_hp(), 100);
        assert_eq!(plains.defence(), 2);
        assert_eq!(plains.move_cost("Infantry"), Terrain::IMPASSABLE);
        assert_eq!(plains.picture("Orange Star"), plains.icon_name());
        assert_eq!(plains.primary_tile_type_name(), None);
        assert_eq!(plains.fow_visibility(), FowVisibility::Normal);
    }

    #[test]
    fn test_move_costs_and_pictures() {
        let bank = terrains(json!({
            "Sea": {
                "hp": 0,
                "defence": 0,
                "movecosts": { "Ship": 1, "Air": 1, "Foot": "no" },
                "pictures": { "Orange Star": "seaos" },
                "primarytiletype": "Sea",
                "fowvisibility": "HIDDEN",
                "showownerwhenhidden": true
            }
        }));
        let sea = bank.require("Sea").unwrap();
        assert_eq!(sea.move_cost("Ship"), 1);
        assert_eq!(sea.move_cost("Foot"), Terrain::IMPASSABLE);
        assert_eq!(sea.picture("Orange Star"), "seaos");
        assert_eq!(sea.primary_tile_type_name(), Some("Sea"));
        assert_eq!(sea.fow_visibility(), FowVisibility::Hidden);
        assert!(sea.show_owner_when_hidden());
    }

    #[test]
    fn test_hp_is_capped() {
        let bank = terrains(json!({ "Wall": { "hp": 4_000_000_000u32, "defence": 0 } }));
        assert_eq!(bank.require("Wall").unwrap().max_hp(), i32::MAX as u32);
    }

    #[test]
    fn test_unknown_fow_visibility() {
        let bank = terrains(json!({ "Fog": { "hp": 1, "defence": 1, "fowvisibility": "murky" } }));
        assert_eq!(
            bank.require("Fog").unwrap().fow_visibility(),
            FowVisibility::Normal
        );
    }
}
