use std::collections::HashMap;

use cwdata_derive::Identified;
use cwjson::JsonReader;

use crate::bank::{BankRecord, LoadContext};
use crate::structures::Structure;
use crate::terrains::Terrain;
use crate::turn_order::CountryKey;
use crate::view::Linked;

/// A tile's appearance for one terrain type.
///
/// Several tile types may share a terrain, e.g. the different shapes of a
/// road.
#[derive(Debug, Clone, Identified)]
pub struct TileType {
    script_name: String,
    terrain: String,
    neutral_tile: String,
    owned_tiles: HashMap<String, String>,
    neutral_property: String,
    owned_properties: HashMap<String, String>,
    always_paintable: bool,
}

impl TileType {
    /// Name of the terrain this tile type draws, as written in the data.
    pub fn terrain_name(&self) -> &str {
        &self.terrain
    }

    /// Sprite shown when nobody owns the tile.
    pub fn neutral_tile(&self) -> &str {
        &self.neutral_tile
    }

    /// Sprite shown when `country` owns the tile, falling back to the neutral
    /// sprite.
    pub fn owned_tile(&self, country: &str) -> &str {
        self.owned_tiles
            .get(country)
            .map(String::as_str)
            .unwrap_or(&self.neutral_tile)
    }

    pub(crate) fn owned_tiles(&self) -> &HashMap<String, String> {
        &self.owned_tiles
    }

    /// Property sprite shown on capturable tiles nobody owns.
    pub fn neutral_property(&self) -> &str {
        &self.neutral_property
    }

    /// Property sprite for `country`, falling back to the neutral one.
    pub fn owned_property(&self, country: &str) -> &str {
        self.owned_properties
            .get(country)
            .map(String::as_str)
            .unwrap_or(&self.neutral_property)
    }

    pub(crate) fn owned_properties(&self) -> &HashMap<String, String> {
        &self.owned_properties
    }

    /// Paintable even when part of a structure.
    pub fn always_paintable(&self) -> bool {
        self.always_paintable
    }
}

impl BankRecord for TileType {
    const BANK_NAME: &'static str = "tile types";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut terrain = String::new();
        let mut neutral_tile = String::new();
        json.required(&mut terrain, &["type"]);
        json.required(&mut neutral_tile, &["neutral"]);

        let mut owned_tiles = HashMap::new();
        json.map(&mut owned_tiles, &["tiles"]);
        let mut neutral_property = String::new();
        json.optional(&mut neutral_property, &["neutralproperty"]);
        let mut owned_properties = HashMap::new();
        json.map(&mut owned_properties, &["properties"]);
        let mut always_paintable = false;
        json.optional(&mut always_paintable, &["alwayspaintable"]);

        Self {
            script_name: script_name.to_owned(),
            terrain,
            neutral_tile,
            owned_tiles,
            neutral_property,
            owned_properties,
            always_paintable,
        }
    }
}

impl<'a> Linked<'a, TileType> {
    /// The terrain this tile type draws, if it exists.
    pub fn terrain(&self) -> Option<Linked<'a, Terrain>> {
        self.links().terrain.and_then(|index| self.data().at(index))
    }

    /// Every structure this tile type is part of, in structure bank order.
    pub fn structures(&self) -> impl Iterator<Item = Linked<'a, Structure>> + use<'a> {
        let data = self.data();
        self.links()
            .structures
            .iter()
            .filter_map(move |&index| data.at(index))
    }

    /// Whether this tile type can be painted on its own: it is part of no
    /// structure, or it is always paintable.
    pub fn is_paintable(&self) -> bool {
        self.links().paintable
    }

    /// Owned tile sprite for a country given by name or turn order ID.
    pub fn owned_tile<'k>(&self, country: impl Into<CountryKey<'k>>) -> &'a str {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.owned_tile(name),
            CountryKey::TurnOrder(id) => self
                .links()
                .owned_tiles
                .get(&id)
                .map(String::as_str)
                .unwrap_or(record.neutral_tile()),
        }
    }

    /// Owned property sprite for a country given by name or turn order ID.
    pub fn owned_property<'k>(&self, country: impl Into<CountryKey<'k>>) -> &'a str {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.owned_property(name),
            CountryKey::TurnOrder(id) => self
                .links()
                .owned_properties
                .get(&id)
                .map(String::as_str)
                .unwrap_or(record.neutral_property()),
        }
    }
}
