use std::collections::{HashMap, HashSet};

use cwdata_derive::Identified;
use cwjson::{JsonReader, type_name};

use crate::bank::{BankRecord, LoadContext};
use crate::common::{CommonProperties, HasCommonProperties, Offset};
use crate::game_data::GameData;
use crate::links::ResolvedTile;
use crate::tile_types::TileType;
use crate::turn_order::CountryKey;
use crate::view::Linked;

/// The tile types one cell of a structure can show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureTile {
    /// Tile type of the intact structure.
    pub tile: String,
    /// Tile type left behind when the structure is destroyed.
    pub destroyed: Option<String>,
    /// Tile type left behind when the structure is deleted.
    pub deleted: Option<String>,
}

impl StructureTile {
    /// All tile type names this cell uses.
    pub fn tile_types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.tile.as_str())
            .chain(self.destroyed.as_deref())
            .chain(self.deleted.as_deref())
    }

    fn contains(&self, tile_type: &str) -> bool {
        self.tile_types().any(|name| name == tile_type)
    }
}

/// A non-root cell of a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentTile {
    /// Position relative to the root tile. Never [`Offset::ROOT`].
    pub offset: Offset,
    pub tile: StructureTile,
}

/// A composite of tiles painted, destroyed and deleted together, e.g. a
/// headquarters or a pipe seam.
#[derive(Debug, Clone, Identified)]
pub struct Structure {
    script_name: String,
    common: CommonProperties,
    root: StructureTile,
    dependents: Vec<DependentTile>,
    owned_icons: HashMap<String, String>,
    paintable: bool,
    keep_units: bool,
    destroyed_long_name: Option<String>,
    destroyed_icon: Option<String>,
}

impl Structure {
    pub fn root(&self) -> &StructureTile {
        &self.root
    }

    /// Dependent tiles in declared order.
    pub fn dependents(&self) -> &[DependentTile] {
        &self.dependents
    }

    /// Icon for `country`, falling back to the neutral icon.
    pub fn owned_icon(&self, country: &str) -> &str {
        self.owned_icons
            .get(country)
            .map(String::as_str)
            .unwrap_or_else(|| self.icon_name())
    }

    pub(crate) fn owned_icons(&self) -> &HashMap<String, String> {
        &self.owned_icons
    }

    /// Whether the structure can be painted as a whole.
    pub fn is_paintable(&self) -> bool {
        self.paintable
    }

    /// Whether units on the structure's tiles survive it being painted.
    pub fn keep_units(&self) -> bool {
        self.keep_units
    }

    /// Long name key of the destroyed structure, falling back to the regular
    /// long name.
    pub fn destroyed_name(&self) -> &str {
        self.destroyed_long_name
            .as_deref()
            .unwrap_or_else(|| self.name())
    }

    /// Icon of the destroyed structure, falling back to the regular icon.
    pub fn destroyed_icon_name(&self) -> &str {
        self.destroyed_icon
            .as_deref()
            .unwrap_or_else(|| self.icon_name())
    }

    /// Whether any cell, intact, destroyed or deleted, uses `tile_type`.
    pub fn contains_tile_type(&self, tile_type: &str) -> bool {
        self.root.contains(tile_type)
            || self
                .dependents
                .iter()
                .any(|dependent| dependent.tile.contains(tile_type))
    }

    /// Every tile type name any cell uses. May repeat names.
    pub fn member_tile_types(&self) -> impl Iterator<Item = &str> {
        self.root.tile_types().chain(
            self.dependents
                .iter()
                .flat_map(|dependent| dependent.tile.tile_types()),
        )
    }
}

fn read_dependents(json: &JsonReader<'_>) -> Vec<DependentTile> {
    let mut dependents = Vec::new();
    let Some(found) = json.lookup(&["dependent"]) else {
        return dependents;
    };
    let Some(entries) = found.as_array() else {
        log::warn!(
            "{}: \"dependent\" is of type {}, expected array; ignoring it",
            json.context(),
            type_name(found)
        );
        return dependents;
    };

    let mut taken = HashSet::from([Offset::ROOT]);
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            log::warn!(
                "{}: dependent tile {} is of type {}, expected object; skipping it",
                json.context(),
                i,
                type_name(entry)
            );
            continue;
        }
        let reader = JsonReader::new(entry, json.context());
        let offset = reader.read::<Offset>(&["offset"]);
        let tile = reader.read::<String>(&["tile"]);
        let (offset, tile) = match (offset, tile) {
            (Ok(offset), Ok(tile)) => (offset, tile),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!(
                    "{}: dependent tile {}: {}; skipping it",
                    json.context(),
                    i,
                    e
                );
                continue;
            }
        };
        if !taken.insert(offset) {
            log::warn!(
                "{}: dependent tile {} reuses offset {}; skipping it",
                json.context(),
                i,
                offset
            );
            continue;
        }
        dependents.push(DependentTile {
            offset,
            tile: StructureTile {
                tile,
                destroyed: reader.maybe(&["destroyed"]),
                deleted: reader.maybe(&["deleted"]),
            },
        });
    }
    dependents
}

impl BankRecord for Structure {
    const BANK_NAME: &'static str = "structures";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut root = StructureTile::default();
        json.required(&mut root.tile, &["root", "tile"]);
        root.destroyed = json.maybe(&["root", "destroyed"]);
        root.deleted = json.maybe(&["root", "deleted"]);

        let mut owned_icons = HashMap::new();
        json.map(&mut owned_icons, &["ownedicons"]);
        let mut paintable = true;
        let mut keep_units = false;
        json.optional(&mut paintable, &["paintable"]);
        json.optional(&mut keep_units, &["keepunits"]);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            root,
            dependents: read_dependents(json),
            owned_icons,
            paintable,
            keep_units,
            destroyed_long_name: json.maybe(&["destroyedlongname"]),
            destroyed_icon: json.maybe(&["destroyediconname"]),
        }
    }
}

/// A structure cell with its tile types resolved.
#[derive(Debug, Clone, Copy)]
pub struct LinkedTile<'a> {
    data: &'a GameData,
    links: &'a ResolvedTile,
}

impl<'a> LinkedTile<'a> {
    pub fn tile_type(&self) -> Option<Linked<'a, TileType>> {
        self.links.tile.and_then(|index| self.data.at(index))
    }

    pub fn destroyed_tile_type(&self) -> Option<Linked<'a, TileType>> {
        self.links.destroyed.and_then(|index| self.data.at(index))
    }

    pub fn deleted_tile_type(&self) -> Option<Linked<'a, TileType>> {
        self.links.deleted.and_then(|index| self.data.at(index))
    }
}

impl<'a> Linked<'a, Structure> {
    pub fn root_tile(&self) -> LinkedTile<'a> {
        LinkedTile {
            data: self.data(),
            links: &self.links().root,
        }
    }

    /// Dependent cells with their offsets, in declared order.
    pub fn dependent_tiles(&self) -> impl Iterator<Item = (Offset, LinkedTile<'a>)> + use<'a> {
        let data = self.data();
        self.record()
            .dependents()
            .iter()
            .zip(&self.links().dependents)
            .map(move |(dependent, links)| (dependent.offset, LinkedTile { data, links }))
    }

    /// Icon for a country given by name or turn order ID.
    pub fn owned_icon<'k>(&self, country: impl Into<CountryKey<'k>>) -> &'a str {
        let record = self.record();
        match country.into() {
            CountryKey::Name(name) => record.owned_icon(name),
            CountryKey::TurnOrder(id) => self
                .links()
                .owned_icons
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
    use serde_json::{Value, json};

    fn structure(doc: Value) -> Structure {
        let bank = Bank::<Structure>::from_value(&json!({ "S": doc })).unwrap();
        Structure::clone(bank.require("S").unwrap())
    }

    #[test]
    fn test_root_only() {
        let hq = structure(json!({
            "longname": "hq",
            "icon": "hqicon",
            "root": { "tile": "HQTile", "destroyed": "Plains" },
            "ownedicons": { "Orange Star": "oshq" }
        }));
        assert_eq!(hq.root().tile, "HQTile");
        assert_eq!(hq.root().destroyed.as_deref(), Some("Plains"));
        assert_eq!(hq.root().deleted, None);
        assert!(hq.dependents().is_empty());
        assert!(hq.is_paintable());
        assert!(!hq.keep_units());
        assert_eq!(hq.owned_icon("Orange Star"), "oshq");
        assert_eq!(hq.owned_icon("Blue Moon"), "hqicon");
        assert_eq!(hq.destroyed_name(), "hq");
        assert_eq!(hq.destroyed_icon_name(), "hqicon");
        assert!(hq.contains_tile_type("Plains"));
        assert!(!hq.contains_tile_type("Road"));
    }

    #[test]
    fn test_dependents() {
        let seam = structure(json!({
            "root": { "tile": "PipeSeam" },
            "paintable": false,
            "keepunits": true,
            "destroyedlongname": "broken",
            "dependent": [
                { "offset": [1, 0], "tile": "PipeEnd", "deleted": "Plains" },
                { "offset": [0, 0], "tile": "Nope" },
                { "offset": [1, 0], "tile": "Duplicate" },
                { "offset": [1.5, 0], "tile": "Fraction" },
                { "offset": [0, 1] },
                "junk",
                { "offset": [-1, 0], "tile": "PipeEnd", "destroyed": "Rubble" }
            ]
        }));

        let offsets: Vec<_> = seam.dependents().iter().map(|d| d.offset).collect();
        assert_eq!(offsets, [Offset::new(1, 0), Offset::new(-1, 0)]);
        assert_eq!(seam.dependents()[0].tile.deleted.as_deref(), Some("Plains"));
        assert!(!seam.is_paintable());
        assert!(seam.keep_units());
        assert_eq!(seam.destroyed_name(), "broken");
        assert!(seam.contains_tile_type("Rubble"));
        assert!(!seam.contains_tile_type("Duplicate"));
        assert_eq!(
            seam.member_tile_types().collect::<Vec<_>>(),
            ["PipeSeam", "PipeEnd", "Plains", "PipeEnd", "Rubble"]
        );
    }

    #[test]
    fn test_missing_root_tile() {
        let odd = structure(json!({ "root": {} }));
        assert_eq!(odd.root().tile, "");
    }
}
