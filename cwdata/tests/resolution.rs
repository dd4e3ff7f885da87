use std::fs;
use std::path::{Path, PathBuf};

use cwdata::{
    ArmyId, BankError, Banks, GameData, HasCommonProperties, Identified, LoadConfig, Structure,
    Terrain, TileType, UnitType,
};
use serde_json::{Value, json};
use tempfile::TempDir;

fn write(dir: &Path, file: &str, doc: &Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(doc).unwrap()).unwrap();
}

fn countries() -> Value {
    json!({
        "Orange Star": { "longname": "os", "colour": [240, 80, 0] },
        "Blue Moon": { "longname": "bm", "colour": [0, 80, 240] }
    })
}

/// Writes a small but complete data set and returns its manifest path.
fn data_set(dir: &TempDir) -> PathBuf {
    let root = dir.path();
    write(root, "countries.json", &countries());
    write(root, "movement.json", &json!({ "Foot": {}, "Treads": {} }));
    write(
        root,
        "terrains.json",
        &json!({
            "Plains": { "hp": 100, "defence": 1, "icon": "plainsicon", "movecosts": { "Foot": 1, "Treads": 1 } },
            "City": {
                "hp": 20,
                "defence": 3,
                "icon": "cityicon",
                "primarytiletype": "City",
                "pictures": { "Orange Star": "oscitypic", "Green Earth": "gecitypic" }
            },
            "HQ": { "hp": 20, "defence": 4, "primarytiletype": "HQTile" },
            "Road": { "hp": 0, "defence": 0, "primarytiletype": "Plains" }
        }),
    );
    write(
        root,
        "tiles.json",
        &json!({
            "Plains": { "type": "Plains", "neutral": "plains0" },
            "City": {
                "type": "City",
                "neutral": "nocity",
                "tiles": { "Orange Star": "oscity", "Green Earth": "gecity" }
            },
            "HQTile": { "type": "HQ", "neutral": "hq" }
        }),
    );
    write(
        root,
        "structures.json",
        &json!({
            "HQ": {
                "icon": "hqicon",
                "root": { "tile": "HQTile", "destroyed": "Plains" },
                "ownedicons": { "Blue Moon": "bmhq" }
            }
        }),
    );
    write(
        root,
        "weapons.json",
        &json!({
            "Cannon": { "ammo": 9, "units": { "Infantry": 50, "Tank": 55 }, "hiddenunits": { "Sub": 10 } },
            "MG": { "ammo": -1, "units": { "Infantry": 70 } }
        }),
    );
    write(
        root,
        "units.json",
        &json!({
            "Infantry": {
                "movetype": "Foot", "price": 1000, "fuel": 99, "hp": 10, "mp": 3, "vision": 2,
                "cancapture": ["City", "Nowhere", "HQ"],
                "weapons": { "MG": {} }
            },
            "Tank": {
                "movetype": "Treads", "price": 7000, "fuel": 70, "hp": 10, "mp": 6, "vision": 3,
                "canload": ["Infantry", "Ghost"],
                "sprites": { "Blue Moon": "bmtank" },
                "weapons": {
                    "Cannon": { "ammo": 6, "units": { "Tank": false, "APC": 40 }, "hiddenunits": {} },
                    "MG": { "units": { "Infantry": true } },
                    "Laser": {}
                }
            }
        }),
    );
    write(root, "commanders.json", &json!({ "JAKE": { "portrait": "jake" } }));
    write(root, "weathers.json", &json!({ "Clear": {} }));
    write(root, "environments.json", &json!({ "Normal": { "spritesheet": "tile.normal" } }));

    let manifest = root.join("bank.json");
    write(
        root,
        "bank.json",
        &json!({
            "commanders": "commanders.json",
            "weathers": "weathers.json",
            "environments": "environments.json",
            "countries": "countries.json",
            "movementTypes": "movement.json",
            "structures": "structures.json",
            "tileTypes": "tiles.json",
            "terrains": "terrains.json",
            "unitTypes": "units.json",
            "weapons": "weapons.json"
        }),
    );
    manifest
}

fn load(dir: &TempDir) -> GameData {
    GameData::load(&data_set(dir), &LoadConfig::default()).unwrap()
}

#[test]
fn test_every_bank_loads() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);
    let banks = data.banks();
    assert_eq!(banks.commanders.len(), 1);
    assert_eq!(banks.weathers.len(), 1);
    assert_eq!(banks.environments.len(), 1);
    assert_eq!(banks.countries.len(), 2);
    assert_eq!(banks.movement_types.len(), 2);
    assert_eq!(banks.structures.len(), 1);
    assert_eq!(banks.tile_types.len(), 3);
    assert_eq!(banks.terrains.len(), 4);
    assert_eq!(banks.unit_types.len(), 2);
    assert_eq!(banks.weapons.len(), 2);
    assert_eq!(
        banks.terrains.names().collect::<Vec<_>>(),
        ["Plains", "City", "HQ", "Road"]
    );
}

#[test]
fn test_plains_end_to_end() {
    let banks = Banks {
        terrains: cwdata::Bank::from_value(&json!({
            "Plains": { "hp": 100, "defence": 1, "primarytiletype": "Plains", "movecosts": { "Foot": 1 } }
        }))
        .unwrap(),
        tile_types: cwdata::Bank::from_value(&json!({
            "Plains": { "type": "Plains", "neutral": "plains0" }
        }))
        .unwrap(),
        ..Banks::default()
    };
    let data = GameData::resolve(banks);

    let tile = data.get::<TileType>("Plains").unwrap();
    assert_eq!(tile.terrain().unwrap().script_name(), "Plains");
    assert_eq!(tile.structures().count(), 0);
    assert!(tile.is_paintable());

    let plains = data.get::<Terrain>("Plains").unwrap();
    assert_eq!(plains.primary_tile_type().unwrap().script_name(), "Plains");
    assert!(plains.is_paintable());
    assert_eq!(plains.move_cost("Foot"), 1);
}

#[test]
fn test_terrain_without_primary_tile_type() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);

    // Plains names no primary tile type, and its tile type sits in the HQ.
    let plains = data.get::<Terrain>("Plains").unwrap();
    assert!(plains.primary_tile_type().is_none());
    assert!(!plains.is_paintable());
    assert_eq!(plains.move_cost("Foot"), 1);

    let tile = data.get::<TileType>("Plains").unwrap();
    assert_eq!(tile.terrain().unwrap().script_name(), "Plains");
    assert!(!tile.is_paintable());
}

#[test]
fn test_terrain_paintability() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);

    let city = data.get::<Terrain>("City").unwrap();
    assert!(city.is_paintable());
    assert_eq!(city.primary_tile_type().unwrap().script_name(), "City");

    // HQTile is part of a structure.
    assert!(!data.get::<Terrain>("HQ").unwrap().is_paintable());
    // The Plains tile type draws Plains, not Road.
    assert!(!data.get::<Terrain>("Road").unwrap().is_paintable());
}

#[test]
fn test_structure_membership() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);

    let hq_tile = data.get::<TileType>("HQTile").unwrap();
    let structures: Vec<_> = hq_tile.structures().map(|s| s.script_name().to_owned()).collect();
    assert_eq!(structures, ["HQ"]);
    assert_eq!(hq_tile.is_paintable(), hq_tile.always_paintable());

    // Destroyed substitutes count towards membership too.
    let plains = data.get::<TileType>("Plains").unwrap();
    assert_eq!(plains.structures().count(), 1);
    assert!(!plains.is_paintable());

    let city = data.get::<TileType>("City").unwrap();
    assert_eq!(city.structures().count(), 0);
    assert!(city.is_paintable());

    let hq = data.get::<Structure>("HQ").unwrap();
    let root = hq.root_tile();
    assert_eq!(root.tile_type().unwrap().script_name(), "HQTile");
    assert_eq!(root.destroyed_tile_type().unwrap().script_name(), "Plains");
    assert!(root.deleted_tile_type().is_none());
    assert_eq!(hq.dependent_tiles().count(), 0);
}

#[test]
fn test_turn_order_keyed_lookups() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);
    let os = data.banks().countries.require("Orange Star").unwrap().turn_order();
    let bm = data.banks().countries.require("Blue Moon").unwrap().turn_order();
    assert_eq!((os, bm), (ArmyId(0), ArmyId(1)));

    let city = data.get::<TileType>("City").unwrap();
    assert_eq!(city.owned_tile(os), "oscity");
    assert_eq!(city.owned_tile(bm), "nocity");
    assert_eq!(city.owned_tile("Green Earth"), "gecity");
    assert_eq!(city.owned_tile(ArmyId(2)), "nocity");

    let city = data.get::<Terrain>("City").unwrap();
    assert_eq!(city.picture(os), "oscitypic");
    assert_eq!(city.picture(bm), city.icon_name());

    let tank = data.get::<UnitType>("Tank").unwrap();
    assert_eq!(tank.sprite(bm), Some("bmtank"));
    assert_eq!(tank.sprite(os), None);

    let hq = data.get::<Structure>("HQ").unwrap();
    assert_eq!(hq.owned_icon(bm), "bmhq");
    assert_eq!(hq.owned_icon(os), "hqicon");
}

#[test]
fn test_unit_type_links() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);

    let tank = data.get::<UnitType>("Tank").unwrap();
    assert_eq!(tank.movement_type().unwrap().script_name(), "Treads");
    assert!(tank.can_load("Infantry"));
    assert!(!tank.can_load("Ghost"));
    let loadable: Vec<_> = tank
        .loadable_unit_types()
        .map(|u| u.script_name().to_owned())
        .collect();
    assert_eq!(loadable, ["Infantry"]);

    let infantry = data.get::<UnitType>("Infantry").unwrap();
    let capturable: Vec<_> = infantry
        .capturable_terrains()
        .map(|t| t.script_name().to_owned())
        .collect();
    assert_eq!(capturable, ["City", "HQ"]);
    assert!(infantry.can_capture("HQ"));
    assert!(!infantry.can_capture("Plains"));
    assert!(!infantry.can_unload_from("Plains"));
}

#[test]
fn test_weapon_overrides() {
    let dir = TempDir::new().unwrap();
    let data = load(&dir);
    let tank = data.get::<UnitType>("Tank").unwrap();

    let names: Vec<_> = tank.weapons().map(|w| w.script_name().to_owned()).collect();
    assert_eq!(names, ["Cannon", "MG"]);
    assert_eq!(tank.weapon_count(), 2);

    let cannon = tank.weapon("Cannon").unwrap();
    assert_eq!(cannon.max_ammo(), 6);
    assert_eq!(cannon.base_damage_unit("Infantry", false), Some(50));
    assert!(!cannon.can_attack_unit("Tank", false));
    assert_eq!(cannon.base_damage_unit("APC", false), Some(40));
    assert!(cannon.hidden_units().is_empty());

    let mg = tank.weapon("MG").unwrap();
    assert_eq!(mg.base_damage_unit("Infantry", false), Some(70));
    assert!(mg.has_infinite_ammo());

    assert_eq!(
        tank.first_weapon_with_finite_ammo().map(|w| w.script_name()),
        Some("Cannon")
    );
    let infantry = data.get::<UnitType>("Infantry").unwrap();
    assert!(infantry.first_weapon_with_finite_ammo().is_none());

    // The base weapons are untouched.
    let base = data.banks().weapons.require("Cannon").unwrap();
    assert_eq!(base.max_ammo(), 9);
    assert!(base.can_attack_unit("Tank", false));
    assert_eq!(base.base_damage_unit("Sub", true), Some(10));
}

#[test]
fn test_relink_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut data = load(&dir);
    let before = data.links().clone();
    let cannon_before = data
        .get::<UnitType>("Tank")
        .unwrap()
        .weapon("Cannon")
        .unwrap()
        .json()
        .clone();

    data.relink();
    data.relink();

    assert_eq!(data.links(), &before);
    let tank = data.get::<UnitType>("Tank").unwrap();
    assert_eq!(tank.weapon("Cannon").unwrap().json(), &cannon_before);

    let reloaded = load(&TempDir::new().unwrap());
    for unit in data.iter::<UnitType>() {
        let other = reloaded.get::<UnitType>(unit.script_name()).unwrap();
        let weapons: Vec<_> = unit.weapons().map(|w| w.json().clone()).collect();
        let expected: Vec<_> = other.weapons().map(|w| w.json().clone()).collect();
        assert_eq!(weapons, expected);
    }

    let banks = data.banks().clone();
    assert_eq!(GameData::resolve(banks).links(), &before);
}

#[test]
fn test_turn_order_gaps() {
    let dir = TempDir::new().unwrap();
    let manifest = data_set(&dir);
    write(
        dir.path(),
        "countries.json",
        &json!({ "Orange Star": { "turnorder": 5 }, "Blue Moon": {} }),
    );

    let data = GameData::load(&manifest, &LoadConfig::default()).unwrap();
    let os = data.banks().countries.require("Orange Star").unwrap().turn_order();
    let bm = data.banks().countries.require("Blue Moon").unwrap().turn_order();
    assert_eq!((os, bm), (ArmyId(5), ArmyId(1)));

    // ID 0 was consumed by Orange Star's explicit override and belongs to no one.
    let city = data.get::<TileType>("City").unwrap();
    assert_eq!(city.owned_tile(os), "oscity");
    assert_eq!(city.owned_tile(ArmyId(0)), "nocity");

    let hq = data.get::<Structure>("HQ").unwrap();
    assert_eq!(hq.owned_icon(bm), "bmhq");
    assert_eq!(hq.owned_icon(ArmyId(0)), "hqicon");
}

#[test]
fn test_invalid_turn_orders() {
    let dir = TempDir::new().unwrap();
    let manifest = data_set(&dir);
    write(
        dir.path(),
        "countries.json",
        &json!({ "Orange Star": {}, "Blue Moon": {}, "Green Earth": { "turnorder": 0 } }),
    );

    let err = GameData::load(&manifest, &LoadConfig::default()).unwrap_err();
    assert!(matches!(err, BankError::InvalidTurnOrders));

    let lenient = LoadConfig {
        reject_invalid_turn_orders: false,
    };
    let data = GameData::load(&manifest, &lenient).unwrap();
    assert_eq!(data.banks().countries.len(), 3);
}

#[test]
fn test_missing_manifest_keys() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "countries.json", &countries());
    let manifest = dir.path().join("bank.json");
    write(dir.path(), "bank.json", &json!({ "countries": "countries.json", "terrains": 5 }));

    let data = GameData::load(&manifest, &LoadConfig::default()).unwrap();
    assert_eq!(data.banks().countries.len(), 2);
    assert!(data.banks().terrains.is_empty());
    assert!(data.find::<Terrain>("Plains").is_none());
    assert!(matches!(
        data.get::<Terrain>("Plains"),
        Err(BankError::NotFound { bank: "terrains", .. })
    ));
}

#[test]
fn test_unreadable_documents_fail() {
    let dir = TempDir::new().unwrap();
    let manifest = data_set(&dir);

    fs::write(dir.path().join("weapons.json"), "{ broken").unwrap();
    assert!(matches!(
        GameData::load(&manifest, &LoadConfig::default()),
        Err(BankError::Json { .. })
    ));

    fs::remove_file(dir.path().join("weapons.json")).unwrap();
    assert!(matches!(
        Banks::load_manifest(&manifest),
        Err(BankError::Io { .. })
    ));

    write(dir.path(), "weapons.json", &json!([]));
    assert!(matches!(
        Banks::load_manifest(&manifest),
        Err(BankError::NotAnObject { bank: "weapons", .. })
    ));
}

#[test]
fn test_minimal_terrain() {
    let banks = Banks {
        terrains: cwdata::Bank::from_json_str(r#"{ "Plains": { "hp": 100, "defence": 2 } }"#)
            .unwrap(),
        ..Banks::default()
    };
    let data = GameData::resolve(banks);
    let plains = data.get::<Terrain>("Plains").unwrap();
    assert_eq!(plains.move_cost("Infantry"), -1);
    assert_eq!(plains.picture("Orange Star"), plains.icon_name());
    assert_eq!(data.iter::<Terrain>().count(), 1);
}

#[test]
fn test_game_data_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GameData>();
}
