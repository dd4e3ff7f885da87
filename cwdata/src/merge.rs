//! Combines a base weapon document with a unit type's override document.
//!
//! Top-level keys of the override replace the base's outright, which also
//! means an override `hiddenunits` table replaces the base table whole. The
//! `units` and `terrains` damage tables are merged key by key instead:
//!
//! - a whole number sets the damage, adding the target if the base lacks it
//! - `true` keeps whatever the base has for that target
//! - `false` removes the target
//!
//! Targets the override does not mention keep their base damage.

use cwjson::{FromJson, type_name};
use serde_json::{Map, Value};

/// Damage tables merged key by key.
const KEYWISE_TABLES: [&str; 2] = ["units", "terrains"];

/// Produces the effective weapon document. Neither input is modified, and the
/// result depends on nothing but the two documents.
pub fn merge_weapon_json(base: &Value, over: &Value, context: &str) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();

    let Some(over) = over.as_object() else {
        if !over.is_null() {
            log::warn!(
                "{}: weapon override is of type {}, expected object; using the base weapon",
                context,
                type_name(over)
            );
        }
        return Value::Object(merged);
    };

    for (key, value) in over {
        if !KEYWISE_TABLES.contains(&key.as_str()) {
            merged.insert(key.clone(), value.clone());
        }
    }
    for key in KEYWISE_TABLES {
        if let Some(table) = over.get(key) {
            merge_damage_table(&mut merged, key, table, context);
        }
    }

    Value::Object(merged)
}

fn merge_damage_table(merged: &mut Map<String, Value>, key: &str, over: &Value, context: &str) {
    let Some(over) = over.as_object() else {
        log::warn!(
            "{}: override \"{}\" is of type {}, expected object; keeping the base table",
            context,
            key,
            type_name(over)
        );
        return;
    };

    let mut table = merged
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (target, damage) in over {
        match damage {
            Value::Bool(true) => {}
            Value::Bool(false) => {
                table.shift_remove(target);
            }
            Value::Number(_) if i32::from_json(damage).is_ok() => {
                table.insert(target.clone(), damage.clone());
            }
            Value::Number(_) => log::warn!(
                "{}: override {{\"{}\", \"{}\"}} of {} is not a whole damage value; keeping the base entry",
                context,
                key,
                target,
                damage
            ),
            other => log::warn!(
                "{}: override {{\"{}\", \"{}\"}} is of type {}, expected number or boolean; ignoring it",
                context,
                key,
                target,
                type_name(other)
            ),
        }
    }
    merged.insert(key.to_owned(), Value::Object(table));
}
