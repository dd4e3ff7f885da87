//! Contracts and small value types shared by every bank record.

use cwjson::{FromJson, JsonReader, Rejection};
use serde_json::Value;

/// Symbolic name of a bank entry, unique within its bank.
pub type ScriptName = String;

/// A record identified by its script name.
///
/// Records compare equal when their script names are equal.
pub trait Identified {
    fn script_name(&self) -> &str;
}

/// Translation keys and icon shared by most records.
///
/// None of these are display text: `name`, `short_name` and `description` are
/// keys into the language dictionary, and `icon` is a sprite key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonProperties {
    pub name: String,
    pub short_name: String,
    pub icon: String,
    pub description: String,
}

impl CommonProperties {
    /// Reads `longname`, `shortname`, `icon` and `description`, all optional.
    pub fn from_json(json: &JsonReader<'_>) -> Self {
        let mut common = CommonProperties::default();
        json.optional(&mut common.name, &["longname"]);
        json.optional(&mut common.short_name, &["shortname"]);
        json.optional(&mut common.icon, &["icon"]);
        json.optional(&mut common.description, &["description"]);
        common
    }
}

/// Accessors for records that carry [`CommonProperties`].
pub trait HasCommonProperties: Identified {
    fn common(&self) -> &CommonProperties;

    /// Long name translation key.
    fn name(&self) -> &str {
        &self.common().name
    }

    /// Short name translation key.
    fn short_name(&self) -> &str {
        &self.common().short_name
    }

    /// Icon sprite key.
    fn icon_name(&self) -> &str {
        &self.common().icon
    }

    /// Description translation key.
    fn description(&self) -> &str {
        &self.common().description
    }
}

/// An RGBA colour, written in JSON as `[r, g, b]` or `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Colour {
    fn default() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }
}

impl FromJson for Colour {
    const EXPECTED: &'static str = "colour array";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let channels = value.as_array().ok_or(Rejection::WrongType)?;
        if channels.len() != 3 && channels.len() != 4 {
            return Err(Rejection::WrongType);
        }
        let mut rgba = [0u8, 0, 0, 255];
        for (slot, channel) in rgba.iter_mut().zip(channels) {
            let c = u32::from_json(channel)?;
            *slot = u8::try_from(c).map_err(|_| Rejection::OutOfRange)?;
        }
        Ok(Colour {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        })
    }
}

/// A tile offset relative to a structure's root tile, written as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    /// The root tile's own offset.
    pub const ROOT: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl FromJson for Offset {
    const EXPECTED: &'static str = "[x, y] integer pair";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let Some([x, y]) = value.as_array().map(Vec::as_slice) else {
            return Err(Rejection::WrongType);
        };
        let is_integer = |v: &Value| v.is_i64() || v.is_u64();
        if !is_integer(x) || !is_integer(y) {
            return Err(Rejection::WrongType);
        }
        Ok(Offset::new(i32::from_json(x)?, i32::from_json(y)?))
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_common_properties() {
        let doc = json!({ "longname": "day", "icon": "sun", "shortname": 4 });
        let common = CommonProperties::from_json(&JsonReader::new(&doc, "weathers.Clear"));
        assert_eq!(common.name, "day");
        assert_eq!(common.icon, "sun");
        assert_eq!(common.short_name, "");
        assert_eq!(common.description, "");
    }

    #[test]
    fn test_colour() {
        assert_eq!(
            Colour::from_json(&json!([255, 100, 0])),
            Ok(Colour {
                r: 255,
                g: 100,
                b: 0,
                a: 255
            })
        );
        assert_eq!(
            Colour::from_json(&json!([1, 2, 3, 4])).map(|c| c.a),
            Ok(4)
        );
        assert_eq!(
            Colour::from_json(&json!([256, 0, 0])),
            Err(Rejection::OutOfRange)
        );
        assert_eq!(Colour::from_json(&json!([0, 0])), Err(Rejection::WrongType));
    }

    #[test]
    fn test_offset_requires_integers() {
        assert_eq!(Offset::from_json(&json!([1, -2])), Ok(Offset::new(1, -2)));
        assert_eq!(Offset::from_json(&json!([1.5, 0])), Err(Rejection::WrongType));
        assert_eq!(Offset::from_json(&json!([1, 2, 3])), Err(Rejection::WrongType));
        assert_eq!(Offset::from_json(&json!({"x": 1})), Err(Rejection::WrongType));
    }
}
