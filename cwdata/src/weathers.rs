use std::time::Duration;

use cwdata_derive::Identified;
use cwjson::{FromJson, JsonReader, Rejection, type_name};
use serde_json::Value;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;

/// Direction and speed of a particle, written as `[x, y]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl FromJson for Velocity {
    const EXPECTED: &'static str = "[x, y] number pair";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        let Some([x, y]) = value.as_array().map(Vec::as_slice) else {
            return Err(Rejection::WrongType);
        };
        Ok(Velocity {
            x: f32::from_json(x)?,
            y: f32::from_json(y)?,
        })
    }
}

/// One layer of weather particles drawn over the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleLayer {
    pub sheet: String,
    pub sprite_id: String,
    pub density: f32,
    pub velocity: Velocity,
    pub respawn_delay: Duration,
}

impl ParticleLayer {
    fn from_json(json: &JsonReader<'_>) -> Self {
        let mut layer = ParticleLayer::default();
        json.optional(&mut layer.sheet, &["sheet"]);
        json.optional(&mut layer.sprite_id, &["spriteid"]);
        json.optional(&mut layer.density, &["density"]);
        json.optional(&mut layer.velocity, &["vector"]);

        let mut seconds = 0.0f32;
        if json.optional(&mut seconds, &["respawndelay"]) {
            match Duration::try_from_secs_f32(seconds) {
                Ok(delay) => layer.respawn_delay = delay,
                Err(_) => log::warn!(
                    "{}: respawn delay {} is not a valid duration; using zero",
                    json.context(),
                    seconds
                ),
            }
        }
        layer
    }
}

/// A weather condition.
#[derive(Debug, Clone, Identified)]
pub struct Weather {
    script_name: String,
    common: CommonProperties,
    sound: String,
    particles: Vec<ParticleLayer>,
}

impl Weather {
    /// Ambient sound key, empty if silent.
    pub fn sound(&self) -> &str {
        &self.sound
    }

    pub fn particles(&self) -> &[ParticleLayer] {
        &self.particles
    }
}

impl BankRecord for Weather {
    const BANK_NAME: &'static str = "weathers";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut sound = String::new();
        json.optional(&mut sound, &["sound"]);

        let mut particles = Vec::new();
        if let Some(found) = json.lookup(&["particles"]) {
            match found.as_array() {
                Some(layers) => {
                    for layer in layers {
                        if layer.is_object() {
                            let reader = JsonReader::new(layer, json.context());
                            particles.push(ParticleLayer::from_json(&reader));
                        } else {
                            log::warn!(
                                "{}: particle layer is of type {}, expected object; skipping it",
                                json.context(),
                                type_name(layer)
                            );
                        }
                    }
                }
                None => log::warn!(
                    "{}: \"particles\" is of type {}, expected array; ignoring it",
                    json.context(),
                    type_name(found)
                ),
            }
        }

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            sound,
            particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Bank;
    use serde_json::json;

    #[test]
    fn test_particles() {
        let bank = Bank::<Weather>::from_value(&json!({
            "Rain": {
                "sound": "rain",
                "particles": [
                    {
                        "sheet": "particle",
                        "spriteid": "raindrop",
                        "density": 0.5,
                        "vector": [-20, 150],
                        "respawndelay": 1.5
                    },
                    "not a layer",
                    { "sheet": "particle", "respawndelay": -3 }
                ]
            },
            "Clear": {}
        }))
        .unwrap();

        let rain = bank.require("Rain").unwrap();
        assert_eq!(rain.sound(), "rain");
        assert_eq!(rain.particles().len(), 2);
        let drop = &rain.particles()[0];
        assert_eq!(drop.sprite_id, "raindrop");
        assert_eq!(drop.velocity, Velocity { x: -20.0, y: 150.0 });
        assert_eq!(drop.respawn_delay, Duration::from_millis(1500));
        assert_eq!(rain.particles()[1].respawn_delay, Duration::ZERO);

        let clear = bank.require("Clear").unwrap();
        assert!(clear.sound().is_empty());
        assert!(clear.particles().is_empty());
    }
}
