use cwdata_derive::Identified;
use cwjson::JsonReader;

use crate::bank::{BankRecord, LoadContext};
use crate::common::{Colour, CommonProperties};
use crate::turn_order::ArmyId;

/// A playable faction.
#[derive(Debug, Clone, Identified)]
pub struct Country {
    script_name: String,
    common: CommonProperties,
    colour: Colour,
    turn_order: ArmyId,
}

impl Country {
    pub fn colour(&self) -> Colour {
        self.colour
    }

    /// Position in the turn order, assigned in load order unless the entry
    /// gives an explicit `turnorder`.
    pub fn turn_order(&self) -> ArmyId {
        self.turn_order
    }
}

impl BankRecord for Country {
    const BANK_NAME: &'static str = "countries";

    fn from_json(script_name: &str, json: &JsonReader<'_>, ctx: &mut LoadContext) -> Self {
        let mut colour = Colour::default();
        json.required(&mut colour, &["colour"]);

        // An explicit ID still uses up a counter value.
        let mut turn_order = ctx.next_turn_order();
        json.optional(&mut turn_order, &["turnorder"]);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            colour,
            turn_order,
        }
    }
}
