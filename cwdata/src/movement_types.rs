use cwdata_derive::Identified;
use cwjson::JsonReader;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;

/// A way of moving across terrain. Only used as a key into terrain move costs.
#[derive(Debug, Clone, Identified)]
pub struct MovementType {
    script_name: String,
    common: CommonProperties,
}

impl BankRecord for MovementType {
    const BANK_NAME: &'static str = "movement types";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
        }
    }
}
