use cwdata_derive::Identified;
use cwjson::JsonReader;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;

/// A visual theme for the map: which spritesheets tiles, pictures and
/// structure icons are drawn from.
#[derive(Debug, Clone, Identified)]
pub struct Environment {
    script_name: String,
    common: CommonProperties,
    spritesheet: String,
    picture_spritesheet: String,
    structure_icon_spritesheet: String,
}

impl Environment {
    pub fn spritesheet(&self) -> &str {
        &self.spritesheet
    }

    pub fn picture_spritesheet(&self) -> &str {
        &self.picture_spritesheet
    }

    pub fn structure_icon_spritesheet(&self) -> &str {
        &self.structure_icon_spritesheet
    }
}

impl BankRecord for Environment {
    const BANK_NAME: &'static str = "environments";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut spritesheet = String::new();
        let mut picture_spritesheet = String::new();
        let mut structure_icon_spritesheet = String::new();
        json.optional(&mut spritesheet, &["spritesheet"]);
        json.optional(&mut picture_spritesheet, &["picturespritesheet"]);
        json.optional(&mut structure_icon_spritesheet, &["structureiconspritesheet"]);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            spritesheet,
            picture_spritesheet,
            structure_icon_spritesheet,
        }
    }
}
