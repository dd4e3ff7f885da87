use cwdata_derive::Identified;
use cwjson::JsonReader;

use crate::bank::{BankRecord, LoadContext};
use crate::common::CommonProperties;

#[derive(Debug, Clone, Identified)]
pub struct Commander {
    script_name: String,
    common: CommonProperties,
    portrait: String,
    theme: String,
}

impl Commander {
    /// Portrait sprite key.
    pub fn portrait(&self) -> &str {
        &self.portrait
    }

    /// Theme music key.
    pub fn theme(&self) -> &str {
        &self.theme
    }
}

impl BankRecord for Commander {
    const BANK_NAME: &'static str = "commanders";

    fn from_json(script_name: &str, json: &JsonReader<'_>, _ctx: &mut LoadContext) -> Self {
        let mut portrait = String::new();
        let mut theme = String::new();
        json.optional(&mut portrait, &["portrait"]);
        json.optional(&mut theme, &["theme"]);

        Self {
            script_name: script_name.to_owned(),
            common: CommonProperties::from_json(json),
            portrait,
            theme,
        }
    }
}
