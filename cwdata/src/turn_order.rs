//! Turn order IDs and per-country map re-keying.

use std::collections::{HashMap, HashSet};
use std::fmt;

use cwjson::{FromJson, Rejection};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bank::Bank;
use crate::countries::Country;

/// A country's position in the turn order.
///
/// Doubles as a compact secondary key for per-country data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct ArmyId(pub u32);

impl ArmyId {
    /// Reserved value meaning "no army". Never a valid country ID.
    pub const NO_ARMY: ArmyId = ArmyId(u32::MAX);

    pub fn is_no_army(self) -> bool {
        self == Self::NO_ARMY
    }
}

impl fmt::Display for ArmyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_army() {
            write!(f, "NO_ARMY")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromJson for ArmyId {
    const EXPECTED: &'static str = "turn order ID";

    fn from_json(value: &Value) -> Result<Self, Rejection> {
        u32::from_json(value).map(ArmyId)
    }
}

/// Either way of naming a country in a per-country lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryKey<'a> {
    Name(&'a str),
    TurnOrder(ArmyId),
}

impl<'a> From<&'a str> for CountryKey<'a> {
    fn from(name: &'a str) -> Self {
        CountryKey::Name(name)
    }
}

impl<'a> From<&'a String> for CountryKey<'a> {
    fn from(name: &'a String) -> Self {
        CountryKey::Name(name)
    }
}

impl From<ArmyId> for CountryKey<'_> {
    fn from(id: ArmyId) -> Self {
        CountryKey::TurnOrder(id)
    }
}

/// Re-keys a country-name map by turn order ID.
///
/// Names that are not in `countries` are dropped. The result is always built
/// from scratch.
pub fn rekey_by_turn_order<V: Clone>(
    source: &HashMap<String, V>,
    countries: &Bank<Country>,
) -> HashMap<ArmyId, V> {
    let mut rekeyed = HashMap::with_capacity(source.len());
    for (name, value) in source {
        match countries.get(name) {
            Some(country) => {
                rekeyed.insert(country.turn_order(), value.clone());
            }
            None => log::debug!("Country \"{}\" is not in the country bank; dropping it", name),
        }
    }
    rekeyed
}

/// Returns `false` if two countries share a turn order ID or any country
/// uses [`ArmyId::NO_ARMY`].
pub fn check_country_turn_order_ids(countries: &Bank<Country>) -> bool {
    let mut seen = HashSet::with_capacity(countries.len());
    let mut valid = true;
    for (name, country) in countries.iter() {
        let id = country.turn_order();
        if id.is_no_army() {
            log::warn!("Country \"{}\" uses the reserved turn order ID {}", name, id);
            valid = false;
        } else if !seen.insert(id) {
            log::warn!(
                "Country \"{}\" reuses turn order ID {} of an earlier country",
                name,
                id
            );
            valid = false;
        }
    }
    valid
}
