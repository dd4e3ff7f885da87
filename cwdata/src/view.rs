//! Read-only access to records together with their resolved state.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::bank::{Bank, BankIndex, BankRecord};
use crate::commanders::Commander;
use crate::countries::Country;
use crate::environments::Environment;
use crate::game_data::{Banks, GameData};
use crate::links::{Links, StructureLinks, TerrainLinks, TileTypeLinks, UnitTypeLinks};
use crate::movement_types::MovementType;
use crate::structures::Structure;
use crate::terrains::Terrain;
use crate::tile_types::TileType;
use crate::unit_types::UnitType;
use crate::weapons::Weapon;
use crate::weathers::Weather;

/// A record type that can be looked up through [`GameData`].
pub trait Linkable: BankRecord + 'static {
    /// Resolved state kept for each record, `()` if there is none.
    type Links: fmt::Debug + 'static;

    fn bank(banks: &Banks) -> &Bank<Self>;

    fn links(links: &Links, index: usize) -> Option<&Self::Links>;
}

macro_rules! unlinked {
    ($($record:ty => $field:ident),* $(,)?) => {
        $(
            impl Linkable for $record {
                type Links = ();

                fn bank(banks: &Banks) -> &Bank<Self> {
                    &banks.$field
                }

                fn links(_links: &Links, _index: usize) -> Option<&()> {
                    Some(&())
                }
            }
        )*
    };
}

macro_rules! linked {
    ($($record:ty => $field:ident, $links:ty),* $(,)?) => {
        $(
            impl Linkable for $record {
                type Links = $links;

                fn bank(banks: &Banks) -> &Bank<Self> {
                    &banks.$field
                }

                fn links(links: &Links, index: usize) -> Option<&$links> {
                    links.$field.get(index)
                }
            }
        )*
    };
}

unlinked! {
    Commander => commanders,
    Weather => weathers,
    Environment => environments,
    Country => countries,
    MovementType => movement_types,
    Weapon => weapons,
}

linked! {
    Terrain => terrains, TerrainLinks,
    TileType => tile_types, TileTypeLinks,
    UnitType => unit_types, UnitTypeLinks,
    Structure => structures, StructureLinks,
}

/// A record paired with its resolved state.
///
/// Dereferences to the record, and adds accessors that follow cross
/// references or use turn order keyed maps.
pub struct Linked<'a, T: Linkable> {
    data: &'a GameData,
    index: BankIndex<T>,
    record: &'a Arc<T>,
    links: &'a T::Links,
}

impl<'a, T: Linkable> Linked<'a, T> {
    pub(crate) fn new(
        data: &'a GameData,
        index: BankIndex<T>,
        record: &'a Arc<T>,
        links: &'a T::Links,
    ) -> Self {
        Self {
            data,
            index,
            record,
            links,
        }
    }

    /// Position of the record in its bank.
    pub fn index(&self) -> BankIndex<T> {
        self.index
    }

    pub fn record(&self) -> &'a Arc<T> {
        self.record
    }

    pub(crate) fn data(&self) -> &'a GameData {
        self.data
    }

    pub(crate) fn links(&self) -> &'a T::Links {
        self.links
    }
}

impl<T: Linkable> Clone for Linked<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Linkable> Copy for Linked<'_, T> {}

impl<T: Linkable> Deref for Linked<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.record
    }
}

impl<T: Linkable + fmt::Debug> fmt::Debug for Linked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linked")
            .field("index", &self.index)
            .field("record", &self.record)
            .field("links", &self.links)
            .finish()
    }
}
