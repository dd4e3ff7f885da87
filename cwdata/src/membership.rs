//! Which structures each tile type belongs to.

use crate::bank::{Bank, BankIndex};
use crate::structures::Structure;
use crate::tile_types::TileType;

/// For every tile type, in tile type bank order, the structures using it in
/// any role, in structure bank order. Each structure appears at most once per
/// tile type.
pub fn structure_membership(
    tile_types: &Bank<TileType>,
    structures: &Bank<Structure>,
) -> Vec<Vec<BankIndex<Structure>>> {
    let mut membership = vec![Vec::new(); tile_types.len()];
    for (structure_index, structure) in structures.indexed() {
        for name in structure.member_tile_types() {
            let Some(tile_index) = tile_types.index_of(name) else {
                continue;
            };
            let members = &mut membership[tile_index.get()];
            if members.last() != Some(&structure_index) {
                members.push(structure_index);
            }
        }
    }
    membership
}

/// A tile type can be painted on its own when no structure uses it, unless it
/// is flagged as always paintable.
pub fn is_tile_paintable(structures: &[BankIndex<Structure>], always_paintable: bool) -> bool {
    structures.is_empty() || always_paintable
}
