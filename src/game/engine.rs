//! The slide and merge engine.
//!
//! A move resolves in two passes. The slide pass relinks every tile as far
//! toward the leading edge as it can reach, parking merge partners in the
//! target cell's merge slot. The merge pass runs later, once the slide
//! animations have settled, and absorbs every parked tile. Deferring the
//! merge keeps a freshly doubled tile from being doubled again within the
//! same move.

use super::direction::Direction;
use super::grid::{Coord, Grid};
use super::tile::TileId;

/// One tile's transition out of the slide pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideMove {
    pub tile: TileId,
    pub value: u32,
    pub from: Coord,
    pub to: Coord,
    /// The tile landed in the target's merge slot
    pub merged: bool,
}

/// A merge resolved by the merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEvent {
    pub at: Coord,
    /// The surviving tile, now doubled
    pub tile: TileId,
    /// Value after doubling
    pub value: u32,
    /// The tile the merge absorbed
    pub absorbed: TileId,
}

/// Slide every tile toward the leading edge of `direction`.
///
/// Returns one [`SlideMove`] per tile that moved; an empty vec means the
/// input was a no-op and the grid is untouched. Merges are only staged
/// here. Call [`merge_pending`] once the slides have settled.
pub fn slide_tiles(grid: &mut Grid, direction: Direction) -> Vec<SlideMove> {
    let mut moves = Vec::new();
    for group in grid.groups(direction) {
        slide_group(grid, &group, &mut moves);
    }
    moves
}

fn slide_group(grid: &mut Grid, group: &[Coord], moves: &mut Vec<SlideMove>) {
    for i in 1..group.len() {
        let Some(value) = grid.cell(group[i]).tile_value() else {
            continue;
        };

        // Walk back toward the leading edge while cells keep accepting.
        // The scan stops at the first refusal; the last accepting cell is
        // where the tile lands.
        let mut target = None;
        for j in (0..i).rev() {
            if grid.cell(group[j]).can_accept(value) {
                target = Some(group[j]);
            } else {
                break;
            }
        }
        let Some(to) = target else {
            continue;
        };

        let Some(tile) = grid.cell_mut(group[i]).unlink_tile() else {
            continue;
        };
        let merged = !grid.cell(to).is_empty();
        moves.push(SlideMove {
            tile: tile.id,
            value,
            from: group[i],
            to,
            merged,
        });
        if merged {
            grid.cell_mut(to).link_tile_for_merge(tile);
        } else {
            grid.cell_mut(to).link_tile(tile);
        }
    }
}

/// Absorb every staged merge, scanning cells row-major.
pub fn merge_pending(grid: &mut Grid) -> Vec<MergeEvent> {
    let mut merges = Vec::new();
    let coords: Vec<Coord> = grid.coords().collect();
    for at in coords {
        if !grid.cell(at).has_tile_for_merge() {
            continue;
        }
        let absorbed = grid.cell_mut(at).merge_tiles();
        if let Some(survivor) = grid.cell(at).tile() {
            merges.push(MergeEvent {
                at,
                tile: survivor.id,
                value: survivor.value,
                absorbed: absorbed.id,
            });
        }
    }
    merges
}

/// Whether at least one tile could slide or merge one step toward
/// `direction`. Checking immediate neighbors is enough: any longer slide
/// starts with a legal first step.
pub fn can_move(grid: &Grid, direction: Direction) -> bool {
    grid.groups(direction).iter().any(|group| {
        group
            .windows(2)
            .any(|pair| match grid.cell(pair[1]).tile_value() {
                Some(value) => grid.cell(pair[0]).can_accept(value),
                None => false,
            })
    })
}

/// Whether any direction still admits a move.
pub fn any_move(grid: &Grid) -> bool {
    Direction::ALL
        .iter()
        .any(|&direction| can_move(grid, direction))
}
