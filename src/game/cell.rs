use super::tile::Tile;

/// One fixed board location.
///
/// A cell owns at most one active tile, plus a second tile parked in the
/// merge slot between the slide pass and the merge pass of a move. The
/// slot being single is what limits a cell to one merge per move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    row: usize,
    col: usize,
    tile: Option<Tile>,
    merge_slot: Option<Tile>,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            tile: None,
            merge_slot: None,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn tile_for_merge(&self) -> Option<&Tile> {
        self.merge_slot.as_ref()
    }

    pub fn tile_value(&self) -> Option<u32> {
        self.tile.as_ref().map(|tile| tile.value)
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    pub fn has_tile_for_merge(&self) -> bool {
        self.merge_slot.is_some()
    }

    /// Whether a sliding tile of `value` could land here this turn: the
    /// cell is empty, or holds an equal tile that nothing else has already
    /// claimed for a merge.
    pub fn can_accept(&self, value: u32) -> bool {
        match &self.tile {
            None => true,
            Some(tile) => self.merge_slot.is_none() && tile.value == value,
        }
    }

    /// Take ownership of `tile` as the active tile, refreshing its
    /// recorded position.
    pub fn link_tile(&mut self, mut tile: Tile) {
        debug_assert!(self.tile.is_none(), "linking over an active tile");
        tile.row = self.row;
        tile.col = self.col;
        self.tile = Some(tile);
    }

    /// Park `tile` in the merge slot. It sits on this cell until the merge
    /// pass absorbs it.
    pub fn link_tile_for_merge(&mut self, mut tile: Tile) {
        debug_assert!(self.tile.is_some(), "merge slot needs an active tile to merge with");
        debug_assert!(self.merge_slot.is_none(), "merge slot already claimed");
        tile.row = self.row;
        tile.col = self.col;
        self.merge_slot = Some(tile);
    }

    /// Take the active tile out; the caller decides where it goes next.
    pub fn unlink_tile(&mut self) -> Option<Tile> {
        self.tile.take()
    }

    /// Resolve the pending merge: double the active tile and return the
    /// absorbed one.
    ///
    /// # Panics
    ///
    /// If there is no pending merge tile. Callers guard with
    /// [`Cell::has_tile_for_merge`].
    pub fn merge_tiles(&mut self) -> Tile {
        match (self.tile.as_mut(), self.merge_slot.take()) {
            (Some(tile), Some(absorbed)) => {
                debug_assert_eq!(tile.value, absorbed.value, "merging unequal tiles");
                tile.value *= 2;
                absorbed
            }
            _ => panic!(
                "merge_tiles on cell ({}, {}) without a pending merge",
                self.row, self.col
            ),
        }
    }
}
