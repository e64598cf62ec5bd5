/// Stable identity for a tile, minted by the grid.
///
/// Cells own their tiles by value, so the id is what lets the presentation
/// layer follow one tile across snapshots while it slides, merges and
/// disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u32);

/// A numbered tile.
///
/// `row`/`col` record where the owning cell sits; every link refreshes
/// them, so they lag only while a tile is being handed between cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub row: usize,
    pub col: usize,
}

impl Tile {
    pub fn new(id: TileId, value: u32, row: usize, col: usize) -> Self {
        Self {
            id,
            value,
            row,
            col,
        }
    }
}
