use rand::Rng;

use super::cell::Cell;
use super::direction::Direction;
use super::tile::{Tile, TileId};

/// A (row, column) position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A tile freshly placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnEvent {
    pub tile: TileId,
    pub value: u32,
    pub at: Coord,
}

/// The board: `size * size` cells, created once per game and never
/// recreated. Tiles move between cells; cells stay put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
    next_tile_id: u32,
}

impl Grid {
    /// # Panics
    ///
    /// If `size < 2`: the opening deal needs room for two tiles.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid must be at least 2x2");
        let cells = (0..size)
            .flat_map(|row| (0..size).map(move |col| Cell::new(row, col)))
            .collect();
        Self {
            size,
            cells,
            next_tile_id: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, coord: Coord) -> usize {
        assert!(
            coord.row < self.size && coord.col < self.size,
            "coordinate ({}, {}) is outside the {}x{} grid",
            coord.row,
            coord.col,
            self.size,
            self.size
        );
        coord.row * self.size + coord.col
    }

    /// # Panics
    ///
    /// If `coord` is out of bounds. Traversals only produce valid
    /// coordinates, so hitting this is a programming error.
    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    pub fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let index = self.index(coord);
        &mut self.cells[index]
    }

    /// Row-major coordinate order, the order the merge pass scans in.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    /// Cells holding no tile at all, merge slots included.
    pub fn empty_coords(&self) -> Vec<Coord> {
        self.coords()
            .filter(|&coord| {
                let cell = self.cell(coord);
                cell.is_empty() && !cell.has_tile_for_merge()
            })
            .collect()
    }

    /// Number of cells with an active tile.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Uniform pick among empty cells; `None` when the board is full.
    pub fn random_empty_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Coord> {
        let empty = self.empty_coords();
        if empty.is_empty() {
            None
        } else {
            Some(empty[rng.gen_range(0..empty.len())])
        }
    }

    /// Mint a 2-or-4 tile and link it into a random empty cell.
    ///
    /// Returns `None` when the board is full; callers that just freed a
    /// cell can rely on `Some`.
    pub fn spawn_random_tile<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        four_tile_chance: f64,
    ) -> Option<SpawnEvent> {
        let at = self.random_empty_coord(rng)?;
        let value = if rng.gen_bool(four_tile_chance) { 4 } else { 2 };
        let tile = self.mint_tile(value, at);
        let id = tile.id;
        self.cell_mut(at).link_tile(tile);
        Some(SpawnEvent {
            tile: id,
            value,
            at,
        })
    }

    fn mint_tile(&mut self, value: u32, at: Coord) -> Tile {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        Tile::new(id, value, at.row, at.col)
    }

    /// The four canonical traversals: one group per row or column, ordered
    /// from the edge the move pushes toward (index 0) out to the far edge.
    pub fn groups(&self, direction: Direction) -> Vec<Vec<Coord>> {
        let n = self.size;
        match direction {
            Direction::Up => (0..n)
                .map(|col| (0..n).map(|row| Coord::new(row, col)).collect())
                .collect(),
            Direction::Down => (0..n)
                .map(|col| (0..n).rev().map(|row| Coord::new(row, col)).collect())
                .collect(),
            Direction::Left => (0..n)
                .map(|row| (0..n).map(|col| Coord::new(row, col)).collect())
                .collect(),
            Direction::Right => (0..n)
                .map(|row| (0..n).rev().map(|col| Coord::new(row, col)).collect())
                .collect(),
        }
    }

    /// Highest tile value on the board, 0 when the board is empty.
    pub fn highest_tile(&self) -> u32 {
        self.cells
            .iter()
            .filter_map(|cell| cell.tile_value())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
impl Grid {
    /// Build a grid from a value matrix; 0 means empty.
    pub(crate) fn from_rows(rows: &[&[u32]]) -> Self {
        let size = rows.len();
        let mut grid = Grid::new(size);
        for (row, values) in rows.iter().enumerate() {
            assert_eq!(values.len(), size, "rows must form a square");
            for (col, &value) in values.iter().enumerate() {
                if value != 0 {
                    let at = Coord::new(row, col);
                    let tile = grid.mint_tile(value, at);
                    grid.cell_mut(at).link_tile(tile);
                }
            }
        }
        grid
    }

    /// Value matrix of active tiles; 0 means empty. Tiles parked in merge
    /// slots are not included.
    pub(crate) fn to_rows(&self) -> Vec<Vec<u32>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.cell(Coord::new(row, col)).tile_value().unwrap_or(0))
                    .collect()
            })
            .collect()
    }
}
