//! The seam between the core and whatever presents it.
//!
//! The controller never touches a terminal. It publishes board snapshots,
//! asks its [`Presenter`] to start animations, and awaits the returned
//! signals before advancing a move to its next pass.

use tokio::sync::oneshot;

use super::engine::{MergeEvent, SlideMove};
use super::grid::{Coord, Grid, SpawnEvent};
use super::tile::TileId;

/// Completion signal for one animation.
///
/// The emitter fires exactly once. If the emitter is dropped instead (the
/// renderer shut down mid-move) the signal resolves anyway, so the
/// controller can finish its move and notice the shutdown elsewhere.
#[derive(Debug)]
pub struct AnimationSignal {
    rx: oneshot::Receiver<()>,
}

impl AnimationSignal {
    /// A connected emitter/signal pair.
    pub fn channel() -> (AnimationDone, AnimationSignal) {
        let (tx, rx) = oneshot::channel();
        (AnimationDone { tx }, AnimationSignal { rx })
    }

    /// A signal that is already complete, for presenters that do not
    /// animate.
    pub fn finished() -> AnimationSignal {
        let (done, signal) = Self::channel();
        done.finish();
        signal
    }

    /// Wait for the animation to end.
    pub async fn wait(self) {
        let _ = self.rx.await;
    }
}

/// Emitter half of an [`AnimationSignal`]. Consumed on finish, so each
/// animation completes at most once.
#[derive(Debug)]
pub struct AnimationDone {
    tx: oneshot::Sender<()>,
}

impl AnimationDone {
    pub fn finish(self) {
        let _ = self.tx.send(());
    }
}

/// Snapshot of one tile for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    pub id: TileId,
    pub value: u32,
    pub at: Coord,
    /// Parked in a merge slot, about to be absorbed
    pub merging: bool,
}

/// Full board snapshot, published at every phase boundary of a move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameView {
    pub size: usize,
    pub tiles: Vec<TileView>,
    pub moves: u32,
}

impl GameView {
    /// Capture the grid as plain data. Active tiles come first and
    /// merge-slot tiles last, so overlapping draws keep the incoming tile
    /// on top.
    pub fn capture(grid: &Grid, moves: u32) -> Self {
        let mut tiles = Vec::new();
        for cell in grid.cells() {
            if let Some(tile) = cell.tile() {
                tiles.push(TileView {
                    id: tile.id,
                    value: tile.value,
                    at: Coord::new(tile.row, tile.col),
                    merging: false,
                });
            }
        }
        for cell in grid.cells() {
            if let Some(tile) = cell.tile_for_merge() {
                tiles.push(TileView {
                    id: tile.id,
                    value: tile.value,
                    at: Coord::new(tile.row, tile.col),
                    merging: true,
                });
            }
        }
        GameView {
            size: grid.size(),
            tiles,
            moves,
        }
    }

    /// Highest tile in the snapshot, 0 when empty.
    pub fn highest_tile(&self) -> u32 {
        self.tiles.iter().map(|tile| tile.value).max().unwrap_or(0)
    }
}

/// What the controller needs from a presentation layer.
pub trait Presenter {
    /// Publish a fresh board snapshot.
    fn show_view(&mut self, view: GameView);
    /// Start a slide transition; the signal resolves when the tile lands.
    fn begin_slide(&mut self, slide: &SlideMove) -> AnimationSignal;
    /// Start a merge flash on the surviving tile.
    fn begin_merge(&mut self, merge: &MergeEvent) -> AnimationSignal;
    /// Start the placement pop for a spawned tile.
    fn begin_spawn(&mut self, spawn: &SpawnEvent) -> AnimationSignal;
    /// Surface the "no moves left" notice. Fire and forget; the controller
    /// does not wait on it.
    fn announce_defeat(&mut self);
}

/// Presenter that animates nothing: every signal is born complete.
///
/// Used by headless rollouts and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn show_view(&mut self, _view: GameView) {}

    fn begin_slide(&mut self, _slide: &SlideMove) -> AnimationSignal {
        AnimationSignal::finished()
    }

    fn begin_merge(&mut self, _merge: &MergeEvent) -> AnimationSignal {
        AnimationSignal::finished()
    }

    fn begin_spawn(&mut self, _spawn: &SpawnEvent) -> AnimationSignal {
        AnimationSignal::finished()
    }

    fn announce_defeat(&mut self) {}
}
