//! Turn orchestration: input, slide, merge, spawn, terminal check.

use futures::future::join_all;
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::GameConfig;
use super::direction::Direction;
use super::engine;
use super::grid::Grid;
use super::presenter::{AnimationSignal, GameView, Presenter};

/// Where the controller is in its move cycle.
///
/// Input is acted on only in `AwaitingInput`; `GameOver` is terminal until
/// a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Resolving(Direction),
    Spawning,
    GameOver,
}

/// Outcome of feeding one direction to [`GameController::shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing can move that way, or the game is already over; the board
    /// is untouched and no tile spawned
    Rejected,
    /// The move resolved and a reply tile spawned
    Moved,
    /// The move resolved and the reply tile left no further moves
    Ended,
}

/// Drives one game: owns the grid, the RNG and the presenter seam.
pub struct GameController<P: Presenter> {
    config: GameConfig,
    grid: Grid,
    presenter: P,
    rng: StdRng,
    phase: Phase,
    moves: u32,
}

impl<P: Presenter> GameController<P> {
    /// Start a game: fresh grid, two opening tiles, first snapshot
    /// published.
    pub fn new(config: GameConfig, presenter: P, rng: StdRng) -> Self {
        let mut controller = Self {
            grid: Grid::new(config.grid_size),
            config,
            presenter,
            rng,
            phase: Phase::AwaitingInput,
            moves: 0,
        };
        controller.deal_opening_tiles();
        controller
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Throw the board away and deal a new game.
    pub fn restart(&mut self) {
        info!(moves = self.moves, "restarting game");
        self.grid = Grid::new(self.config.grid_size);
        self.moves = 0;
        self.phase = Phase::AwaitingInput;
        self.deal_opening_tiles();
    }

    fn deal_opening_tiles(&mut self) {
        let mut spawns = Vec::new();
        for _ in 0..2 {
            let spawn = self
                .grid
                .spawn_random_tile(&mut self.rng, self.config.four_tile_chance)
                .expect("a fresh grid has room for the opening tiles");
            spawns.push(spawn);
        }
        self.publish();
        for spawn in &spawns {
            // Opening pops are not awaited; play can start under them.
            let _ = self.presenter.begin_spawn(spawn);
        }
    }

    fn publish(&mut self) {
        self.presenter.show_view(GameView::capture(&self.grid, self.moves));
    }

    /// Resolve one directional input end to end.
    ///
    /// Slides first and waits for every slide animation, then runs the
    /// deferred merge pass and waits again, then spawns the reply tile and
    /// checks whether any move is left. A rejected input touches nothing.
    pub async fn shift(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase == Phase::GameOver || !engine::can_move(&self.grid, direction) {
            debug!(?direction, "move rejected");
            return MoveOutcome::Rejected;
        }

        self.phase = Phase::Resolving(direction);
        let slides = engine::slide_tiles(&mut self.grid, direction);
        self.publish();
        let signals: Vec<AnimationSignal> = slides
            .iter()
            .map(|slide| self.presenter.begin_slide(slide))
            .collect();
        join_all(signals.into_iter().map(AnimationSignal::wait)).await;

        let merges = engine::merge_pending(&mut self.grid);
        if !merges.is_empty() {
            self.publish();
            let signals: Vec<AnimationSignal> = merges
                .iter()
                .map(|merge| self.presenter.begin_merge(merge))
                .collect();
            join_all(signals.into_iter().map(AnimationSignal::wait)).await;
        }

        self.phase = Phase::Spawning;
        let spawn = self
            .grid
            .spawn_random_tile(&mut self.rng, self.config.four_tile_chance)
            .expect("a move that changed the board frees at least one cell");
        self.moves += 1;
        self.publish();
        let placement = self.presenter.begin_spawn(&spawn);

        debug!(
            ?direction,
            slides = slides.len(),
            merges = merges.len(),
            moves = self.moves,
            "move resolved"
        );

        if engine::any_move(&self.grid) {
            self.phase = Phase::AwaitingInput;
            MoveOutcome::Moved
        } else {
            // The defeat notice waits for the last tile to land.
            placement.wait().await;
            self.phase = Phase::GameOver;
            self.presenter.announce_defeat();
            info!(
                moves = self.moves,
                highest = self.grid.highest_tile(),
                "no moves left"
            );
            MoveOutcome::Ended
        }
    }
}

#[cfg(test)]
impl<P: Presenter> GameController<P> {
    /// Start from a prepared board instead of a fresh deal.
    fn from_grid(grid: Grid, config: GameConfig, presenter: P, rng: StdRng) -> Self {
        Self {
            config,
            grid,
            presenter,
            rng,
            phase: Phase::AwaitingInput,
            moves: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::engine::{MergeEvent, SlideMove};
    use crate::game::grid::SpawnEvent;
    use crate::game::presenter::NullPresenter;
    use rand::SeedableRng;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorded {
        views: Vec<GameView>,
        slides: Vec<SlideMove>,
        merges: Vec<MergeEvent>,
        spawns: Vec<SpawnEvent>,
        defeats: usize,
    }

    /// Presenter that records every call and completes instantly.
    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Recorded>>);

    impl Presenter for Recorder {
        fn show_view(&mut self, view: GameView) {
            self.0.lock().unwrap().views.push(view);
        }

        fn begin_slide(&mut self, slide: &SlideMove) -> AnimationSignal {
            self.0.lock().unwrap().slides.push(*slide);
            AnimationSignal::finished()
        }

        fn begin_merge(&mut self, merge: &MergeEvent) -> AnimationSignal {
            self.0.lock().unwrap().merges.push(*merge);
            AnimationSignal::finished()
        }

        fn begin_spawn(&mut self, spawn: &SpawnEvent) -> AnimationSignal {
            self.0.lock().unwrap().spawns.push(*spawn);
            AnimationSignal::finished()
        }

        fn announce_defeat(&mut self) {
            self.0.lock().unwrap().defeats += 1;
        }
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_new_game_deals_two_tiles() {
        let recorder = Recorder::default();
        let controller =
            GameController::new(GameConfig::default(), recorder.clone(), rng(1));

        assert_eq!(controller.phase(), Phase::AwaitingInput);
        assert_eq!(controller.moves(), 0);
        assert_eq!(controller.grid().tile_count(), 2);
        for cell in controller.grid().cells() {
            if let Some(value) = cell.tile_value() {
                assert!(value == 2 || value == 4);
            }
        }

        let recorded = recorder.0.lock().unwrap();
        assert_eq!(recorded.spawns.len(), 2);
        assert_eq!(recorded.views.len(), 1);
        assert_eq!(recorded.views[0].tiles.len(), 2);
    }

    #[tokio::test]
    async fn test_shift_slides_merges_and_spawns() {
        let grid = Grid::from_rows(&[
            &[2, 2, 0, 0],
            &[0; 4],
            &[0; 4],
            &[0; 4],
        ]);
        let mut controller =
            GameController::from_grid(grid, GameConfig::default(), NullPresenter, rng(5));

        let outcome = controller.shift(Direction::Left).await;

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(controller.moves(), 1);
        assert_eq!(controller.phase(), Phase::AwaitingInput);
        assert_eq!(controller.grid().to_rows()[0][0], 4);
        // The merged pair collapsed to one tile, plus the reply tile
        assert_eq!(controller.grid().tile_count(), 2);
    }

    #[tokio::test]
    async fn test_rejected_input_changes_nothing() {
        let grid = Grid::from_rows(&[
            &[2, 4, 2, 4],
            &[4, 2, 4, 2],
            &[2, 4, 2, 4],
            &[4, 2, 4, 2],
        ]);
        let recorder = Recorder::default();
        let mut controller =
            GameController::from_grid(grid.clone(), GameConfig::default(), recorder.clone(), rng(5));

        for direction in Direction::ALL {
            assert_eq!(controller.shift(direction).await, MoveOutcome::Rejected);
        }

        assert_eq!(controller.grid(), &grid);
        assert_eq!(controller.moves(), 0);
        assert_eq!(controller.phase(), Phase::AwaitingInput);
        let recorded = recorder.0.lock().unwrap();
        assert!(recorded.spawns.is_empty());
        assert!(recorded.views.is_empty());
    }

    #[tokio::test]
    async fn test_exactly_one_spawn_per_move_into_an_empty_cell() {
        let grid = Grid::from_rows(&[
            &[2, 0, 0, 2],
            &[0; 4],
            &[0; 4],
            &[0; 4],
        ]);
        let recorder = Recorder::default();
        let mut controller =
            GameController::from_grid(grid, GameConfig::default(), recorder.clone(), rng(11));

        assert_eq!(controller.shift(Direction::Left).await, MoveOutcome::Moved);

        let recorded = recorder.0.lock().unwrap();
        assert_eq!(recorded.spawns.len(), 1);
        let spawn = recorded.spawns[0];
        // The snapshot published just before the spawn shows its cell empty
        let before = &recorded.views[recorded.views.len() - 2];
        assert!(before.tiles.iter().all(|tile| tile.at != spawn.at));
        let after = recorded.views.last().unwrap();
        assert!(after
            .tiles
            .iter()
            .any(|tile| tile.id == spawn.tile && tile.at == spawn.at));
    }

    #[tokio::test]
    async fn test_losing_move_ends_the_game() {
        // Left merges the top pair; the forced 2 then locks the board.
        let grid = Grid::from_rows(&[&[2, 2], &[8, 16]]);
        let config = GameConfig {
            grid_size: 2,
            four_tile_chance: 0.0,
            seed: None,
        };
        let recorder = Recorder::default();
        let mut controller = GameController::from_grid(grid, config, recorder.clone(), rng(3));

        let outcome = controller.shift(Direction::Left).await;

        assert_eq!(outcome, MoveOutcome::Ended);
        assert!(controller.is_over());
        assert_eq!(controller.phase(), Phase::GameOver);
        assert_eq!(controller.grid().to_rows(), vec![vec![4, 2], vec![8, 16]]);
        assert_eq!(recorder.0.lock().unwrap().defeats, 1);

        // Terminal: further input is rejected without touching the board
        assert_eq!(controller.shift(Direction::Up).await, MoveOutcome::Rejected);
        assert_eq!(controller.grid().to_rows(), vec![vec![4, 2], vec![8, 16]]);
    }

    #[tokio::test]
    async fn test_restart_deals_a_fresh_board() {
        let grid = Grid::from_rows(&[&[2, 2], &[8, 16]]);
        let config = GameConfig {
            grid_size: 2,
            four_tile_chance: 0.0,
            seed: None,
        };
        let mut controller = GameController::from_grid(grid, config, NullPresenter, rng(3));
        assert_eq!(controller.shift(Direction::Left).await, MoveOutcome::Ended);

        controller.restart();

        assert_eq!(controller.phase(), Phase::AwaitingInput);
        assert_eq!(controller.moves(), 0);
        assert_eq!(controller.grid().tile_count(), 2);
        assert!(!controller.is_over());
    }

    #[tokio::test]
    async fn test_seeded_games_are_reproducible() {
        let config = GameConfig {
            grid_size: 4,
            four_tile_chance: 0.1,
            seed: Some(77),
        };
        let mut a = GameController::new(config.clone(), NullPresenter, rng(77));
        let mut b = GameController::new(config, NullPresenter, rng(77));

        for direction in [Direction::Left, Direction::Up, Direction::Right] {
            let oa = a.shift(direction).await;
            let ob = b.shift(direction).await;
            assert_eq!(oa, ob);
        }
        assert_eq!(a.grid(), b.grid());
    }
}
