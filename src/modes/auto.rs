//! Headless random rollouts
//!
//! Plays complete games with a uniform random legal-move policy over the
//! null presenter. Exercises the whole move pipeline without a terminal,
//! and shows how far random play tends to get.

use anyhow::Result;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::game::{Direction, GameConfig, GameController, MoveOutcome, NullPresenter, engine};

/// Result of one finished rollout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloutStats {
    pub moves: u32,
    pub highest_tile: u32,
}

pub struct AutoMode {
    config: GameConfig,
    games: usize,
}

impl AutoMode {
    pub fn new(config: GameConfig, games: usize) -> Self {
        Self { config, games }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut seeder = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.print_header();

        let mut best_tile = 0;
        let mut total_moves: u64 = 0;
        for game in 1..=self.games {
            let stats = play_random_game(&self.config, &mut seeder).await;
            best_tile = best_tile.max(stats.highest_tile);
            total_moves += u64::from(stats.moves);
            info!(
                game,
                moves = stats.moves,
                highest = stats.highest_tile,
                "rollout finished"
            );
            println!(
                "[Game {}/{}] moves: {}, highest tile: {}",
                game, self.games, stats.moves, stats.highest_tile
            );
        }

        println!();
        println!("Best tile reached: {}", best_tile);
        if self.games > 0 {
            println!(
                "Average moves per game: {:.1}",
                total_moves as f64 / self.games as f64
            );
        }

        Ok(())
    }

    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("Random rollouts - 2048");
        println!("{}", "=".repeat(70));
        println!("Games: {}", self.games);
        println!(
            "Grid: {}x{}, four-tile chance: {}",
            self.config.grid_size, self.config.grid_size, self.config.four_tile_chance
        );
    }
}

/// Play one game to the end, picking uniformly among legal directions.
async fn play_random_game(config: &GameConfig, rng: &mut StdRng) -> RolloutStats {
    let game_rng = StdRng::seed_from_u64(rng.gen());
    let mut controller = GameController::new(config.clone(), NullPresenter, game_rng);

    loop {
        let legal: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&direction| engine::can_move(controller.grid(), direction))
            .collect();
        if legal.is_empty() {
            break;
        }
        let direction = legal[rng.gen_range(0..legal.len())];
        if controller.shift(direction).await == MoveOutcome::Ended {
            break;
        }
    }

    RolloutStats {
        moves: controller.moves(),
        highest_tile: controller.grid().highest_tile(),
    }
}
