//! Core game logic module for 2048
//!
//! This module contains all the game logic without any I/O or rendering
//! dependencies. The controller talks to the outside world only through
//! the [`presenter::Presenter`] seam, so the same core drives the TUI and
//! headless rollouts.

pub mod cell;
pub mod config;
pub mod controller;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod presenter;
pub mod tile;

// Re-export commonly used types
pub use cell::Cell;
pub use config::GameConfig;
pub use controller::{GameController, MoveOutcome, Phase};
pub use direction::Direction;
pub use engine::{MergeEvent, SlideMove};
pub use grid::{Coord, Grid, SpawnEvent};
pub use presenter::{
    AnimationDone, AnimationSignal, GameView, NullPresenter, Presenter, TileView,
};
pub use tile::{Tile, TileId};
