//! TUI 2048 - the sliding-tile merge puzzle in the terminal
//!
//! This library provides:
//! - Core game logic (game module): grid, slide/merge engine, turn controller
//! - Terminal key mapping (input module)
//! - Ratatui rendering and tile animations (render module)
//! - Session statistics (metrics module)
//! - Execution modes: interactive play and headless rollouts (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
