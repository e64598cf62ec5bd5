use serde::{Deserialize, Serialize};

/// Configuration for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width and height of the square grid
    pub grid_size: usize,
    /// Probability that a spawned tile is a 4 instead of a 2
    pub four_tile_chance: f64,
    /// Fixed RNG seed for reproducible games
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            four_tile_chance: 0.1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Smallest playable grid, handy in tests
    pub fn small() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.four_tile_chance, 0.1);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(5);
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.four_tile_chance, 0.1);
    }
}
