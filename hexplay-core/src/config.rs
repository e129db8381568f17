//! Game configuration

use crate::board::Player;
use crate::error::ConfigError;
use crate::game::{GameKind, GameState};
use crate::gopher::GopherOpening;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to set up a starting position
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game: GameKind,
    pub hex_size: i32,
    pub first_player: Player,
    pub gopher_opening: GopherOpening,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game: GameKind::Dodo,
            hex_size: 4,
            first_player: Player::Red,
            gopher_opening: GopherOpening::Anywhere,
        }
    }
}

impl GameConfig {
    pub fn dodo(hex_size: i32) -> Self {
        Self {
            game: GameKind::Dodo,
            hex_size,
            ..Default::default()
        }
    }

    pub fn gopher(hex_size: i32) -> Self {
        Self {
            game: GameKind::Gopher,
            hex_size,
            ..Default::default()
        }
    }

    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    pub fn with_opening(mut self, opening: GopherOpening) -> Self {
        self.gopher_opening = opening;
        self
    }

    /// Build the starting position
    pub fn build(&self) -> Result<GameState, ConfigError> {
        GameState::new(self.game, self.hex_size, self.first_player)?.with_opening(self.gopher_opening)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game config: {}", path.display()))?;
        Ok(config)
    }
}
