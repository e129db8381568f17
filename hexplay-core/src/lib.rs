//! HEXPLAY Core - Game engine and AI
//!
//! This crate provides the core game logic for Dodo and Gopher:
//! - Board geometry (hex grid with cube coordinates)
//! - Board model with per-player piece lists and adjacency tables
//! - Rule engines with reversible moves
//! - Position evaluation with mobility heuristic
//! - CPU-based alpha-beta AI with a per-search transposition cache
//! - Translation to and from the game server's conventions

pub mod hex;
pub mod board;
pub mod error;
pub mod game;
pub mod dodo;
pub mod gopher;
pub mod eval;
pub mod ai;
pub mod config;
pub mod protocol;

// Re-exports for convenient access
pub use hex::{Cell, DIRECTIONS, RED_FORWARD, BLUE_FORWARD};
pub use board::{Board, NeighborTable, Occupant, Player};
pub use error::ConfigError;
pub use game::{GameKind, GameState, Move, Rules, random_move};
pub use dodo::Dodo;
pub use gopher::{Gopher, GopherOpening};
pub use eval::{Heuristics, WIN_SCORE};
pub use ai::{AlphaBetaAI, AlphaBetaOutcome, SearchCache};
pub use config::GameConfig;
pub use protocol::{ExternalCell, ExternalMove, ObservedBoard, decode_board, infer_opponent_move};
