//! Move command - play one turn for an external game driver
//!
//! Reads a JSON turn description, brings the position up to date and
//! prints the chosen move in server coordinates:
//!
//! ```json
//! {"game": {"game": "dodo", "hex_size": 4}, "player": 2,
//!  "board": [[[0, 0], 0], [[1, 0], 2], ...],
//!  "previous": [[[0, 0], 0], ...]}
//! ```
//!
//! When `previous` (the board before the opponent's move) is present, the
//! opponent move is inferred from the two boards and applied; otherwise the
//! position is synchronised directly from `board`.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use hexplay_core::{
    decode_board, infer_opponent_move, ExternalMove, GameConfig, GameKind, GameState,
    ObservedBoard, Player, Rules,
};

use crate::strategy::{Agent, StrategySpec};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct MoveArgs {
    /// Turn description JSON file (stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Strategy used to choose the move
    #[arg(long, default_value = "mcts-time:1000")]
    pub strategy: StrategySpec,
}

/// One turn as reported by the driver
#[derive(Clone, Debug, Deserialize)]
pub struct TurnInput {
    #[serde(default)]
    pub game: GameConfig,
    /// Token of the player to move (1 = red, 2 = blue)
    pub player: i64,
    pub board: ObservedBoard,
    #[serde(default)]
    pub previous: Option<ObservedBoard>,
}

/// Printed answer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnOutput {
    #[serde(rename = "move")]
    pub chosen: ExternalMove,
    pub opponent_move: Option<ExternalMove>,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: MoveArgs, seed: Option<u64>) -> Result<()> {
    let input = read_input(&args)?;
    let output = play_turn(&input, args.strategy, seed)?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn read_input(args: &MoveArgs) -> Result<TurnInput> {
    let content = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read turn file: {}", path.display()))?,
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read turn from stdin")?;
            content
        }
    };
    serde_json::from_str(&content).context("Failed to parse turn description")
}

/// Sync the position, choose a move and translate it back
pub fn play_turn(input: &TurnInput, strategy: StrategySpec, seed: Option<u64>) -> Result<TurnOutput> {
    let player = Player::from_token(input.player)?;
    let (mut game, opponent_move) = current_position(input, player)?;

    check_side_to_move(&input.game, &game, player)?;
    if game.is_terminal() {
        bail!("no legal move left for {:?}", player);
    }

    let mut agent = Agent::new(strategy, seed);
    let chosen = agent.choose(&mut game);
    tracing::info!(?player, %chosen, %strategy, "move chosen");

    Ok(TurnOutput {
        chosen: chosen.to_external(),
        opponent_move,
    })
}

fn current_position(input: &TurnInput, player: Player) -> Result<(GameState, Option<ExternalMove>)> {
    let config = &input.game;

    if let Some(previous) = &input.previous {
        let mut game = synced_state(config, player.opponent(), previous)?;
        if let Some(mv) = infer_opponent_move(&game, &input.board) {
            game.apply(mv);
            return Ok((game, Some(mv.to_external())));
        }
        tracing::warn!("could not infer the opponent move, syncing from the board");
    }

    Ok((synced_state(config, player, &input.board)?, None))
}

/// Gopher stone counts must agree with the reported side to move.
///
/// Dodo pieces only relocate, so its board carries no turn information.
fn check_side_to_move(config: &GameConfig, game: &GameState, player: Player) -> Result<()> {
    if config.game != GameKind::Gopher {
        return Ok(());
    }
    let board = game.board();
    let own = board.count(player);
    let other = board.count(player.opponent());
    let lead = if player == config.first_player { 0 } else { 1 };
    if other != own + lead {
        bail!(
            "board has {} {:?} and {} {:?} stones, so it is not {:?}'s turn",
            own,
            player,
            other,
            player.opponent(),
            player
        );
    }
    Ok(())
}

fn synced_state(config: &GameConfig, to_move: Player, board: &ObservedBoard) -> Result<GameState> {
    let occupied = decode_board(board)?;
    let game = GameState::from_position(config.game, config.hex_size, to_move, &occupied)?;
    Ok(game.with_opening(config.gopher_opening)?)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexplay_core::Move;

    fn observe(game: &GameState) -> ObservedBoard {
        let board = game.board();
        board
            .cells()
            .iter()
            .map(|&cell| (cell.to_offset(), board.get(cell).token() as i64))
            .collect()
    }

    #[test]
    fn test_parse_turn_input() {
        let input: TurnInput = serde_json::from_str(
            r#"{"game": {"game": "gopher", "hex_size": 3}, "player": 1, "board": [[[0, 0], 0], [[1, 1], 2]]}"#,
        )
        .unwrap();
        assert_eq!(input.game.game, GameKind::Gopher);
        assert_eq!(input.player, 1);
        assert_eq!(input.board, vec![((0, 0), 0), ((1, 1), 2)]);
        assert!(input.previous.is_none());
    }

    #[test]
    fn test_turn_from_board_only() {
        let start = GameState::new(GameKind::Dodo, 4, Player::Red).unwrap();
        let input = TurnInput {
            game: GameConfig::dodo(4),
            player: 1,
            board: observe(&start),
            previous: None,
        };

        let output = play_turn(&input, StrategySpec::AlphaBeta { depth: 2, cache: false }, None).unwrap();

        assert!(output.opponent_move.is_none());
        assert!(start.legal_moves().contains(&Move::from_external(output.chosen)));
    }

    #[test]
    fn test_turn_infers_opponent_move() {
        let before = GameState::new(GameKind::Dodo, 4, Player::Red).unwrap();
        let red_move = before.legal_moves()[2];
        let mut after = before.clone();
        after.apply(red_move);

        let input = TurnInput {
            game: GameConfig::dodo(4),
            player: 2,
            board: observe(&after),
            previous: Some(observe(&before)),
        };

        let output = play_turn(&input, StrategySpec::Random, Some(5)).unwrap();

        assert_eq!(output.opponent_move, Some(red_move.to_external()));
        assert!(after.legal_moves().contains(&Move::from_external(output.chosen)));
    }

    #[test]
    fn test_turn_output_json() {
        let output = TurnOutput {
            chosen: ExternalMove::Place((1, 0)),
            opponent_move: None,
        };
        assert_eq!(
            serde_json::to_string(&output).unwrap(),
            r#"{"move":[1,0],"opponent_move":null}"#
        );
    }

    #[test]
    fn test_gopher_turn_must_match_stone_counts() {
        let mut game = GameState::new(GameKind::Gopher, 3, Player::Red).unwrap();
        game.apply(Move::Place(hexplay_core::Cell::ORIGIN));

        // Red has just played, so Blue is to move
        let blue_turn = TurnInput {
            game: GameConfig::gopher(3),
            player: 2,
            board: observe(&game),
            previous: None,
        };
        assert!(play_turn(&blue_turn, StrategySpec::Random, Some(1)).is_ok());

        let red_turn = TurnInput { player: 1, ..blue_turn };
        assert!(play_turn(&red_turn, StrategySpec::Random, Some(1)).is_err());
    }

    #[test]
    fn test_bad_player_token() {
        let input = TurnInput {
            game: GameConfig::gopher(3),
            player: 7,
            board: vec![],
            previous: None,
        };
        assert!(play_turn(&input, StrategySpec::Random, None).is_err());
    }
}
