//! Strategy selection and the agents that play them
//!
//! A strategy is written `name` or `name:N`:
//! - `random`
//! - `alphabeta:DEPTH`, `alphabeta-cache:DEPTH`
//! - `mc:ITERATIONS` (flat Monte Carlo)
//! - `mcts:ITERATIONS`, `mcts-time:MILLISECONDS`

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use hexplay_core::{random_move, AlphaBetaAI, Move, Rules};
use hexplay_mcts::{FlatMonteCarlo, MctsConfig, MctsPlayer};

// ============================================================================
// STRATEGY SPEC
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StrategySpec {
    Random,
    AlphaBeta { depth: u32, cache: bool },
    MonteCarlo { iterations: u32 },
    Mcts { iterations: u32 },
    MctsTime { millis: u64 },
}

impl FromStr for StrategySpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let spec = match name.to_ascii_lowercase().as_str() {
            "random" => StrategySpec::Random,
            "alphabeta" => StrategySpec::AlphaBeta {
                depth: parse_number(s, name, arg)?,
                cache: false,
            },
            "alphabeta-cache" => StrategySpec::AlphaBeta {
                depth: parse_number(s, name, arg)?,
                cache: true,
            },
            "mc" => StrategySpec::MonteCarlo {
                iterations: parse_number(s, name, arg)?,
            },
            "mcts" => StrategySpec::Mcts {
                iterations: parse_number(s, name, arg)?,
            },
            "mcts-time" => StrategySpec::MctsTime {
                millis: parse_number(s, name, arg)?,
            },
            _ => bail!("unknown strategy `{}`", s),
        };
        Ok(spec)
    }
}

/// Numeric argument of `name:N`, rejected when missing or out of range
fn parse_number<T: FromStr>(spec: &str, name: &str, arg: Option<&str>) -> anyhow::Result<T> {
    let arg = arg.ok_or_else(|| anyhow!("strategy `{}` needs a number, e.g. `{}:100`", name, name))?;
    arg.parse()
        .map_err(|_| anyhow!("invalid number `{}` in strategy `{}`", arg, spec))
}

impl fmt::Display for StrategySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategySpec::Random => write!(f, "random"),
            StrategySpec::AlphaBeta { depth, cache: false } => write!(f, "alphabeta:{}", depth),
            StrategySpec::AlphaBeta { depth, cache: true } => write!(f, "alphabeta-cache:{}", depth),
            StrategySpec::MonteCarlo { iterations } => write!(f, "mc:{}", iterations),
            StrategySpec::Mcts { iterations } => write!(f, "mcts:{}", iterations),
            StrategySpec::MctsTime { millis } => write!(f, "mcts-time:{}", millis),
        }
    }
}

impl TryFrom<String> for StrategySpec {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<StrategySpec> for String {
    fn from(spec: StrategySpec) -> Self {
        spec.to_string()
    }
}

// ============================================================================
// AGENT
// ============================================================================

/// A strategy bound to its search state for the length of one game
pub enum Agent {
    Random(ChaCha8Rng),
    AlphaBeta(AlphaBetaAI),
    MonteCarlo(FlatMonteCarlo, ChaCha8Rng),
    Mcts(MctsPlayer),
}

impl Agent {
    pub fn new(spec: StrategySpec, seed: Option<u64>) -> Self {
        let rng = || match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let mcts = |config: MctsConfig| match seed {
            Some(s) => MctsPlayer::new(config.with_seed(s)),
            None => MctsPlayer::new(config),
        };

        match spec {
            StrategySpec::Random => Agent::Random(rng()),
            StrategySpec::AlphaBeta { depth, cache } => {
                Agent::AlphaBeta(AlphaBetaAI::new(depth).with_cache(cache))
            }
            StrategySpec::MonteCarlo { iterations } => {
                Agent::MonteCarlo(FlatMonteCarlo::new(iterations), rng())
            }
            StrategySpec::Mcts { iterations } => {
                Agent::Mcts(mcts(MctsConfig::default().with_iterations(iterations)))
            }
            StrategySpec::MctsTime { millis } => Agent::Mcts(mcts(
                MctsConfig::default().with_time_limit(Duration::from_millis(millis)),
            )),
        }
    }

    /// Choose a move for the player to move. Panics on a terminal position.
    pub fn choose<G: Rules>(&mut self, game: &mut G) -> Move {
        match self {
            Agent::Random(rng) => random_move(&*game, rng),
            Agent::AlphaBeta(ai) => ai.best_move(game),
            Agent::MonteCarlo(mc, rng) => mc.best_move(game, rng),
            Agent::Mcts(player) => player.best_move(game),
        }
    }

    /// Report the opponent's move so a retained search tree can follow it
    pub fn observe(&mut self, mv: Move) {
        if let Agent::Mcts(player) = self {
            player.advance(mv);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexplay_core::{GameKind, GameState, Player};

    #[test]
    fn test_parse_strategies() {
        assert_eq!("random".parse::<StrategySpec>().unwrap(), StrategySpec::Random);
        assert_eq!(
            "alphabeta:4".parse::<StrategySpec>().unwrap(),
            StrategySpec::AlphaBeta { depth: 4, cache: false }
        );
        assert_eq!(
            "AlphaBeta-Cache:6".parse::<StrategySpec>().unwrap(),
            StrategySpec::AlphaBeta { depth: 6, cache: true }
        );
        assert_eq!(
            "mc:400".parse::<StrategySpec>().unwrap(),
            StrategySpec::MonteCarlo { iterations: 400 }
        );
        assert_eq!(
            "mcts-time:250".parse::<StrategySpec>().unwrap(),
            StrategySpec::MctsTime { millis: 250 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("mcts".parse::<StrategySpec>().is_err());
        assert!("mcts:many".parse::<StrategySpec>().is_err());
        assert!("minimax:3".parse::<StrategySpec>().is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("mcts:5000000000".parse::<StrategySpec>().is_err());
        assert!("alphabeta:-1".parse::<StrategySpec>().is_err());
        assert_eq!(
            "mcts:4294967295".parse::<StrategySpec>().unwrap(),
            StrategySpec::Mcts { iterations: u32::MAX }
        );
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["random", "alphabeta:3", "alphabeta-cache:8", "mc:100", "mcts:5000", "mcts-time:50"] {
            let spec: StrategySpec = text.parse().unwrap();
            assert_eq!(spec.to_string(), text);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let spec = StrategySpec::Mcts { iterations: 300 };
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"mcts:300\"");
        let back: StrategySpec = serde_json::from_str("\"alphabeta:2\"").unwrap();
        assert_eq!(back, StrategySpec::AlphaBeta { depth: 2, cache: false });
    }

    #[test]
    fn test_every_agent_plays_legal_moves() {
        let specs = [
            StrategySpec::Random,
            StrategySpec::AlphaBeta { depth: 2, cache: true },
            StrategySpec::MonteCarlo { iterations: 50 },
            StrategySpec::Mcts { iterations: 50 },
            StrategySpec::MctsTime { millis: 5 },
        ];
        for spec in specs {
            let mut game = GameState::new(GameKind::Gopher, 3, Player::Red).unwrap();
            let mut agent = Agent::new(spec, Some(1));
            let mv = agent.choose(&mut game);
            assert!(game.legal_moves().contains(&mv), "{}", spec);
        }
    }
}
