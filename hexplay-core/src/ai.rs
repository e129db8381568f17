//! CPU-based Alpha-Beta AI

use crate::board::{Occupant, Player};
use crate::eval::Heuristics;
use crate::game::{Move, Rules};
use rustc_hash::FxHashMap;

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Depth-bounded minimax with alpha-beta pruning.
///
/// Red maximizes, Blue minimizes. Moves are searched in generation order,
/// so the result is a pure function of the position and the settings.
#[derive(Clone, Debug)]
pub struct AlphaBetaAI {
    pub depth: u32,
    pub use_cache: bool,
    pub heuristics: Heuristics,
}

/// Result of one search
#[derive(Clone, Debug, PartialEq)]
pub struct AlphaBetaOutcome {
    pub best_move: Option<Move>,
    pub score: f32,
    pub nodes: u64,
    pub cache_hits: u64,
}

impl AlphaBetaAI {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            use_cache: false,
            heuristics: Heuristics::default(),
        }
    }

    /// Enable the per-search transposition cache
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Best move for the player to move. Panics on a terminal position.
    pub fn best_move<G: Rules>(&self, game: &mut G) -> Move {
        match self.search(game).best_move {
            Some(mv) => mv,
            None => panic!("alpha-beta invoked on a terminal position"),
        }
    }

    /// Search the position and leave it exactly as it was.
    ///
    /// The root is always searched at least one ply deep.
    pub fn search<G: Rules>(&self, game: &mut G) -> AlphaBetaOutcome {
        let depth = self.depth.max(1);
        let mut searcher = Searcher {
            heuristics: &self.heuristics,
            cache: self.use_cache.then(SearchCache::default),
            nodes: 0,
            cache_hits: 0,
        };

        let (best_move, score) =
            searcher.alpha_beta(game, depth, f32::NEG_INFINITY, f32::INFINITY);

        tracing::debug!(
            depth,
            nodes = searcher.nodes,
            cache_hits = searcher.cache_hits,
            cache_entries = searcher.cache.as_ref().map_or(0, SearchCache::len),
            score,
            "alpha-beta search finished"
        );

        AlphaBetaOutcome {
            best_move,
            score,
            nodes: searcher.nodes,
            cache_hits: searcher.cache_hits,
        }
    }
}

// ============================================================================
// TRANSPOSITION CACHE
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    player: Player,
    occupancy: Box<[Occupant]>,
    depth: u32,
}

impl CacheKey {
    fn new<G: Rules>(game: &G, depth: u32) -> Self {
        Self {
            player: game.current_player(),
            occupancy: game.board().snapshot(),
            depth,
        }
    }
}

/// Known bounds on the value of a (position, depth) pair
#[derive(Clone, Copy, Debug)]
struct CacheEntry {
    lower: f32,
    upper: f32,
    best_move: Option<Move>,
}

/// Memo table owned by a single search call
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: FxHashMap<CacheKey, CacheEntry>,
}

impl SearchCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a fail-soft result searched with window `(alpha, beta)`
    fn store(&mut self, key: CacheKey, alpha: f32, beta: f32, best_move: Option<Move>, score: f32) {
        let (lower, upper) = if score <= alpha {
            (f32::NEG_INFINITY, score)
        } else if score >= beta {
            (score, f32::INFINITY)
        } else {
            (score, score)
        };

        let entry = self.entries.entry(key).or_insert(CacheEntry {
            lower: f32::NEG_INFINITY,
            upper: f32::INFINITY,
            best_move,
        });
        entry.lower = entry.lower.max(lower);
        entry.upper = entry.upper.min(upper);
        entry.best_move = best_move;
    }
}

// ============================================================================
// SEARCH
// ============================================================================

struct Searcher<'a> {
    heuristics: &'a Heuristics,
    cache: Option<SearchCache>,
    nodes: u64,
    cache_hits: u64,
}

impl Searcher<'_> {
    fn alpha_beta<G: Rules>(
        &mut self,
        game: &mut G,
        depth: u32,
        mut alpha: f32,
        mut beta: f32,
    ) -> (Option<Move>, f32) {
        self.nodes += 1;

        // Probe: answer from stored bounds or narrow the window with them
        let key = match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(&*game, depth);
                if let Some(entry) = cache.entries.get(&key) {
                    if entry.lower >= beta {
                        self.cache_hits += 1;
                        return (entry.best_move, entry.lower);
                    }
                    if entry.upper <= alpha || entry.lower == entry.upper {
                        self.cache_hits += 1;
                        return (entry.best_move, entry.upper);
                    }
                    alpha = alpha.max(entry.lower);
                    beta = beta.min(entry.upper);
                }
                Some(key)
            }
            None => None,
        };
        let (alpha_in, beta_in) = (alpha, beta);

        let legal = game.legal_moves();
        if legal.is_empty() {
            return (None, game.score() as f32);
        }
        if depth == 0 {
            return (None, game.heuristic_evaluation(&legal, self.heuristics));
        }

        let maximizing = game.current_player() == Player::Red;
        let mut best_move = None;
        let mut best_score = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for mv in legal {
            game.apply(mv);
            let (_, score) = self.alpha_beta(game, depth - 1, alpha, beta);
            game.undo(mv);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best_score);
            }

            if beta <= alpha {
                break;
            }
        }

        if let (Some(cache), Some(key)) = (self.cache.as_mut(), key) {
            cache.store(key, alpha_in, beta_in, best_move, best_score);
        }

        (best_move, best_score)
    }
}

// ============================================================================
// TESTS
// ============================================================================
