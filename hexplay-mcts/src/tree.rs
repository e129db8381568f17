//! MCTS Tree structure and node management
//!
//! Uses arena allocation for efficient tree operations. Nodes never hold a
//! game state: the search replays the moves from the root on the single
//! live position, and each node keeps the fingerprint of the state it
//! stands for so the replay can be checked.
//!
//! ## Architecture
//! - Level 2: Tree operations (expand, select_child, reroot)
//! - Level 3: UCB1 calculation, node accessors
//! - Level 4: Statistics, utilities

use hexplay_core::{Move, Player, Rules};

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Statistics for a tree node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Number of times this node was visited
    pub visits: u32,
    /// Playouts won by the player who moved TO this node
    pub wins: u32,
    /// Playouts lost by the player who moved TO this node
    pub losses: u32,
}

impl NodeStats {
    /// Signed tally: wins minus losses
    pub fn q(&self) -> i64 {
        self.wins as i64 - self.losses as i64
    }

    /// Mean reward in `[-1, 1]`, 0 when unvisited
    pub fn mean(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.q() as f32 / self.visits as f32
        }
    }

    /// Fraction of playouts won
    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.5
        } else {
            self.wins as f32 / self.visits as f32
        }
    }
}

/// A node in the MCTS tree
#[derive(Clone, Debug)]
pub struct MctsNode {
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Move that led to this node (None for root)
    pub incoming_move: Option<Move>,
    /// Children: (move, node_id) pairs in expansion order
    pub children: Vec<(Move, NodeId)>,
    /// Moves not yet expanded
    pub untried_moves: Vec<Move>,
    /// Visit/win statistics
    pub stats: NodeStats,
    /// Player who moved into this node; its stats count from their side
    pub mover: Player,
    /// No legal move from here
    pub terminal: bool,
    /// `Rules::fingerprint` of the state this node stands for
    pub fingerprint: u64,
}

impl MctsNode {
    /// Create a node for the current position of `game`
    pub fn new<G: Rules>(game: &G, parent: Option<NodeId>, incoming_move: Option<Move>) -> Self {
        let untried_moves = game.legal_moves();
        Self {
            parent,
            incoming_move,
            children: Vec::new(),
            terminal: untried_moves.is_empty(),
            untried_moves,
            stats: NodeStats::default(),
            mover: game.current_player().opponent(),
            fingerprint: game.fingerprint(),
        }
    }

    /// Is this node fully expanded?
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Has this node been visited?
    pub fn is_visited(&self) -> bool {
        self.stats.visits > 0
    }
}

/// Root-level statistics for one move
#[derive(Clone, Debug, PartialEq)]
pub struct MoveStatistics {
    pub mv: Move,
    pub visits: u32,
    pub q: i64,
    pub win_rate: f32,
}

// ============================================================================
// MCTS TREE (Level 2 - Tree Operations)
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Clone, Debug)]
pub struct MctsTree {
    /// Arena storage for nodes; the root is always at index 0
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// Create a new tree rooted at the current position of `game`
    pub fn new<G: Rules>(game: &G) -> Self {
        Self {
            nodes: vec![MctsNode::new(game, None, None)],
        }
    }

    /// Get the root node id
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a reference to a node
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    /// Get the number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fingerprint of the position the root stands for
    pub fn root_fingerprint(&self) -> u64 {
        self.get(self.root()).fingerprint
    }

    /// Expand a node by adding one child.
    ///
    /// The new move is applied to `game` and stays applied: the caller
    /// undoes it together with the rest of the path.
    pub fn expand<G: Rules>(&mut self, node_id: NodeId, game: &mut G) -> Option<(Move, NodeId)> {
        let mv = self.get_mut(node_id).untried_moves.pop()?;
        game.apply(mv);

        let child_id = NodeId(self.nodes.len());
        self.nodes.push(MctsNode::new(game, Some(node_id), Some(mv)));
        self.get_mut(node_id).children.push((mv, child_id));

        Some((mv, child_id))
    }

    /// Select the child maximizing UCB1; the first one wins ties
    pub fn select_child(&self, node_id: NodeId, exploration: f32) -> Option<(Move, NodeId)> {
        let node = self.get(node_id);
        let parent_visits = node.stats.visits;

        let mut best = None;
        let mut best_value = f32::NEG_INFINITY;
        for &(mv, child) in &node.children {
            let value = self.ucb1(child, parent_visits, exploration);
            if best.is_none() || value > best_value {
                best = Some((mv, child));
                best_value = value;
            }
        }
        best
    }

    // ========================================================================
    // Level 3: Selection Helpers
    // ========================================================================

    /// Calculate UCB1 value for a node
    ///
    /// UCB1 = q/visits + C * sqrt(ln(parent_visits) / visits)
    fn ucb1(&self, node_id: NodeId, parent_visits: u32, exploration: f32) -> f32 {
        let stats = &self.get(node_id).stats;
        if stats.visits == 0 {
            return f32::INFINITY; // Prioritize unexplored nodes
        }

        let exploration_term =
            exploration * ((parent_visits.max(1) as f32).ln() / stats.visits as f32).sqrt();
        stats.mean() + exploration_term
    }

    // ========================================================================
    // Level 2: Backpropagation
    // ========================================================================

    /// Record a playout won by `winner` on the path from `leaf_id` to the root
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Player) {
        let mut current = Some(leaf_id);

        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.visits += 1;
            if node.mover == winner {
                node.stats.wins += 1;
            } else {
                node.stats.losses += 1;
            }
            current = node.parent;
        }
    }

    // ========================================================================
    // Level 2: Tree Reuse
    // ========================================================================

    /// Descend into the root child reached by `mv` and make it the new root.
    ///
    /// Returns false, leaving the tree untouched, when `mv` has not been
    /// expanded at the root.
    pub fn advance(&mut self, mv: Move) -> bool {
        let child = self
            .get(self.root())
            .children
            .iter()
            .find(|(m, _)| *m == mv)
            .map(|&(_, id)| id);

        match child {
            Some(id) => {
                self.reroot(id);
                true
            }
            None => false,
        }
    }

    /// Keep only the subtree under `new_root`, compacted into a fresh arena
    fn reroot(&mut self, new_root: NodeId) {
        let mut old: Vec<Option<MctsNode>> = std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut remap = vec![usize::MAX; old.len()];
        let mut order = vec![new_root.0];
        remap[new_root.0] = 0;

        // Breadth-first, so every parent gets its new index before its children
        let mut i = 0;
        while i < order.len() {
            if let Some(node) = &old[order[i]] {
                for &(_, child) in &node.children {
                    remap[child.0] = order.len();
                    order.push(child.0);
                }
            }
            i += 1;
        }

        self.nodes = order
            .into_iter()
            .filter_map(|index| old[index].take())
            .map(|mut node| {
                node.parent = match node.parent {
                    Some(parent) if remap[parent.0] != usize::MAX => Some(NodeId(remap[parent.0])),
                    _ => None,
                };
                for (_, child) in node.children.iter_mut() {
                    *child = NodeId(remap[child.0]);
                }
                node
            })
            .collect();
    }

    // ========================================================================
    // Level 3: Best Move Selection
    // ========================================================================

    /// Most visited root child; ties go to the higher mean, then to the
    /// earliest expanded
    pub fn best_child(&self) -> Option<(Move, NodeId)> {
        let mut best: Option<(Move, NodeId)> = None;
        for &(mv, id) in &self.get(self.root()).children {
            let stats = &self.get(id).stats;
            let better = match best {
                None => true,
                Some((_, best_id)) => {
                    let current = &self.get(best_id).stats;
                    stats.visits > current.visits
                        || (stats.visits == current.visits && stats.mean() > current.mean())
                }
            };
            if better {
                best = Some((mv, id));
            }
        }
        best
    }

    /// Get the best move from root
    pub fn best_move(&self) -> Option<Move> {
        self.best_child().map(|(mv, _)| mv)
    }

    /// Get all root moves with their statistics (for analysis)
    pub fn move_statistics(&self) -> Vec<MoveStatistics> {
        self.get(self.root())
            .children
            .iter()
            .map(|&(mv, id)| {
                let stats = &self.get(id).stats;
                MoveStatistics {
                    mv,
                    visits: stats.visits,
                    q: stats.q(),
                    win_rate: stats.win_rate(),
                }
            })
            .collect()
    }

    /// Get total simulations run (root visits)
    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).stats.visits
    }
}

// ============================================================================
// TESTS
// ============================================================================
