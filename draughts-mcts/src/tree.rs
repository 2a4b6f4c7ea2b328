//! MCTS tree structure and node management
//!
//! Uses arena allocation: nodes live in a flat `Vec` and refer to each
//! other by index, so the borrow checker never sees parent/child cycles.

use draughts_core::{Color, Engine, GameState, GameStatus, Move};

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into the arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Visit/win statistics for a tree node
#[derive(Clone, Debug, Default)]
pub struct NodeStats {
    /// Number of times this node was visited
    pub visits: u32,
    /// Accumulated reward, from the perspective of the player who moved
    /// INTO this node
    pub wins: f32,
}

impl NodeStats {
    /// Win rate from this node's perspective
    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.5 // Prior for unexplored nodes
        } else {
            self.wins / self.visits as f32
        }
    }
}

/// A node in the MCTS tree
#[derive(Clone, Debug)]
pub struct MctsNode {
    /// Game state at this node
    pub state: GameState,
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Move that led to this node (None for root)
    pub incoming_move: Option<Move>,
    /// Children as (move, node_id) pairs
    pub children: Vec<(Move, NodeId)>,
    /// Legal moves not yet expanded into children
    pub untried_moves: Vec<Move>,
    /// Visit/win statistics
    pub stats: NodeStats,
    /// Final status if the game is over at this node
    pub terminal_status: Option<GameStatus>,
}

impl MctsNode {
    pub fn new<E: Engine>(
        engine: &E,
        state: GameState,
        parent: Option<NodeId>,
        incoming_move: Option<Move>,
    ) -> Self {
        let terminal_status = match state.status() {
            GameStatus::Ongoing => None,
            finished => Some(finished),
        };

        // Terminal nodes have nothing to expand
        let untried_moves = if terminal_status.is_none() {
            engine.all_moves(&state, state.current_player())
        } else {
            Vec::new()
        };

        Self {
            state,
            parent,
            incoming_move,
            children: Vec::new(),
            untried_moves,
            stats: NodeStats::default(),
            terminal_status,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal_status.is_some()
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// The player who made the move leading into this node. The root has
    /// no incoming move, so its reward perspective is the opponent of the
    /// side to move there.
    pub fn mover(&self) -> Color {
        self.state.current_player().opponent()
    }
}

// ============================================================================
// MCTS TREE
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    nodes: Vec<MctsNode>,
}

impl MctsTree {
    /// Create a new tree rooted at the given state
    pub fn new<E: Engine>(engine: &E, root_state: GameState) -> Self {
        let root = MctsNode::new(engine, root_state, None, None);
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Tree operations
    // ========================================================================

    /// Descend from the root using the tree policy (UCB1) until reaching a
    /// node that is terminal or still has untried moves.
    ///
    /// Returns the selected leaf.
    pub fn select_leaf(&self, exploration: f32) -> NodeId {
        let mut current = self.root();

        while self.get(current).is_fully_expanded() && !self.get(current).is_terminal() {
            match self.select_best_child(current, exploration) {
                Some(best_child) => current = best_child,
                None => break,
            }
        }

        current
    }

    /// Expand a node by adding one child for an untried move.
    ///
    /// Returns the new child's id, or None if the node is fully expanded.
    pub fn expand<E: Engine>(&mut self, engine: &E, node_id: NodeId) -> Option<NodeId> {
        let mv = self.get_mut(node_id).untried_moves.pop()?;
        let child_state = engine.apply(&self.get(node_id).state, &mv);

        let child_id = NodeId(self.nodes.len());
        let child = MctsNode::new(engine, child_state, Some(node_id), Some(mv.clone()));
        self.nodes.push(child);

        self.get_mut(node_id).children.push((mv, child_id));

        Some(child_id)
    }

    /// Select the child with the highest UCB1 value
    fn select_best_child(&self, node_id: NodeId, exploration: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return None;
        }

        let parent_visits = node.stats.visits;

        node.children
            .iter()
            .max_by(|(_, a), (_, b)| {
                let ucb_a = self.ucb1(*a, parent_visits, exploration);
                let ucb_b = self.ucb1(*b, parent_visits, exploration);
                ucb_a.partial_cmp(&ucb_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(_, id)| *id)
    }

    /// UCB1 = wins/visits + C * sqrt(ln(parent_visits) / visits)
    fn ucb1(&self, node_id: NodeId, parent_visits: u32, exploration: f32) -> f32 {
        let node = self.get(node_id);
        let visits = node.stats.visits;

        if visits == 0 {
            return f32::INFINITY; // Prioritize unexplored nodes
        }

        let exploitation = node.stats.win_rate();
        let exploration_term = exploration * ((parent_visits as f32).ln() / visits as f32).sqrt();

        exploitation + exploration_term
    }

    // ========================================================================
    // Backpropagation
    // ========================================================================

    /// Propagate a simulation outcome from a leaf back to the root.
    ///
    /// `winner` is the side that won the playout, or None for an undecided
    /// one. Each node on the path is credited from the perspective of the
    /// player who moved into it.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Option<Color>) {
        let mut current = Some(leaf_id);

        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.visits += 1;

            let reward = match winner {
                None => 0.5,
                Some(color) if color == node.mover() => 1.0,
                Some(_) => 0.0,
            };
            node.stats.wins += reward;

            current = node.parent;
        }
    }

    // ========================================================================
    // Best move selection
    // ========================================================================

    /// The move from the root with the most visits. Ties keep the first
    /// child encountered.
    pub fn best_move(&self) -> Option<Move> {
        let root = self.get(self.root());

        let mut best: Option<(&Move, u32)> = None;
        for (mv, id) in &root.children {
            let visits = self.get(*id).stats.visits;
            if best.map_or(true, |(_, b)| visits > b) {
                best = Some((mv, visits));
            }
        }
        best.map(|(mv, _)| mv.clone())
    }

    /// Total simulations run (root visits)
    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).stats.visits
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::{PieceKind, RulesEngine, Square, Variant};

    fn mock_state() -> GameState {
        GameState::with_pieces(
            Variant::international(),
            &[
                (Color::White, PieceKind::Pawn, Square::new(7, 2)),
                (Color::Black, PieceKind::Pawn, Square::new(2, 3)),
            ],
            Color::White,
        )
    }

    #[test]
    fn test_node_creation() {
        let engine = RulesEngine::new();
        let node = MctsNode::new(&engine, mock_state(), None, None);

        assert!(node.parent.is_none());
        assert!(node.incoming_move.is_none());
        assert!(node.children.is_empty());
        assert!(!node.untried_moves.is_empty());
        assert_eq!(node.stats.visits, 0);
        assert_eq!(node.stats.wins, 0.0);
    }

    #[test]
    fn test_terminal_node_has_no_untried_moves() {
        let engine = RulesEngine::new();
        // Black has no pieces, so the game is already decided
        let state = GameState::with_pieces(
            Variant::international(),
            &[(Color::White, PieceKind::Pawn, Square::new(7, 2))],
            Color::Black,
        );
        assert_eq!(state.status(), GameStatus::WhiteWins);

        let node = MctsNode::new(&engine, state, None, None);
        assert!(node.is_terminal());
        assert!(node.untried_moves.is_empty());
    }

    #[test]
    fn test_tree_creation() {
        let engine = RulesEngine::new();
        let tree = MctsTree::new(&engine, mock_state());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId::ROOT);
    }

    #[test]
    fn test_node_stats_win_rate() {
        let mut stats = NodeStats::default();
        assert_eq!(stats.win_rate(), 0.5); // Prior for unvisited

        stats.visits = 10;
        stats.wins = 7.0;
        assert!((stats.win_rate() - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_ucb1_unexplored_is_infinite() {
        let engine = RulesEngine::new();
        let tree = MctsTree::new(&engine, mock_state());

        let ucb = tree.ucb1(NodeId::ROOT, 100, 1.41);
        assert!(ucb.is_infinite());
    }

    #[test]
    fn test_tree_expansion() {
        let engine = RulesEngine::new();
        let mut tree = MctsTree::new(&engine, mock_state());

        assert!(!tree.get(NodeId::ROOT).untried_moves.is_empty());

        let child_id = tree.expand(&engine, NodeId::ROOT);
        assert!(child_id.is_some());

        let child_id = child_id.unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child_id).parent, Some(NodeId::ROOT));
        assert_eq!(tree.get(child_id).state.current_player(), Color::Black);
    }

    #[test]
    fn test_backpropagation_credits_the_mover() {
        let engine = RulesEngine::new();
        let mut tree = MctsTree::new(&engine, mock_state());
        let child_id = tree.expand(&engine, NodeId::ROOT).unwrap();

        // White moved into the child, so a white win scores 1.0 there and
        // 0.0 at the root (where black is the notional mover).
        tree.backpropagate(child_id, Some(Color::White));

        let child = tree.get(child_id);
        assert_eq!(child.stats.visits, 1);
        assert_eq!(child.stats.wins, 1.0);

        let root = tree.get(NodeId::ROOT);
        assert_eq!(root.stats.visits, 1);
        assert_eq!(root.stats.wins, 0.0);
    }

    #[test]
    fn test_backpropagation_half_point_for_undecided() {
        let engine = RulesEngine::new();
        let mut tree = MctsTree::new(&engine, mock_state());
        let child_id = tree.expand(&engine, NodeId::ROOT).unwrap();

        tree.backpropagate(child_id, None);

        assert_eq!(tree.get(child_id).stats.wins, 0.5);
        assert_eq!(tree.get(NodeId::ROOT).stats.wins, 0.5);
    }

    #[test]
    fn test_best_move_most_visits() {
        let engine = RulesEngine::new();
        let mut tree = MctsTree::new(&engine, mock_state());

        let first = tree.expand(&engine, NodeId::ROOT).unwrap();
        let second = tree.expand(&engine, NodeId::ROOT).unwrap();

        tree.backpropagate(first, Some(Color::Black));
        tree.backpropagate(second, Some(Color::White));
        tree.backpropagate(second, Some(Color::White));

        let expected = tree.get(second).incoming_move.clone().unwrap();
        assert_eq!(tree.best_move(), Some(expected));
    }
}
