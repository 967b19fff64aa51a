//! MCTS tree node representation.
//!
//! Each node represents a game state reached by taking an action from the parent.
//! Nodes store visit statistics used for PUCT selection and policy improvement.

use engine_core::{GameState, Outcome, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the MCTS tree.
///
/// Values are win probabilities in `[0, 1]` seen by `perspective`, the player
/// who moved into this node. A parent therefore ranks its children by their
/// mean value directly.
#[derive(Debug, Clone)]
pub struct MctsNode<S> {
    /// Parent node index (NONE for root). Lookup only, never owning.
    pub parent: NodeId,

    /// Action that led to this node from parent
    pub action: usize,

    /// Game state at this node
    pub state: S,

    /// Player whose win probability `value_sum` accumulates
    pub perspective: Player,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Sum of values backpropagated through this node.
    /// Q(s,a) = value_sum / visit_count
    pub value_sum: f32,

    /// Prior probability P(s,a) of selecting this node from its parent.
    pub prior: f32,

    /// Whether this is a terminal state (game over)
    pub is_terminal: bool,

    /// Exact outcome value for `perspective` (only valid if is_terminal)
    pub terminal_value: f32,

    /// Children: (action, NodeId) pairs in ascending action order.
    /// Empty until node is expanded.
    pub children: Vec<(usize, NodeId)>,
}

impl<S: GameState> MctsNode<S> {
    /// Create a new root node.
    pub fn new_root(state: S) -> Self {
        let perspective = state.player().opponent();
        Self::build(NodeId::NONE, 0, 1.0, state, perspective) // Root has prior 1.0
    }

    /// Create a new child node, `perspective` being the parent's mover.
    pub fn new_child(parent: NodeId, action: usize, prior: f32, state: S, perspective: Player) -> Self {
        Self::build(parent, action, prior, state, perspective)
    }

    fn build(parent: NodeId, action: usize, prior: f32, state: S, perspective: Player) -> Self {
        let outcome: Option<Outcome> = state.winner();
        Self {
            parent,
            action,
            perspective,
            visit_count: 0,
            value_sum: 0.0,
            prior,
            is_terminal: outcome.is_some(),
            terminal_value: outcome.map_or(0.0, |o| o.value_for(perspective)),
            children: Vec::new(),
            state,
        }
    }
}

impl<S> MctsNode<S> {
    /// Calculate mean value Q(s,a) = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// PUCT score for child selection.
    /// score(s,a) = Q(s,a) + c_puct * P(s,a) * sqrt(sum of sibling visits) / (1 + N(s,a))
    ///
    /// Takes a pre-computed square root so the parent computes it once per
    /// selection step.
    #[inline]
    pub fn ucb_score(&self, sibling_visits_sqrt: f32, c_puct: f32) -> f32 {
        let u = c_puct * self.prior * sibling_visits_sqrt / (1.0 + self.visit_count as f32);
        self.mean_value() + u
    }

    /// Check if this node has been expanded (has children).
    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this is a leaf node (not expanded or terminal).
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_terminal || !self.is_expanded()
    }

    /// Child reached by `action`, if expanded.
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_tictactoe::TicTacToe;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = MctsNode::new_root(TicTacToe::new());

        assert!(node.parent.is_none());
        assert_eq!(node.visit_count, 0);
        assert!((node.prior - 1.0).abs() < 1e-6);
        assert!(!node.is_terminal);
        assert!(node.children.is_empty());
        // X moves first, so the root holds O's view
        assert_eq!(node.perspective, Player::Two);
    }

    #[test]
    fn test_terminal_child_value() {
        // X completes the top row
        let won = TicTacToe::from_moves(&[0, 3, 1, 4, 2]);
        let child = MctsNode::new_child(NodeId(0), 2, 0.2, won, Player::One);

        assert!(child.is_terminal);
        assert!((child.terminal_value - 1.0).abs() < 1e-6);

        let drawn = TicTacToe::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        let child = MctsNode::new_child(NodeId(0), 8, 1.0, drawn, Player::One);
        assert!((child.terminal_value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_mean_value() {
        let mut node = MctsNode::new_root(TicTacToe::new());

        // Unvisited
        assert!((node.mean_value()).abs() < 1e-6);

        // After visits
        node.visit_count = 4;
        node.value_sum = 3.0;
        assert!((node.mean_value() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = MctsNode::new_root(TicTacToe::new());
        node.prior = 0.5;
        node.visit_count = 10;
        node.value_sum = 5.0; // Q = 0.5

        // score = 0.5 + 1.0 * 0.5 * 10 / 11 = 0.9545...
        let score = node.ucb_score(100f32.sqrt(), 1.0);
        assert!((score - 0.9545).abs() < 0.01);
    }

    #[test]
    fn test_is_leaf() {
        let mut node = MctsNode::new_root(TicTacToe::new());

        // Initially a leaf (no children)
        assert!(node.is_leaf());

        // Add a child
        node.children.push((4, NodeId(1)));
        assert!(!node.is_leaf());
        assert_eq!(node.child(4), Some(NodeId(1)));
        assert_eq!(node.child(0), None);
    }
}
