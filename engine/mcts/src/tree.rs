//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Re-rooting copies the surviving
//! subtree into a fresh arena, so discarded siblings are freed in one go.

use engine_core::{GameState, Player};

use crate::node::{MctsNode, NodeId};

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<S> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<S>>,

    /// Root node index (always 0 after construction or re-rooting)
    root: NodeId,
}

impl<S: GameState> MctsTree<S> {
    /// Create a new tree with the given root state.
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state)],
            root: NodeId(0),
        }
    }

    /// Add a child to a parent node.
    /// Returns the new child's NodeId.
    pub fn add_child(&mut self, parent_id: NodeId, action: usize, prior: f32, state: S) -> NodeId {
        let perspective = self.get(parent_id).state.player();
        let child = MctsNode::new_child(parent_id, action, prior, state, perspective);
        let child_id = self.allocate(child);

        // Add to parent's children
        self.get_mut(parent_id).children.push((action, child_id));

        child_id
    }

    /// Subtree under the root child whose state equals `state`, compacted
    /// into a fresh arena with its parent cleared.
    ///
    /// Returns `None` when no expanded root child matches.
    pub fn reroot(&self, state: &S) -> Option<MctsTree<S>> {
        let new_root = self
            .get(self.root)
            .children
            .iter()
            .map(|(_, id)| *id)
            .find(|id| self.get(*id).state == *state)?;

        let mut nodes = Vec::new();
        let mut root_node = self.get(new_root).clone();
        root_node.parent = NodeId::NONE;
        root_node.children.clear();
        nodes.push(root_node);

        // Depth-first copy: (old id, new id) pairs still to visit
        let mut pending = vec![(new_root, NodeId(0))];
        while let Some((old_id, new_id)) = pending.pop() {
            for &(action, old_child) in &self.get(old_id).children {
                let mut child = self.get(old_child).clone();
                child.parent = new_id;
                child.children.clear();
                let child_id = NodeId(nodes.len() as u32);
                nodes.push(child);
                nodes[new_id.index()].children.push((action, child_id));
                pending.push((old_child, child_id));
            }
        }

        Some(Self {
            nodes,
            root: NodeId(0),
        })
    }
}

impl<S> MctsTree<S> {
    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<S> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Root node.
    #[inline]
    pub fn root_node(&self) -> &MctsNode<S> {
        self.get(self.root)
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<S>] {
        &self.nodes
    }

    /// Select the child of a node with the highest PUCT score.
    /// Ties go to the first child in action order.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<NodeId> {
        let node = self.get(node_id);
        let sibling_visits: u32 = node
            .children
            .iter()
            .map(|(_, id)| self.get(*id).visit_count)
            .sum();
        // Pre-compute sqrt once instead of per-child comparison
        let sibling_visits_sqrt = (sibling_visits as f32).sqrt();

        let mut best: Option<(NodeId, f32)> = None;
        for &(_, id) in &node.children {
            let score = self.get(id).ucb_score(sibling_visits_sqrt, c_puct);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((id, score)),
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate a leaf value from the leaf to the root.
    ///
    /// `value` is the win probability of `perspective`; every node on the way
    /// receives it converted to its own perspective.
    pub fn backpropagate(&mut self, leaf_id: NodeId, value: f32, perspective: Player) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.value_sum += if node.perspective == perspective {
                value
            } else {
                1.0 - value
            };

            current_id = node.parent;
        }
    }

    /// Get the best action from root based on visit counts.
    /// Returns (action, visit_count) of the first most-visited child, or
    /// None if root has no children.
    pub fn best_action(&self) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for &(action, id) in &self.root_node().children {
            let visits = self.get(id).visit_count;
            match best {
                Some((_, best_visits)) if visits <= best_visits => {}
                _ => best = Some((action, visits)),
            }
        }
        best
    }

    /// Visit distribution at the root over the full action space.
    ///
    /// `N(a)^(1/T)` is normalized relative to the largest count so large
    /// counts and small temperatures cannot overflow. Below `1e-6` the
    /// distribution is one-hot on [`MctsTree::best_action`].
    pub fn root_policy(&self, num_actions: usize, temperature: f32) -> Vec<f32> {
        let root = self.root_node();
        let mut policy = vec![0.0; num_actions];

        let Some((best, max_visits)) = self.best_action() else {
            return policy;
        };

        if temperature < 1e-6 || max_visits == 0 {
            // Greedy: all mass on best action
            policy[best] = 1.0;
            return policy;
        }

        let exponent = 1.0 / temperature as f64;
        let mut total = 0.0f64;
        let scaled: Vec<(usize, f64)> = root
            .children
            .iter()
            .map(|&(action, id)| {
                let ratio = self.get(id).visit_count as f64 / max_visits as f64;
                let v = if temperature == 1.0 {
                    ratio
                } else {
                    ratio.powf(exponent)
                };
                total += v;
                (action, v)
            })
            .collect();

        for (action, v) in scaled {
            policy[action] = (v / total) as f32;
        }

        policy
    }

    /// Mean value of each root child over the full action space, `None` for
    /// illegal or unvisited actions.
    pub fn child_win_rates(&self, num_actions: usize) -> Vec<Option<f32>> {
        let mut rates = vec![None; num_actions];
        for &(action, id) in &self.root_node().children {
            let child = self.get(id);
            if child.visit_count > 0 {
                rates[action] = Some(child.mean_value());
            }
        }
        rates
    }
}
