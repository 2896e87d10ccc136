use maze_types::Direction;

use crate::{RewardHistory, Rewards, Tactic};

/// Index of a node inside its [`SearchTree`](crate::SearchTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A maze junction in the search tree and the rewards sampled through it.
#[derive(Debug, Clone)]
pub struct RewardNode<P> {
    pub(crate) position: P,
    pub(crate) rewards: RewardHistory,
    pub(crate) visits: u64,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) distance: u32,
    // Heading when leaving the parent towards this node
    pub(crate) exit: Option<Direction>,
    // Heading of the last corridor step into this node
    pub(crate) entry: Option<Direction>,
    pub(crate) in_tree: bool,
}

impl<P: Copy> RewardNode<P> {
    pub(crate) fn new(position: P) -> Self {
        Self {
            position,
            rewards: RewardHistory::default(),
            visits: 0,
            children: Vec::new(),
            parent: None,
            distance: 0,
            exit: None,
            entry: None,
            in_tree: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> P {
        self.position
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardHistory {
        &self.rewards
    }

    #[must_use]
    pub fn visits(&self) -> u64 {
        self.visits
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Corridor distance from the tree root.
    #[must_use]
    pub fn distance(&self) -> u32 {
        self.distance
    }

    #[must_use]
    pub fn exit(&self) -> Option<Direction> {
        self.exit
    }

    #[must_use]
    pub fn entry(&self) -> Option<Direction> {
        self.entry
    }

    #[must_use]
    pub fn in_tree(&self) -> bool {
        self.in_tree
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn is_expandable(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn mean_reward(&self, component: Tactic) -> f64 {
        self.rewards.mean(component)
    }

    pub fn decay(&mut self, factor: f64) {
        self.rewards.decay(factor);
    }

    pub(crate) fn credit(&mut self, rewards: &Rewards) {
        self.rewards.push(rewards);
        self.visits += 1;
    }
}
