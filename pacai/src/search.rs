use maze_types::Direction;
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    playout, Controller, NodeId, Position, SearchConfig, SearchError, SearchTree, Simulation,
    Tactic,
};

/// Real-time tree search agent.
///
/// Keeps one junction tree alive across ticks and does a single
/// selection/expansion/playout/backup pass per decision.
pub struct MctsPac<S: Simulation, C> {
    config: SearchConfig,
    tactic: Tactic,
    controller: C,
    tree: Option<SearchTree<Position<S>>>,
}

impl<S, C> MctsPac<S, C>
where
    S: Simulation,
    C: Controller<S>,
{
    /// Fails when `config` is out of range.
    pub fn new(config: SearchConfig, tactic: Tactic, controller: C) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            tactic,
            controller,
            tree: None,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn tactic(&self) -> Tactic {
        self.tactic
    }

    pub fn set_tactic(&mut self, tactic: Tactic) {
        self.tactic = tactic;
    }

    pub fn tree(&self) -> Option<&SearchTree<Position<S>>> {
        self.tree.as_ref()
    }

    /// Forgets the tree, e.g. when a new game starts.
    pub fn reset(&mut self) {
        self.tree = None;
    }

    /// Picks a heading for the current tick.
    ///
    /// `None` until the tree knows a single junction beyond the agent.
    pub fn think<R: Rng>(
        &mut self,
        state: &S,
        rng: &mut R,
    ) -> Result<Option<Direction>, SearchError> {
        let position = state.position();
        let tree = match self.tree.take() {
            Some(mut tree) if tree.find(position).is_some() => {
                tree.reroot(position)?;
                debug!(?position, nodes = tree.len(), "reusing tree");
                tree
            }
            _ => {
                debug!(?position, "starting a fresh tree");
                SearchTree::new(position)
            }
        };
        let tree = self.tree.insert(tree);

        // A root that was only ever reached as a leaf has not seen its own exits
        let root = tree.root();
        if !tree.node(root).in_tree() {
            tree.expand(root, state.maze(), self.config.distance_limit);
        }

        self.run_pass(state, rng);
        Ok(self
            .tree
            .as_ref()
            .and_then(|tree| tree.favored_direction(self.tactic)))
    }

    fn run_pass<R: Rng>(&mut self, state: &S, rng: &mut R) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let config = &self.config;
        let mut path: SmallVec<NodeId, 64> = SmallVec::new();
        let mut current = tree.root();

        loop {
            let node = tree.node(current);
            if node.distance() > config.distance_limit {
                let rewards = playout(state, &mut self.controller, config.playout_ticks);
                trace!(node = current.index(), ?rewards, "playout past the horizon");
                tree.backup(current, &rewards, config.decay_factor);
                break;
            }
            if node.is_expandable() {
                tree.expand(current, state.maze(), config.distance_limit);
                let rewards = playout(state, &mut self.controller, config.playout_ticks);
                trace!(node = current.index(), ?rewards, "playout after expansion");
                tree.backup(current, &rewards, config.decay_factor);
                break;
            }
            let selection = tree
                .select_child(
                    current,
                    self.tactic,
                    config.exploration_constant,
                    config.visit_threshold,
                    rng,
                )
                .expect("non-leaf node has children");
            trace!(child = selection.child.index(), kind = ?selection.kind, "descend");
            path.push(current);
            current = selection.child;
        }

        for id in path.iter().rev() {
            tree.decay(*id, config.decay_factor);
        }
    }
}
