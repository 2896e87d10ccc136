use std::{collections::HashMap, fmt::Debug, hash::Hash};

use itertools::Itertools;
use maze_types::{Direction, Maze};
use mcts::policies::{select_first_max, select_random};
use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::{NodeId, RewardNode, Rewards, SearchError, Tactic};

/// Where a corridor walk from a junction ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk<P> {
    pub junction: P,
    pub distance: u32,
    pub exit: Direction,
    pub entry: Direction,
}

/// Follows the corridor leaving `from` in `dir` until the next junction.
///
/// Corners are turned and dead ends reversed. Returns `None` once the running
/// distance passes `horizon` or the walk gets stuck.
pub fn walk_to_junction<M: Maze>(
    maze: &M,
    from: M::Position,
    dir: Direction,
    start: u32,
    horizon: u32,
) -> Option<Walk<M::Position>> {
    let step = maze.node_distance().max(1);
    let mut heading = dir;
    let mut current = maze.neighbor(from, dir)?;
    let mut distance = start.saturating_add(step);
    loop {
        if distance > horizon {
            return None;
        }
        if maze.is_junction(current) {
            return Some(Walk {
                junction: current,
                distance,
                exit: dir,
                entry: heading,
            });
        }
        if let Some(next) = maze.neighbor(current, heading) {
            current = next;
            distance = distance.saturating_add(step);
            continue;
        }
        let open = maze.possible_directions(current);
        let back = heading.opposite();
        heading = match open.iter().copied().find(|d| *d != back) {
            Some(turn) => turn,
            None if open.contains(&back) => back,
            None => return None,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// Some child is still below the visit threshold.
    Random,
    Ucb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub child: NodeId,
    pub kind: SelectionKind,
}

/// Persistent UCT tree over maze junctions.
///
/// Nodes live in a flat arena and are never removed; moving the root to
/// another node flips edges instead of rebuilding.
#[derive(Debug, Clone)]
pub struct SearchTree<P> {
    nodes: Vec<RewardNode<P>>,
    root: NodeId,
}

impl<P: Copy + Eq + Hash + Debug> SearchTree<P> {
    #[must_use]
    pub fn new(position: P) -> Self {
        let mut root = RewardNode::new(position);
        root.in_tree = true;
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &RewardNode<P> {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// First registered node standing on `position`.
    #[must_use]
    pub fn find(&self, position: P) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.position == position)
            .map(NodeId)
    }

    pub fn add_child(
        &mut self,
        parent: NodeId,
        position: P,
        distance: u32,
        exit: Option<Direction>,
        entry: Option<Direction>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut child = RewardNode::new(position);
        child.parent = Some(parent);
        child.distance = distance;
        child.exit = exit;
        child.entry = entry;
        self.nodes.push(child);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Materializes one child per corridor leaving `id` that reaches a
    /// junction within `horizon`. Returns the number of children added.
    pub fn expand<M: Maze<Position = P>>(&mut self, id: NodeId, maze: &M, horizon: u32) -> usize {
        let node = &self.nodes[id.0];
        let position = node.position;
        let distance = node.distance;
        let parent = node.parent.map(|p| self.nodes[p.0].position);
        let existing: SmallVec<P, 4> = node
            .children
            .iter()
            .map(|c| self.nodes[c.0].position)
            .collect();

        let mut added = 0;
        for dir in maze.possible_directions(position) {
            let Some(walk) = walk_to_junction(maze, position, dir, distance, horizon) else {
                continue;
            };
            if walk.junction == position
                || Some(walk.junction) == parent
                || existing.contains(&walk.junction)
            {
                continue;
            }
            self.add_child(id, walk.junction, walk.distance, Some(walk.exit), Some(walk.entry));
            added += 1;
        }
        self.nodes[id.0].in_tree = true;
        trace!(node = id.0, ?position, added, "expanded");
        added
    }

    #[must_use]
    pub fn mean_reward(&self, id: NodeId, component: Tactic) -> f64 {
        self.nodes[id.0].mean_reward(component)
    }

    /// Best mean reachable below `id`: the node's own mean at a leaf, the best
    /// child otherwise, and negative infinity for branches not yet in the tree.
    #[must_use]
    pub fn maximum_mean_reward(&self, id: NodeId, component: Tactic) -> f64 {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            let node = &self.nodes[current.0];
            if node.in_tree {
                stack.extend(node.children.iter().copied());
            }
        }

        let mut best: HashMap<NodeId, f64> = HashMap::with_capacity(order.len());
        for current in order.into_iter().rev() {
            let node = &self.nodes[current.0];
            let value = if node.is_leaf() {
                node.mean_reward(component)
            } else if !node.in_tree {
                f64::NEG_INFINITY
            } else {
                node.children
                    .iter()
                    .map(|c| best[c])
                    .fold(f64::NEG_INFINITY, f64::max)
            };
            best.insert(current, value);
        }
        best[&id]
    }

    /// Combined value used for ranking: the tactic's objective scaled by survival.
    #[must_use]
    pub fn value(&self, id: NodeId, tactic: Tactic) -> f64 {
        let survival = self.maximum_mean_reward(id, Tactic::Survival);
        if survival == f64::NEG_INFINITY {
            return survival;
        }
        match tactic {
            Tactic::Ghost | Tactic::Pill => self.maximum_mean_reward(id, tactic) * survival,
            Tactic::Survival => survival,
        }
    }

    /// Picks the child of `id` to descend into.
    ///
    /// Uniform while any child has fewer than `visit_threshold` visits, UCB1
    /// over [`value`](Self::value) afterwards. `None` for a childless node.
    pub fn select_child<R: Rng>(
        &self,
        id: NodeId,
        tactic: Tactic,
        exploration: f64,
        visit_threshold: u64,
        rng: &mut R,
    ) -> Option<Selection> {
        let node = &self.nodes[id.0];
        let children = &node.children;
        if children
            .iter()
            .any(|c| self.nodes[c.0].visits < visit_threshold)
        {
            let (_, child) = select_random(children.iter(), rng)?;
            return Some(Selection {
                child: *child,
                kind: SelectionKind::Random,
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let ln_parent = (node.visits.max(1) as f64).ln();
        let (_, child) = select_first_max(children.iter(), |c| {
            #[allow(clippy::cast_precision_loss)]
            let visits = self.nodes[c.0].visits.max(1) as f64;
            self.value(**c, tactic) + exploration * (ln_parent / visits).sqrt()
        })?;
        Some(Selection {
            child: *child,
            kind: SelectionKind::Ucb,
        })
    }

    /// Credits a playout to `id` and all of its ancestors.
    ///
    /// The credited node's older samples are aged by `decay` before the new
    /// sample lands.
    pub fn backup(&mut self, id: NodeId, rewards: &Rewards, decay: f64) {
        self.nodes[id.0].decay(decay);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.0];
            node.credit(rewards);
            current = node.parent;
        }
    }

    pub fn decay(&mut self, id: NodeId, factor: f64) {
        self.nodes[id.0].decay(factor);
    }

    /// Nodes from `id` up to and including the root.
    #[must_use]
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            path.push(parent);
            current = self.nodes[parent.0].parent;
        }
        path
    }

    /// Moves the root to the node standing on `position`.
    ///
    /// Every edge between the old and the new root is inverted and distances
    /// are recomputed from the unchanged corridor lengths. Statistics and the
    /// node count are untouched.
    pub fn reroot(&mut self, position: P) -> Result<(), SearchError> {
        let new_root = self
            .find(position)
            .ok_or_else(|| SearchError::UnknownPosition(format!("{position:?}")))?;
        if new_root == self.root {
            return Ok(());
        }

        let mut edges = self
            .nodes
            .iter()
            .map(|node| {
                node.parent
                    .map_or(0, |p| node.distance.saturating_sub(self.nodes[p.0].distance))
            })
            .collect_vec();

        let path = self.path_to_root(new_root);
        let inverted = path
            .iter()
            .map(|id| {
                let node = &self.nodes[id.0];
                (node.exit, node.entry, edges[id.0])
            })
            .collect_vec();

        for (i, pair) in path.windows(2).enumerate() {
            let (child, parent) = (pair[0], pair[1]);
            let (exit, entry, edge) = inverted[i];
            self.nodes[parent.0].children.retain(|c| *c != child);
            self.nodes[child.0].children.push(parent);
            let former = &mut self.nodes[parent.0];
            former.parent = Some(child);
            former.exit = entry.map(Direction::opposite);
            former.entry = exit.map(Direction::opposite);
            edges[parent.0] = edge;
        }

        let root = &mut self.nodes[new_root.0];
        root.parent = None;
        root.exit = None;
        root.entry = None;
        root.distance = 0;
        self.root = new_root;

        let mut stack = vec![new_root];
        while let Some(current) = stack.pop() {
            let base = self.nodes[current.0].distance;
            for i in 0..self.nodes[current.0].children.len() {
                let child = self.nodes[current.0].children[i];
                self.nodes[child.0].distance = base + edges[child.0];
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Direction towards the root child with the best value, `None` before
    /// the root has been expanded.
    #[must_use]
    pub fn favored_direction(&self, tactic: Tactic) -> Option<Direction> {
        let children = &self.nodes[self.root.0].children;
        let (_, child) = select_first_max(children.iter(), |c| self.value(**c, tactic))?;
        self.nodes[child.0].exit
    }
}
