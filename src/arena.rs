use std::collections::HashMap;

use crate::config::NodeConfig;
use crate::errors::{NodeError, Result};
use crate::handle::Handle;
use crate::node::{Direction, Node};

/// Owner of every node and therefore of every chain built from them.
///
/// Nodes reference their neighbours by [`Handle`], so two adjacent nodes never
/// own each other. The arena may hold any number of separate chains; none of
/// its operations care how long a chain is or where it starts.
#[derive(Debug)]
pub struct Arena<P = serde_json::Value> {
    pub(crate) nodes: HashMap<Handle, Node<P>>,
}

impl<P> Default for Arena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Arena<P> {
    pub fn new() -> Self {
        Arena {
            nodes: HashMap::new(),
        }
    }

    /// Number of nodes stored, across all chains.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, h: Handle) -> bool {
        self.nodes.contains_key(&h)
    }

    pub fn get(&self, h: Handle) -> Option<&Node<P>> {
        self.nodes.get(&h)
    }

    pub fn get_mut(&mut self, h: Handle) -> Option<&mut Node<P>> {
        self.nodes.get_mut(&h)
    }

    /// Creates an isolated node from `config` and returns its handle.
    pub fn create(&mut self, config: NodeConfig<P>) -> Handle
    where
        P: Default,
    {
        let node = config.build();
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Creates an isolated node holding default data and value.
    pub fn spawn(&mut self) -> Handle
    where
        P: Default,
    {
        self.create(NodeConfig::new())
    }

    /// Shortcut for a node that only carries `data`.
    pub fn create_with_data(&mut self, data: P) -> Handle
    where
        P: Default,
    {
        self.create(NodeConfig::new().data(data))
    }

    /// Copies the present fields of `config` onto an existing node.
    ///
    /// Links, the id and undeclared attributes are never touched.
    pub fn assign(&mut self, this: Handle, config: NodeConfig<P>) -> Handle {
        match self.nodes.get_mut(&this) {
            Some(node) => config.apply(node),
            None => tracing::debug!(node = %this, "assign on unknown node"),
        }
        this
    }

    /// Unlinked copy of `this` with a fresh id.
    pub fn clone_node(&mut self, this: Handle) -> Option<Handle>
    where
        P: Clone,
    {
        let copy = self.nodes.get(&this)?.duplicate();
        let id = copy.id;
        self.nodes.insert(id, copy);
        Some(id)
    }

    /// Whether two nodes match on every exposed field other than the id.
    pub fn fields_eq(&self, a: Handle, b: Handle) -> bool
    where
        P: PartialEq,
    {
        match (self.nodes.get(&a), self.nodes.get(&b)) {
            (Some(a), Some(b)) => a.fields_eq(b),
            _ => false,
        }
    }

    /// Detaches `this` and takes it out of the arena.
    ///
    /// Handles still pointing at it (attributes, callers) become unknown.
    pub fn release(&mut self, this: Handle) -> Option<Node<P>> {
        self.remove(this);
        self.nodes.remove(&this)
    }

    pub(crate) fn link(&self, h: Handle, direction: Direction) -> Option<Handle> {
        self.nodes.get(&h).and_then(|n| n.link(direction))
    }

    fn set_link(&mut self, h: Handle, direction: Direction, to: Option<Handle>) {
        if let Some(node) = self.nodes.get_mut(&h) {
            *node.link_mut(direction) = to;
        }
    }

    /// Moves `this` right after `other`, detaching it first.
    pub fn after(&mut self, this: Handle, other: Handle) -> Handle {
        self.insert_after(this, other, true)
    }

    /// Moves `this` right before `other`, detaching it first.
    pub fn before(&mut self, this: Handle, other: Handle) -> Handle {
        self.insert_before(this, other, true)
    }

    /// Links `this` right after `other`.
    ///
    /// With `detach == false` the old neighbours of `this` are left as they
    /// are, which is only sound for nodes that are not part of a chain yet.
    pub fn insert_after(&mut self, this: Handle, other: Handle, detach: bool) -> Handle {
        self.insert(this, other, Direction::Next, detach)
    }

    /// Links `this` right before `other`. See [`Arena::insert_after`].
    pub fn insert_before(&mut self, this: Handle, other: Handle, detach: bool) -> Handle {
        self.insert(this, other, Direction::Previous, detach)
    }

    /// Places `this` on the `side` of `other`.
    ///
    /// `side` is the link of `other` that ends up pointing at `this`:
    /// `Next` for `after`, `Previous` for `before`.
    fn insert(&mut self, this: Handle, other: Handle, side: Direction, detach: bool) -> Handle {
        if this == other || !self.contains(this) || !self.contains(other) {
            tracing::debug!(node = %this, anchor = %other, "skipping insert: not a valid anchor");
            return this;
        }
        if !detach && self.link(other, side) == Some(this) {
            return this;
        }
        if detach {
            self.remove(this);
        }
        let back = side.reverse();
        match self.link(other, side) {
            Some(neighbour) => {
                self.set_link(neighbour, back, Some(this));
                self.set_link(this, side, Some(neighbour));
            }
            // `before` clears `this.previous` even without a neighbour,
            // `after` leaves `this.next` alone.
            None if side == Direction::Previous => self.set_link(this, side, None),
            None => {}
        }
        self.set_link(other, side, Some(this));
        self.set_link(this, back, Some(other));
        tracing::trace!(node = %this, anchor = %other, ?side, "linked");
        this
    }

    /// Unlinks `this`, joining its former neighbours to each other.
    pub fn remove(&mut self, this: Handle) -> Handle {
        let Some(node) = self.nodes.get(&this) else {
            tracing::debug!(node = %this, "remove on unknown node");
            return this;
        };
        let (previous, next) = (node.previous, node.next);
        if let Some(p) = previous {
            self.set_link(p, Direction::Next, next);
            self.set_link(this, Direction::Previous, None);
        }
        if let Some(n) = next {
            self.set_link(n, Direction::Previous, previous);
            self.set_link(this, Direction::Next, None);
        }
        if previous.is_some() || next.is_some() {
            tracing::trace!(node = %this, "unlinked");
        }
        this
    }

    /// Puts `this` where `victim` is; `victim` ends up unlinked.
    ///
    /// An isolated victim leaves everything unchanged.
    pub fn replace(&mut self, this: Handle, victim: Handle) -> Handle {
        if this == victim || !self.contains(this) {
            tracing::debug!(node = %this, victim = %victim, "skipping replace");
            return this;
        }
        let Some(node) = self.nodes.get(&victim) else {
            tracing::debug!(node = %this, victim = %victim, "replace of unknown node");
            return this;
        };
        match (node.previous, node.next) {
            (Some(previous), _) => {
                self.remove(victim);
                self.after(this, previous);
            }
            (None, Some(next)) => {
                self.remove(victim);
                self.before(this, next);
            }
            (None, None) => {}
        }
        this
    }

    /// Verifies that every `a.next == b` is matched by `b.previous == a` and
    /// the other way round, and that links point at stored nodes.
    pub fn check_links(&self) -> Result<()> {
        for (&id, node) in &self.nodes {
            for direction in [Direction::Previous, Direction::Next] {
                let Some(to) = node.link(direction) else {
                    continue;
                };
                let back = match self.nodes.get(&to) {
                    Some(neighbour) => neighbour.link(direction.reverse()),
                    None => {
                        return Err(NodeError::BrokenLink {
                            from: id,
                            to,
                            reason: "link to a node outside the arena",
                        })
                    }
                };
                if back != Some(id) {
                    return Err(NodeError::BrokenLink {
                        from: id,
                        to,
                        reason: match direction {
                            Direction::Next => "next.previous does not point back",
                            Direction::Previous => "previous.next does not point back",
                        },
                    });
                }
            }
        }
        Ok(())
    }
}
