//! Searching and walking chains.
//!
//! Every walk here is a loop over handles, so chain length never turns into
//! stack depth. A chain that links back onto itself makes the unbounded walks
//! (`lookup`, `to_array`, `pluck`, misses in `find`) spin forever.

use std::collections::VecDeque;

use crate::arena::Arena;
use crate::handle::Handle;
use crate::node::{Direction, Field, Node};

/// Handles visited from a starting node, following one link.
pub(crate) struct Walk<'a, P> {
    arena: &'a Arena<P>,
    cursor: Option<Handle>,
    direction: Direction,
}

impl<'a, P> Iterator for Walk<'a, P> {
    type Item = (Handle, &'a Node<P>);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.cursor?;
        let node = self.arena.get(h)?;
        self.cursor = node.link(self.direction);
        Some((h, node))
    }
}

impl<P> Arena<P> {
    /// `from` itself, then every node reached through `direction`.
    pub(crate) fn walk(&self, from: Handle, direction: Direction) -> Walk<'_, P> {
        Walk {
            arena: self,
            cursor: Some(from),
            direction,
        }
    }

    /// First node, starting at `this`, whose `field` equals `target`.
    pub fn find(
        &self,
        this: Handle,
        target: &P,
        direction: Direction,
        field: Field<'_>,
    ) -> Option<Handle>
    where
        P: PartialEq,
    {
        self.walk(this, direction)
            .find(|(_, node)| node.field(field) == Some(target))
            .map(|(h, _)| h)
    }

    /// Last node reachable from `this` through `direction`: the head for
    /// `Previous`, the tail for `Next`.
    pub fn lookup(&self, this: Handle, direction: Direction) -> Option<Handle> {
        self.walk(this, direction).last().map(|(h, _)| h)
    }

    /// Head of the chain `this` belongs to.
    pub fn head(&self, this: Handle) -> Option<Handle> {
        self.lookup(this, Direction::Previous)
    }

    /// Tail of the chain `this` belongs to.
    pub fn tail(&self, this: Handle) -> Option<Handle> {
        self.lookup(this, Direction::Next)
    }

    /// Longest run starting at `this` for which `predicate(node, index)`
    /// holds, in `previous → next` order whichever way it was walked.
    pub fn filter<F>(&self, this: Handle, direction: Direction, mut predicate: F) -> Vec<Handle>
    where
        F: FnMut(&Node<P>, usize) -> bool,
    {
        let mut run = VecDeque::new();
        for (index, (h, node)) in self.walk(this, direction).enumerate() {
            if !predicate(node, index) {
                break;
            }
            match direction {
                Direction::Next => run.push_back(h),
                Direction::Previous => run.push_front(h),
            }
        }
        run.into()
    }

    /// Nodes after `this` up to, not including, the first whose `field`
    /// equals `target`.
    pub fn until(
        &self,
        this: Handle,
        target: &P,
        direction: Direction,
        field: Field<'_>,
    ) -> Vec<Handle>
    where
        P: PartialEq,
    {
        self.run_from_neighbour(this, direction, |node| node.field(field) != Some(target))
    }

    /// Consecutive nodes after `this` whose `field` equals `target`.
    pub fn while_eq(
        &self,
        this: Handle,
        target: &P,
        direction: Direction,
        field: Field<'_>,
    ) -> Vec<Handle>
    where
        P: PartialEq,
    {
        self.run_from_neighbour(this, direction, |node| node.field(field) == Some(target))
    }

    /// Consecutive neighbours of `this` on one side sharing `target` in `field`.
    ///
    /// Same run as [`Arena::while_eq`]; kept separate because callers
    /// usually match siblings on `Field::Data` rather than `Field::Value`.
    pub fn siblings(
        &self,
        this: Handle,
        target: &P,
        direction: Direction,
        field: Field<'_>,
    ) -> Vec<Handle>
    where
        P: PartialEq,
    {
        self.while_eq(this, target, direction, field)
    }

    fn run_from_neighbour<F>(&self, this: Handle, direction: Direction, mut keep: F) -> Vec<Handle>
    where
        F: FnMut(&Node<P>) -> bool,
    {
        match self.link(this, direction) {
            Some(start) => self.filter(start, direction, |node, _| keep(node)),
            None => Vec::new(),
        }
    }

    /// `data` of `this` and of every node after it.
    pub fn pluck(&self, this: Handle) -> Vec<&P> {
        self.walk(this, Direction::Next).map(|(_, node)| node.data()).collect()
    }

    /// `field` of `this` and of every node after it; `None` where a node
    /// lacks a comparable value for it.
    pub fn pluck_field(&self, this: Handle, field: Field<'_>) -> Vec<Option<&P>> {
        self.walk(this, Direction::Next).map(|(_, node)| node.field(field)).collect()
    }

    /// The whole chain of `this`, head first.
    pub fn to_array(&self, this: Handle) -> Vec<Handle> {
        if !self.contains(this) {
            return Vec::new();
        }
        let mut nodes: Vec<Handle> = match self.link(this, Direction::Previous) {
            Some(previous) => self.walk(previous, Direction::Previous).map(|(h, _)| h).collect(),
            None => Vec::new(),
        };
        nodes.reverse();
        nodes.extend(self.walk(this, Direction::Next).map(|(h, _)| h));
        nodes
    }
}
