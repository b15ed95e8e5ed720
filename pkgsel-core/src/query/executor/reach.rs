//! Memoized reachability over the import graph.
//!
//! [`ReachabilityIndex`] answers "can package `p` reach any member of the
//! target set?" for many seeds against one target. It runs Tarjan's strongly
//! connected components algorithm lazily from each unanswered seed: when a
//! component is closed every successor component is already answered, so
//! the component's answer is the OR of its own members and those successors.
//! Answers persist across seeds, which bounds total work by the packages and
//! import edges touched, however many seeds share them.
//!
//! The traversal keeps an explicit stack rather than recursing, so import
//! chains thousands of packages deep do not exhaust the thread stack.

use crate::set::PackageSet;
use crate::universe::{PackageId, Universe};

const UNVISITED: u32 = u32::MAX;

/// Per-target reachability memo.
pub struct ReachabilityIndex<'u> {
    universe: &'u dyn Universe,
    /// Membership of the target set, by package index
    target: Vec<bool>,
    /// Tarjan discovery index, `UNVISITED` until seen
    index: Vec<u32>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    /// Answer, final once `done` is set
    reaches: Vec<bool>,
    done: Vec<bool>,
    stack: Vec<PackageId>,
    next_index: u32,
}

impl<'u> ReachabilityIndex<'u> {
    /// Index answering reachability of `target` in `universe`.
    #[must_use]
    pub fn new(universe: &'u dyn Universe, target: &PackageSet) -> Self {
        let len = universe.len();
        let mut membership = vec![false; len];
        for id in target.iter() {
            if let Some(slot) = membership.get_mut(id.index()) {
                *slot = true;
            }
        }

        Self {
            universe,
            target: membership,
            index: vec![UNVISITED; len],
            lowlink: vec![0; len],
            on_stack: vec![false; len],
            reaches: vec![false; len],
            done: vec![false; len],
            stack: Vec::new(),
            next_index: 0,
        }
    }

    /// True when `seed` is in the target or imports, directly or
    /// transitively, a package that is.
    pub fn reaches(&mut self, seed: PackageId) -> bool {
        let Some(&done) = self.done.get(seed.index()) else {
            return false;
        };
        if !done {
            self.strong_connect(seed);
        }
        self.reaches[seed.index()]
    }

    /// Members of `seeds` that reach the target.
    pub fn filter(&mut self, seeds: &PackageSet) -> PackageSet {
        seeds.iter().filter(|seed| self.reaches(*seed)).collect()
    }

    /// Number of packages answered so far.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.done.iter().filter(|done| **done).count()
    }

    fn visit(&mut self, id: PackageId) {
        let i = id.index();
        self.index[i] = self.next_index;
        self.lowlink[i] = self.next_index;
        self.next_index += 1;
        self.on_stack[i] = true;
        self.reaches[i] = self.target[i];
        self.stack.push(id);
    }

    fn strong_connect(&mut self, root: PackageId) {
        let universe = self.universe;
        // (package, next import to examine)
        let mut frames: Vec<(PackageId, usize)> = vec![(root, 0)];
        self.visit(root);

        while let Some(frame) = frames.last_mut() {
            let (node, edge) = *frame;
            let imports = universe.imports(node);

            if let Some(&next) = imports.get(edge) {
                frame.1 += 1;
                let (n, w) = (node.index(), next.index());
                if w >= self.index.len() {
                    continue;
                }
                if self.index[w] == UNVISITED {
                    self.visit(next);
                    frames.push((next, 0));
                } else if self.on_stack[w] {
                    self.lowlink[n] = self.lowlink[n].min(self.index[w]);
                } else if self.reaches[w] {
                    // Closed component, answer already final
                    self.reaches[n] = true;
                }
                continue;
            }

            frames.pop();
            let n = node.index();
            if self.lowlink[n] == self.index[n] {
                self.close_component(node);
            }
            if let Some(&(parent, _)) = frames.last() {
                let p = parent.index();
                self.lowlink[p] = self.lowlink[p].min(self.lowlink[n]);
                if self.reaches[n] {
                    self.reaches[p] = true;
                }
            }
        }
    }

    /// Pop the component rooted at `root` and give all members one answer.
    fn close_component(&mut self, root: PackageId) {
        let Some(start) = self.stack.iter().rposition(|id| *id == root) else {
            return;
        };
        let any = self.stack[start..]
            .iter()
            .any(|id| self.reaches[id.index()]);
        for id in self.stack.drain(start..) {
            let i = id.index();
            self.on_stack[i] = false;
            self.done[i] = true;
            self.reaches[i] = any;
        }
    }
}

/// `seeds` plus every package reachable from them through imports.
#[must_use]
pub fn closure(universe: &dyn Universe, seeds: &PackageSet) -> PackageSet {
    let mut seen = seeds.clone();
    let mut pending: Vec<PackageId> = seeds.iter().collect();
    while let Some(id) = pending.pop() {
        for &import in universe.imports(id) {
            if seen.insert(import) {
                pending.push(import);
            }
        }
    }
    seen
}
