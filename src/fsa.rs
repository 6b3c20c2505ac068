/* The mutable automaton store. States are opaque positive integers handed out
 * by a per-automaton allocator; the transition relation maps (state, symbol)
 * to a set of destinations, so the representation is nondeterministic-capable
 * by default. Pruning, delta and the bounded-depth frontier queries live here
 * as well since they only touch the store. */

use bitvec::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of a state, unique within one automaton. Identifiers are never
/// reused over an automaton's lifetime and are not comparable across automata.
pub type StateId = usize;

/// List of possible errors when mutating or reconstructing an automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsaError {
    /// An identifier was passed in that this automaton's allocator never produced
    InvalidState { state: StateId, last: StateId },
    /// A snapshot did not describe a well-formed automaton
    BadSnapshot(String),
}

impl fmt::Display for FsaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsaError::InvalidState { state, last } => {
                write!(
                    f,
                    "Error: State {} was not allocated by this automaton (valid range is 1..={})!",
                    state, last
                )
            }
            FsaError::BadSnapshot(reason) => {
                write!(f, "Error: Snapshot is not a well-formed automaton: {}!", reason)
            }
        }
    }
}

impl std::error::Error for FsaError {}

/// A finite-state automaton over `char` symbols.
///
/// A fresh automaton consists of just its start state; it grows through
/// [`Fsa::new_state`], [`Fsa::set_final`] and [`Fsa::transition`]. The
/// derivation operations (`determinize`, `minimize`, `union`, `intersect`,
/// `subtract`, `negation`) never mutate their inputs and return a brand-new
/// automaton with its own identifier space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fsa {
    pub(crate) states: BTreeSet<StateId>,
    pub(crate) start: StateId,
    pub(crate) finals: BTreeSet<StateId>,
    pub(crate) symbols: BTreeSet<char>,
    pub(crate) transitions: BTreeMap<StateId, BTreeMap<char, BTreeSet<StateId>>>,
    pub(crate) ids: StateId,
}

impl Default for Fsa {
    fn default() -> Self {
        Self::new()
    }
}

struct CleanFrame {
    state: StateId,
    edges: Vec<(char, StateId)>,
    next: usize,
    any_kept: bool,
}

impl Fsa {
    pub fn new() -> Self {
        let start = 1;
        Fsa {
            states: BTreeSet::from([start]),
            start,
            finals: BTreeSet::new(),
            symbols: BTreeSet::new(),
            transitions: BTreeMap::new(),
            ids: start,
        }
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    /// Allocate a fresh state identifier. The new state only becomes part of
    /// the automaton once it participates in a transition or is the start.
    pub fn new_state(&mut self) -> StateId {
        self.ids += 1;
        self.ids
    }

    /// Last identifier handed out by the allocator.
    pub fn last_id(&self) -> StateId {
        self.ids
    }

    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.states
    }

    pub fn finals(&self) -> &BTreeSet<StateId> {
        &self.finals
    }

    pub fn symbols(&self) -> &BTreeSet<char> {
        &self.symbols
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(&state)
    }

    /// Outgoing transitions of a state, if it has any recorded.
    pub fn transitions_from(&self, state: StateId) -> Option<&BTreeMap<char, BTreeSet<StateId>>> {
        self.transitions.get(&state)
    }

    fn check_allocated(&self, state: StateId) -> Result<(), FsaError> {
        if state == 0 || state > self.ids {
            return Err(FsaError::InvalidState {
                state,
                last: self.ids,
            });
        }
        Ok(())
    }

    /// Mark a state as accepting. Idempotent. Fails if the identifier was not
    /// produced by this automaton's allocator.
    pub fn set_final(&mut self, state: StateId) -> Result<(), FsaError> {
        self.check_allocated(state)?;
        self.finals.insert(state);
        Ok(())
    }

    /// Add a transition `from --symbol--> to`. Both endpoints are inserted
    /// into the state set and the symbol into the alphabet. Idempotent. Fails
    /// if either identifier was not produced by this automaton's allocator.
    pub fn transition(&mut self, from: StateId, symbol: char, to: StateId) -> Result<(), FsaError> {
        self.check_allocated(from)?;
        self.check_allocated(to)?;
        self.insert_edge(from, symbol, to);
        Ok(())
    }

    // Internal mutators for identifiers known to come from our own allocator.
    pub(crate) fn insert_edge(&mut self, from: StateId, symbol: char, to: StateId) {
        self.states.insert(from);
        self.states.insert(to);
        self.symbols.insert(symbol);
        self.transitions
            .entry(from)
            .or_default()
            .entry(symbol)
            .or_default()
            .insert(to);
    }

    pub(crate) fn mark_final(&mut self, state: StateId) {
        self.finals.insert(state);
    }

    fn remove_edge(&mut self, from: StateId, symbol: char, to: StateId) {
        if let Some(symbol_tos) = self.transitions.get_mut(&from) {
            if let Some(tos) = symbol_tos.get_mut(&symbol) {
                tos.remove(&to);
                if tos.is_empty() {
                    symbol_tos.remove(&symbol);
                }
            }
            if symbol_tos.is_empty() {
                self.transitions.remove(&from);
            }
        }
    }

    fn open_frame(&self, state: StateId) -> CleanFrame {
        let edges = match self.transitions.get(&state) {
            Some(symbol_tos) => symbol_tos
                .iter()
                .flat_map(|(&symbol, tos)| tos.iter().map(move |&to| (symbol, to)))
                .collect(),
            None => Vec::new(),
        };
        CleanFrame {
            state,
            edges,
            next: 0,
            any_kept: false,
        }
    }

    /// Remove every state that is unreachable from the start state or cannot
    /// reach any final state, along with the edges leading into the removed
    /// states.
    ///
    /// The traversal is an iterative depth-first search with three-colour
    /// marking. A state that is encountered again while still being resolved
    /// is treated as not-removable; that is what breaks cycles.
    pub fn clean(&mut self) {
        let len = self.ids + 1;
        let mut visited: BitVec<u8> = BitVec::repeat(false, len);
        let mut resolved: BitVec<u8> = BitVec::repeat(false, len);
        let mut kept: BitVec<u8> = BitVec::repeat(false, len);

        let mut stack: Vec<CleanFrame> = Vec::new();
        visited.set(self.start, true);
        stack.push(self.open_frame(self.start));

        // The frame stays on the stack until its edge scan is complete; a
        // descent pushes the child and resumes the same edge afterwards.
        while let Some(frame) = stack.last_mut() {
            if frame.next >= frame.edges.len() {
                let frame = match stack.pop() {
                    Some(frame) => frame,
                    None => break,
                };
                let keep = frame.state == self.start
                    || self.finals.contains(&frame.state)
                    || frame.any_kept;
                resolved.set(frame.state, true);
                kept.set(frame.state, keep);

                if !keep {
                    self.states.remove(&frame.state);
                    self.transitions.remove(&frame.state);
                }
                continue;
            }

            let (symbol, to) = frame.edges[frame.next];

            if !visited[to] {
                // first sighting, resolve the destination before this edge
                visited.set(to, true);
                let child = self.open_frame(to);
                stack.push(child);
                continue;
            }

            if resolved[to] && !kept[to] {
                let from = frame.state;
                frame.next += 1;
                self.remove_edge(from, symbol, to);
            } else {
                // kept, or still in progress somewhere up the stack
                frame.any_kept = true;
                frame.next += 1;
            }
        }

        // States the traversal never reached are deleted unconditionally.
        let unreached: Vec<StateId> = self
            .states
            .iter()
            .copied()
            .filter(|&state| !visited[state])
            .collect();

        for state in unreached {
            self.states.remove(&state);
            self.transitions.remove(&state);
            self.finals.remove(&state);
        }

        // Latent dangling finals never referenced by a transition go as well.
        let states = &self.states;
        self.finals.retain(|state| states.contains(state));
    }

    /// Union over all members of `froms` of the destinations reachable via
    /// `symbol`. `None` defaults to the singleton start set. Pure; absent
    /// transitions resolve to the empty set.
    pub fn delta(&self, froms: Option<&BTreeSet<StateId>>, symbol: char) -> BTreeSet<StateId> {
        let default;
        let froms = match froms {
            Some(froms) => froms,
            None => {
                default = BTreeSet::from([self.start]);
                &default
            }
        };

        let mut result = BTreeSet::new();
        for from in froms {
            if let Some(symbol_tos) = self.transitions.get(from) {
                if let Some(tos) = symbol_tos.get(&symbol) {
                    result.extend(tos.iter().copied());
                }
            }
        }
        result
    }

    /// The accepting subset of a state set.
    pub fn filter_finals(&self, froms: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        froms
            .iter()
            .copied()
            .filter(|from| self.finals.contains(from))
            .collect()
    }

    /// Whether a state set contains at least one accepting state.
    pub fn has_final(&self, froms: &BTreeSet<StateId>) -> bool {
        !self.filter_finals(froms).is_empty()
    }

    /// States reachable from the start state by paths of exactly `position`
    /// transitions, regardless of symbol.
    pub fn position_states(&self, position: usize) -> BTreeSet<StateId> {
        let mut frontier = BTreeSet::from([self.start]);

        for _ in 0..position {
            let mut next = BTreeSet::new();
            for state in &frontier {
                if let Some(symbol_tos) = self.transitions.get(state) {
                    for tos in symbol_tos.values() {
                        next.extend(tos.iter().copied());
                    }
                }
            }
            frontier = next;
        }

        frontier
    }
}
