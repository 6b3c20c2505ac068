/* Simulation stepper. A walk is an immutable snapshot of a frontier (the
 * reachable state set) and the symbol sequence consumed so far; every step
 * returns a new handle and previously saved handles stay valid. */

use crate::fsa::{Fsa, StateId};
use std::collections::BTreeSet;

/// An incremental, immutable simulation over an automaton.
///
/// Once the frontier empties the walk is dead: the symbol that caused death
/// is the last entry of [`Walk::word`], any symbol fed afterwards is ignored
/// and the frontier stays permanently empty.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    fsa: &'a Fsa,
    frontier: BTreeSet<StateId>,
    word: Vec<char>,
    dead: bool,
}

impl Fsa {
    /// Start a walk on this automaton, positioned at the start state.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            fsa: self,
            frontier: BTreeSet::from([self.start()]),
            word: Vec::new(),
            dead: false,
        }
    }

    /// Whether the automaton accepts the word, simulated from the start state.
    pub fn accepts(&self, word: &str) -> bool {
        self.walk().feed(word.chars()).accepts()
    }
}

impl<'a> Walk<'a> {
    /// Advance by one symbol, returning the next walk. This walk is unchanged.
    pub fn step(&self, symbol: char) -> Walk<'a> {
        if self.dead {
            return self.clone();
        }

        let mut word = self.word.clone();
        word.push(symbol);

        let frontier = self.fsa.delta(Some(&self.frontier), symbol);
        let dead = frontier.is_empty();

        Walk {
            fsa: self.fsa,
            frontier,
            word,
            dead,
        }
    }

    /// Advance by a sequence of symbols. Equivalent to repeated [`Walk::step`].
    pub fn feed<I>(&self, symbols: I) -> Walk<'a>
    where
        I: IntoIterator<Item = char>,
    {
        symbols
            .into_iter()
            .fold(self.clone(), |walk, symbol| walk.step(symbol))
    }

    /// The symbols consumed so far, including the one that killed the walk.
    pub fn word(&self) -> &[char] {
        &self.word
    }

    /// The current frontier; empty once the walk is dead.
    pub fn states(&self) -> &BTreeSet<StateId> {
        &self.frontier
    }

    /// The accepting subset of the frontier; empty once the walk is dead.
    pub fn finals(&self) -> BTreeSet<StateId> {
        self.fsa.filter_finals(&self.frontier)
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether the consumed word is accepted from the start state.
    pub fn accepts(&self) -> bool {
        self.fsa.has_final(&self.frontier)
    }
}
