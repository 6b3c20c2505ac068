/* Subset construction. Reachable sets of input states become single output
 * states; canonical identity of a set is its interned, ascending-sorted id
 * sequence, so two set-equal unions reached in different traversal order
 * collapse into one output state. */

use crate::fsa::{Fsa, StateId};
use crate::interner::SetInterner;
use std::collections::{BTreeMap, BTreeSet, HashMap};

impl Fsa {
    /// Build a deterministic, pruned automaton accepting the same language.
    ///
    /// The result is freshly allocated; for every (state, symbol) pair it has
    /// at most one destination, and its alphabet is exactly the set of
    /// symbols reachable from the start state.
    pub fn determinize(&self) -> Fsa {
        let mut fa = Fsa::new();
        let mut interner = SetInterner::new();

        let start = interner.intern(vec![self.start]);
        let mut state_map = HashMap::from([(start, fa.start())]);
        let mut worklist = vec![(start, fa.start())];

        if self.finals.contains(&self.start) {
            fa.mark_final(fa.start());
        }

        while let Some((handle, fa_from)) = worklist.pop() {
            let members = interner.resolve(handle).to_vec();

            // union the destinations of every member, per symbol
            let mut symbol_tos: BTreeMap<char, BTreeSet<StateId>> = BTreeMap::new();
            for member in &members {
                if let Some(tos_by_symbol) = self.transitions.get(member) {
                    for (&symbol, tos) in tos_by_symbol {
                        symbol_tos
                            .entry(symbol)
                            .or_default()
                            .extend(tos.iter().copied());
                    }
                }
            }

            for (symbol, tos) in symbol_tos {
                // ascending order is the canonical form of a state-set
                let sorted: Vec<StateId> = tos.iter().copied().collect();
                let to_handle = interner.intern(sorted);

                let fa_to = match state_map.get(&to_handle) {
                    Some(&known) => known,
                    None => {
                        let fa_to = fa.new_state();
                        if tos.iter().any(|to| self.finals.contains(to)) {
                            fa.mark_final(fa_to);
                        }
                        state_map.insert(to_handle, fa_to);
                        worklist.push((to_handle, fa_to));
                        fa_to
                    }
                };

                // emitted even for known destinations, so self-loops and
                // re-entrant cycles get wired
                fa.insert_edge(fa_from, symbol, fa_to);
            }
        }

        fa.clean();
        fa
    }
}
