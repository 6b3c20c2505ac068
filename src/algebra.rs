/* Language algebra over automata. Union grafts a translated copy of one
 * minimized automaton onto the other and re-minimizes; intersection and
 * difference explore the reachable product-state space of two minimized
 * automata; negation is difference from a single-state universe over the
 * automaton's own alphabet. */

use crate::fsa::{Fsa, StateId};
use crate::interner::SetInterner;
use std::collections::HashMap;

// Translate a state of the grafted automaton into the combined one,
// allocating a fresh id on first reference and inheriting the final mark.
fn translate(
    combined: &mut Fsa,
    grafted: &Fsa,
    table: &mut HashMap<StateId, StateId>,
    state: StateId,
) -> StateId {
    let translated = match table.get(&state) {
        Some(&known) => known,
        None => {
            let fresh = combined.new_state();
            table.insert(state, fresh);
            fresh
        }
    };

    combined.states.insert(translated);
    if grafted.finals.contains(&state) {
        combined.finals.insert(translated);
    }

    translated
}

// Canonical key of a product state: an ordered pair while both sides are
// tracked, the lone left-hand state once the right side has fallen away.
fn product_key(a: StateId, b: Option<StateId>) -> Vec<StateId> {
    match b {
        Some(b) => vec![a, b],
        None => vec![a],
    }
}

impl Fsa {
    /// The automaton accepting every word accepted by `self` or by `other`.
    pub fn union(&self, other: &Fsa) -> Fsa {
        let mut combined = self.minimize();
        let other = other.minimize();

        let mut table = HashMap::from([(other.start, combined.start)]);

        // a transition-free operand still contributes the empty word
        if other.finals.contains(&other.start) {
            combined.finals.insert(combined.start);
        }

        // copying the edges re-introduces nondeterminism at shared states;
        // the final minimize determinizes it away again
        for (&from, symbol_tos) in &other.transitions {
            let translated_from = translate(&mut combined, &other, &mut table, from);
            for (&symbol, tos) in symbol_tos {
                for &to in tos {
                    let translated_to = translate(&mut combined, &other, &mut table, to);
                    combined.insert_edge(translated_from, symbol, translated_to);
                }
            }
        }

        combined.minimize()
    }

    /// The automaton accepting every word accepted by both `self` and `other`.
    pub fn intersect(&self, other: &Fsa) -> Fsa {
        let left = self.minimize();
        let right = other.minimize();

        let mut result = Fsa::new();
        result.symbols = self.symbols.union(&other.symbols).copied().collect();

        let mut interner = SetInterner::new();
        let start = interner.intern(vec![left.start, right.start]);
        let mut state_map = HashMap::from([(start, result.start)]);

        if left.finals.contains(&left.start) && right.finals.contains(&right.start) {
            result.finals.insert(result.start);
        }

        let mut worklist = vec![(left.start, right.start, result.start)];

        while let Some((a, b, from)) = worklist.pop() {
            let (Some(a_symbols), Some(b_symbols)) =
                (left.transitions.get(&a), right.transitions.get(&b))
            else {
                continue;
            };

            for (&symbol, a_tos) in a_symbols {
                // the product moves only when both sides have this symbol
                let Some(b_tos) = b_symbols.get(&symbol) else {
                    continue;
                };
                let (Some(&a_to), Some(&b_to)) = (a_tos.iter().next(), b_tos.iter().next())
                else {
                    continue;
                };

                let to_handle = interner.intern(vec![a_to, b_to]);
                let to = match state_map.get(&to_handle) {
                    Some(&known) => known,
                    None => {
                        let to = result.new_state();
                        state_map.insert(to_handle, to);
                        if left.finals.contains(&a_to) && right.finals.contains(&b_to) {
                            result.finals.insert(to);
                        }
                        worklist.push((a_to, b_to, to));
                        to
                    }
                };

                result.insert_edge(from, symbol, to);
            }
        }

        result.minimize()
    }

    /// The automaton accepting every word accepted by `self` but not `other`.
    pub fn subtract(&self, other: &Fsa) -> Fsa {
        let left = self.minimize();
        let right = other.minimize();

        let mut result = Fsa::new();
        result.symbols = self.symbols.union(&other.symbols).copied().collect();

        let mut interner = SetInterner::new();
        let start = interner.intern(product_key(left.start, Some(right.start)));
        let mut state_map = HashMap::from([(start, result.start)]);

        if left.finals.contains(&left.start) && !right.finals.contains(&right.start) {
            result.finals.insert(result.start);
        }

        let mut worklist: Vec<(StateId, Option<StateId>, StateId)> =
            vec![(left.start, Some(right.start), result.start)];

        while let Some((a, b, from)) = worklist.pop() {
            let Some(a_symbols) = left.transitions.get(&a) else {
                continue;
            };
            let b_symbols = b.and_then(|b| right.transitions.get(&b));

            for (&symbol, a_tos) in a_symbols {
                let Some(&a_to) = a_tos.iter().next() else {
                    continue;
                };
                // once the right side cannot follow, it stays untracked for
                // the rest of this path
                let b_to = b_symbols
                    .and_then(|symbol_tos| symbol_tos.get(&symbol))
                    .and_then(|tos| tos.iter().next())
                    .copied();

                let to_handle = interner.intern(product_key(a_to, b_to));
                let to = match state_map.get(&to_handle) {
                    Some(&known) => known,
                    None => {
                        let to = result.new_state();
                        state_map.insert(to_handle, to);
                        let b_final = b_to.is_some_and(|b_to| right.finals.contains(&b_to));
                        if left.finals.contains(&a_to) && !b_final {
                            result.finals.insert(to);
                        }
                        worklist.push((a_to, b_to, to));
                        to
                    }
                };

                result.insert_edge(from, symbol, to);
            }
        }

        result.minimize()
    }

    /// The automaton accepting, over `self`'s own alphabet, exactly the words
    /// `self` does not accept. Symbols `self` never mentions do not take part.
    pub fn negation(&self) -> Fsa {
        let mut universe = Fsa::new();
        let s = universe.start();
        universe.mark_final(s);

        for &symbol in &self.symbols {
            universe.insert_edge(s, symbol, s);
        }

        universe.subtract(self)
    }
}
