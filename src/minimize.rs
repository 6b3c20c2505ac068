/* DFA minimization by partition refinement. The input is determinized first,
 * then the states are split into Myhill-Nerode equivalence classes starting
 * from the {non-final, final} partition, and one output state is built per
 * class. Blocks are interned ascending id sequences so block identity is
 * content identity. */

use crate::fsa::{Fsa, StateId};
use crate::interner::{SetHandle, SetInterner};
use bitvec::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

impl Fsa {
    /// Build the minimal deterministic automaton for the same language.
    pub fn minimize(&self) -> Fsa {
        let mut fa = self.determinize();

        let original_states: Vec<StateId> = fa.states.iter().copied().collect();
        let symbols: Vec<char> = fa.symbols.iter().copied().collect();

        let mut interner = SetInterner::new();

        let finals: Vec<StateId> = fa.finals.iter().copied().collect();
        let non_finals: Vec<StateId> = fa
            .states
            .iter()
            .copied()
            .filter(|state| !fa.finals.contains(state))
            .collect();

        let finals_block = interner.intern(finals);
        let mut partition: Vec<SetHandle> = if non_finals.is_empty() {
            vec![finals_block]
        } else {
            vec![interner.intern(non_finals), finals_block]
        };
        let mut worklist: Vec<SetHandle> = partition.clone();

        while let Some(splitter) = worklist.pop() {
            for &symbol in &symbols {
                // X = states whose single `symbol`-transition lands in the splitter
                let landing = interner.resolve(splitter).to_vec();
                let x: Vec<StateId> = original_states
                    .iter()
                    .copied()
                    .filter(|state| {
                        fa.transitions
                            .get(state)
                            .and_then(|symbol_tos| symbol_tos.get(&symbol))
                            .and_then(|tos| tos.iter().next())
                            .map(|to| landing.binary_search(to).is_ok())
                            .unwrap_or(false)
                    })
                    .collect();

                if x.is_empty() {
                    continue;
                }

                let mut in_x: BitVec<u8> = BitVec::repeat(false, fa.ids + 1);
                for &state in &x {
                    in_x.set(state, true);
                }

                let mut pi = 0;
                while pi < partition.len() {
                    let y = partition[pi];
                    let members = interner.resolve(y).to_vec();

                    let (x_and_y, y_minus_x): (Vec<StateId>, Vec<StateId>) =
                        members.iter().copied().partition(|&state| in_x[state]);

                    if x_and_y.is_empty() || y_minus_x.is_empty() {
                        pi += 1;
                        continue;
                    }

                    let x_and_y = interner.intern(x_and_y);
                    let y_minus_x = interner.intern(y_minus_x);

                    partition[pi] = x_and_y;
                    partition.insert(pi + 1, y_minus_x);

                    // dead-state pruning leaves the transition function
                    // partial, so both pieces go back as splitters; the
                    // smaller-half shortcut needs a complete function
                    if let Some(wi) = worklist.iter().position(|&block| block == y) {
                        worklist[wi] = x_and_y;
                        worklist.insert(wi + 1, y_minus_x);
                    } else {
                        worklist.push(x_and_y);
                        worklist.push(y_minus_x);
                    }

                    // the complement piece cannot split again on the same x
                    pi += 2;
                }
            }
        }

        // One output state per block: the start's block reuses the start id,
        // larger blocks get a fresh id, singletons keep their member's id.
        let mut states_table: HashMap<StateId, StateId> = HashMap::new();

        for &block in &partition {
            let members = interner.resolve(block).to_vec();
            if members.is_empty() {
                continue;
            }

            let new_state = if members.binary_search(&fa.start).is_ok() {
                fa.start
            } else if members.len() > 1 {
                fa.new_state()
            } else {
                members[0]
            };

            fa.states.insert(new_state);

            let mut is_final = false;
            for &member in &members {
                is_final = is_final || fa.finals.contains(&member);
                states_table.insert(member, new_state);
            }
            if is_final {
                fa.finals.insert(new_state);
            }
        }

        // Re-express every transition between the blocks of its endpoints.
        let mut transitions: BTreeMap<StateId, BTreeMap<char, BTreeSet<StateId>>> = BTreeMap::new();
        for state in &original_states {
            if let Some(symbol_tos) = fa.transitions.get(state) {
                let Some(&from) = states_table.get(state) else {
                    continue;
                };
                for (&symbol, tos) in symbol_tos {
                    if let Some(first) = tos.iter().next() {
                        let Some(&to) = states_table.get(first) else {
                            continue;
                        };
                        transitions
                            .entry(from)
                            .or_default()
                            .insert(symbol, BTreeSet::from([to]));
                    }
                }
            }
        }

        fa.transitions = transitions;
        fa.clean();
        fa
    }
}
