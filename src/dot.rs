/* Textual graph rendering. One line per (from, symbol, to) triple in a fixed
 * directed-edge notation; the start state renders as "s" and final states as
 * double circles. The exact formatting is an output contract covered
 * bit-for-bit by the compatibility tests. */

use crate::fsa::{Fsa, StateId};
use std::fmt::Write;

impl Fsa {
    /// Render the automaton as a dot digraph. States, symbols and finals are
    /// emitted in ascending order; the start state is shown as `s`.
    pub fn to_dot(&self) -> String {
        let name = |state: StateId| {
            if state == self.start {
                "s".to_string()
            } else {
                state.to_string()
            }
        };

        let mut table = String::new();
        for (&from, symbol_tos) in &self.transitions {
            let from = name(from);
            for (&symbol, tos) in symbol_tos {
                for &to in tos {
                    let _ = writeln!(
                        table,
                        "\t{} -> {} [label = \"{}\"]",
                        from,
                        name(to),
                        symbol
                    );
                }
            }
        }

        let mut finals = String::new();
        for &state in &self.finals {
            finals.push(' ');
            finals.push_str(&name(state));
        }

        format!(
            "digraph G {{\n\
             \trankdir=LR;\n\
             \tsize=\"8,5\"\n\
             \tnode [shape = doublecircle];{};\n\
             \tnode [shape = circle];\n\
             {}}}",
            finals, table
        )
    }
}

#[cfg(test)]
mod dot_tests {
    use super::*;

    #[test]
    fn test_dot_of_single_word_automaton() {
        let mut fa = Fsa::new();
        let s = fa.start();
        let f = fa.new_state();

        fa.set_final(f).unwrap();
        fa.transition(s, 'a', f).unwrap();

        assert_eq!(
            fa.to_dot(),
            "digraph G {\n\
             \trankdir=LR;\n\
             \tsize=\"8,5\"\n\
             \tnode [shape = doublecircle]; 2;\n\
             \tnode [shape = circle];\n\
             \ts -> 2 [label = \"a\"]\n\
             }"
        );
    }

    #[test]
    fn test_dot_renders_the_start_state_as_s() {
        let mut fa = Fsa::new();
        let s = fa.start();

        fa.set_final(s).unwrap();
        fa.transition(s, 'a', s).unwrap();
        fa.transition(s, 'b', s).unwrap();

        assert_eq!(
            fa.to_dot(),
            "digraph G {\n\
             \trankdir=LR;\n\
             \tsize=\"8,5\"\n\
             \tnode [shape = doublecircle]; s;\n\
             \tnode [shape = circle];\n\
             \ts -> s [label = \"a\"]\n\
             \ts -> s [label = \"b\"]\n\
             }"
        );
    }

    #[test]
    fn test_dot_orders_edges_by_state_then_symbol_then_destination() {
        let mut fa = Fsa::new();
        let s = fa.start();
        let s1 = fa.new_state();
        let s2 = fa.new_state();

        fa.set_final(s1).unwrap();
        fa.set_final(s2).unwrap();

        // inserted out of order on purpose
        fa.transition(s1, 'b', s2).unwrap();
        fa.transition(s, 'b', s2).unwrap();
        fa.transition(s, 'a', s2).unwrap();
        fa.transition(s, 'a', s1).unwrap();

        assert_eq!(
            fa.to_dot(),
            "digraph G {\n\
             \trankdir=LR;\n\
             \tsize=\"8,5\"\n\
             \tnode [shape = doublecircle]; 2 3;\n\
             \tnode [shape = circle];\n\
             \ts -> 2 [label = \"a\"]\n\
             \ts -> 3 [label = \"a\"]\n\
             \ts -> 3 [label = \"b\"]\n\
             \t2 -> 3 [label = \"b\"]\n\
             }"
        );
    }

    #[test]
    fn test_dot_of_empty_automaton() {
        let fa = Fsa::new();

        assert_eq!(
            fa.to_dot(),
            "digraph G {\n\
             \trankdir=LR;\n\
             \tsize=\"8,5\"\n\
             \tnode [shape = doublecircle];;\n\
             \tnode [shape = circle];\n\
             }"
        );
    }
}
