/* Structural (de)serialization. A snapshot flattens the automaton into plain
 * lists so the exact relation, final marks and allocator position round-trip
 * unchanged. Transport of the serialized form is the caller's concern; the
 * JSON helpers here only bind the snapshot to serde_json. */

use crate::fsa::{Fsa, FsaError, StateId};
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Flat structural form of an automaton. All lists are emitted in ascending
/// order; `ids` records the last identifier handed out by the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub finals: Vec<StateId>,
    pub states: Vec<StateId>,
    pub start: StateId,
    pub symbols: Vec<char>,
    pub transitions: Vec<(StateId, Vec<(char, Vec<StateId>)>)>,
    pub ids: StateId,
}

impl Fsa {
    /// Flatten this automaton into a [`Snapshot`].
    pub fn snapshot(&self) -> Snapshot {
        let transitions = self
            .transitions
            .iter()
            .map(|(&from, symbol_tos)| {
                let entries = symbol_tos
                    .iter()
                    .map(|(&symbol, tos)| (symbol, tos.iter().copied().collect()))
                    .collect();
                (from, entries)
            })
            .collect();

        Snapshot {
            finals: self.finals.iter().copied().collect(),
            states: self.states.iter().copied().collect(),
            start: self.start,
            symbols: self.symbols.iter().copied().collect(),
            transitions,
            ids: self.ids,
        }
    }

    /// Reconstruct an automaton from a snapshot. Every identifier is checked
    /// against the snapshot's recorded allocator position so a corrupted
    /// snapshot cannot produce an inconsistent graph.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Fsa, FsaError> {
        let check = |state: StateId| -> Result<StateId, FsaError> {
            if state == 0 || state > snapshot.ids {
                return Err(FsaError::InvalidState {
                    state,
                    last: snapshot.ids,
                });
            }
            Ok(state)
        };

        if snapshot.start == 0 || snapshot.start > snapshot.ids {
            return Err(FsaError::BadSnapshot(format!(
                "start state {} outside the allocated range 1..={}",
                snapshot.start, snapshot.ids
            )));
        }

        let mut fa = Fsa::new();
        fa.start = snapshot.start;
        fa.ids = snapshot.ids;

        fa.states = snapshot
            .states
            .iter()
            .map(|&state| check(state))
            .collect::<Result<_, _>>()?;
        fa.states.insert(fa.start);

        fa.finals = snapshot
            .finals
            .iter()
            .map(|&state| check(state))
            .collect::<Result<_, _>>()?;

        fa.symbols = snapshot.symbols.iter().copied().collect();

        let mut transitions: BTreeMap<StateId, BTreeMap<char, BTreeSet<StateId>>> = BTreeMap::new();
        for (from, symbol_tos) in &snapshot.transitions {
            let from = check(*from)?;
            let entry = transitions.entry(from).or_default();
            for (symbol, tos) in symbol_tos {
                let destinations = entry.entry(*symbol).or_default();
                for &to in tos {
                    destinations.insert(check(to)?);
                }
            }
        }
        fa.transitions = transitions;

        Ok(fa)
    }

    /// Serialize to the snapshot's JSON form.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        Ok(json)
    }

    /// Reconstruct an automaton from its snapshot JSON.
    pub fn from_json(json: &str) -> Result<Fsa> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        let fa = Fsa::from_snapshot(&snapshot)?;
        Ok(fa)
    }
}

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    fn abc_fsa() -> Fsa {
        let mut fa = Fsa::new();
        let s = fa.start();
        let s1 = fa.new_state();
        let s2 = fa.new_state();
        let s3 = fa.new_state();

        fa.set_final(s3).unwrap();

        fa.transition(s, 'a', s1).unwrap();
        fa.transition(s1, 'b', s2).unwrap();
        fa.transition(s2, 'c', s3).unwrap();

        fa
    }

    #[test]
    fn test_snapshot_shape() {
        let fa = abc_fsa();

        let snapshot = fa.snapshot();

        assert_eq!(
            snapshot,
            Snapshot {
                finals: vec![4],
                states: vec![1, 2, 3, 4],
                start: 1,
                symbols: vec!['a', 'b', 'c'],
                transitions: vec![
                    (1, vec![('a', vec![2])]),
                    (2, vec![('b', vec![3])]),
                    (3, vec![('c', vec![4])]),
                ],
                ids: 4,
            }
        );
    }

    #[test]
    fn test_snapshot_round_trip_is_identical() {
        let fa = abc_fsa();

        let rebuilt = Fsa::from_snapshot(&fa.snapshot()).unwrap();

        assert_eq!(rebuilt, fa);
        assert_eq!(rebuilt.to_dot(), fa.to_dot());
        assert_eq!(rebuilt.last_id(), fa.last_id());
    }

    #[test]
    fn test_json_round_trip_preserves_the_rendering() {
        let fa = abc_fsa();

        let json = fa.to_json().unwrap();
        let rebuilt = Fsa::from_json(&json).unwrap();

        assert_eq!(rebuilt.to_dot(), fa.to_dot());
        assert_eq!(rebuilt, fa);
    }

    #[test]
    fn test_round_trip_of_nondeterministic_relation() {
        let mut fa = Fsa::new();
        let s = fa.start();
        let s1 = fa.new_state();
        let s2 = fa.new_state();

        fa.set_final(s2).unwrap();

        fa.transition(s, 'a', s1).unwrap();
        fa.transition(s, 'a', s2).unwrap();
        fa.transition(s1, 'a', s1).unwrap();

        let rebuilt = Fsa::from_snapshot(&fa.snapshot()).unwrap();

        assert_eq!(rebuilt, fa);
    }

    #[test]
    fn test_allocator_position_survives_the_round_trip() {
        let mut fa = abc_fsa();
        fa.new_state(); // allocated but never wired in

        let mut rebuilt = Fsa::from_snapshot(&fa.snapshot()).unwrap();

        assert_eq!(rebuilt.last_id(), 5);
        assert_eq!(rebuilt.new_state(), 6);
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        let mut snapshot = abc_fsa().snapshot();
        snapshot.finals = vec![9];

        let err = Fsa::from_snapshot(&snapshot).unwrap_err();
        assert_eq!(err, FsaError::InvalidState { state: 9, last: 4 });

        let mut snapshot = abc_fsa().snapshot();
        snapshot.start = 0;
        assert!(matches!(
            Fsa::from_snapshot(&snapshot),
            Err(FsaError::BadSnapshot(_))
        ));
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let fa = abc_fsa();

        let json = fa.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["start"], 1);
        assert_eq!(value["ids"], 4);
        assert_eq!(value["finals"], serde_json::json!([4]));
        assert_eq!(value["symbols"], serde_json::json!(["a", "b", "c"]));
        assert_eq!(
            value["transitions"],
            serde_json::json!([
                [1, [["a", [2]]]],
                [2, [["b", [3]]]],
                [3, [["c", [4]]]]
            ])
        );
    }
}
