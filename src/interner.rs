/* Canonical handles for collections of state identifiers. Subset construction
 * and minimization both need to use sets of states as map keys; interning a
 * sequence of ids yields a cheap, copyable handle whose equality is content
 * equality of the sequence. */

use crate::fsa::StateId;
use std::collections::HashMap;

/// A content-equal, comparable stand-in for a sequence of state identifiers.
///
/// Two handles compare equal iff the sequences supplied to
/// [`SetInterner::intern`] were element-wise equal. Callers are responsible
/// for pre-sorting when order must not matter (canonical state-sets use
/// ascending numeric order) and for preserving order when it is significant
/// (the ordered pairs of the product constructions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SetHandle(usize);

/// Interning table scoped to a single algorithm run.
#[derive(Debug, Default)]
pub struct SetInterner {
    table: HashMap<Vec<StateId>, SetHandle>,
    keys: Vec<Vec<StateId>>,
}

impl SetInterner {
    pub fn new() -> Self {
        SetInterner {
            table: HashMap::new(),
            keys: Vec::new(),
        }
    }

    /// Canonicalize a sequence of ids into a handle. The same sequence always
    /// maps to the same handle within one interner.
    pub fn intern(&mut self, key: Vec<StateId>) -> SetHandle {
        if let Some(&handle) = self.table.get(&key) {
            return handle;
        }
        let handle = SetHandle(self.keys.len());
        self.keys.push(key.clone());
        self.table.insert(key, handle);
        handle
    }

    /// The sequence a handle stands for.
    pub fn resolve(&self, handle: SetHandle) -> &[StateId] {
        &self.keys[handle.0]
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod interner_tests {
    use super::*;

    #[test]
    fn test_equal_content_interns_to_the_same_handle() {
        let mut interner = SetInterner::new();

        let a = interner.intern(vec![1, 2, 3]);
        let b = interner.intern(vec![1, 2, 3]);
        let c = interner.intern(vec![1, 2]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_order_is_part_of_the_content() {
        let mut interner = SetInterner::new();

        // ordered pairs stay distinct; set-like callers must sort first
        let ab = interner.intern(vec![4, 7]);
        let ba = interner.intern(vec![7, 4]);

        assert_ne!(ab, ba);
        assert_eq!(interner.resolve(ab), &[4, 7]);
        assert_eq!(interner.resolve(ba), &[7, 4]);
    }

    #[test]
    fn test_empty_sequence_is_internable() {
        let mut interner = SetInterner::new();

        let empty = interner.intern(Vec::new());

        assert_eq!(interner.resolve(empty), &[] as &[StateId]);
        assert_eq!(empty, interner.intern(Vec::new()));
    }
}
