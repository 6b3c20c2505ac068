//! # fsalg
//!
//! An engine for constructing, transforming and algebraically combining
//! finite-state automata over an arbitrary alphabet of discrete symbols.
//!
//! This library provides functionality to:
//! - Build automata state by state and transition by transition
//! - Convert NFAs into DFAs using subset construction
//! - Minimize DFAs using Myhill-Nerode partition refinement
//! - Combine automata as languages: union, intersection, difference, negation
//! - Simulate automata over symbol sequences with an immutable stepper
//! - Serialize automata to a structural snapshot and render them as dot text

// Re-export the modules
pub mod algebra;
pub mod determinize;
pub mod dot;
pub mod fsa;
pub mod interner;
pub mod minimize;
pub mod snapshot;
pub mod walk;

// Re-export commonly used types for convenience
pub use fsa::{Fsa, FsaError, StateId};
pub use interner::{SetHandle, SetInterner};
pub use snapshot::Snapshot;
pub use walk::Walk;
