//! Enumeration of the finite design-candidate space: for each collection,
//! the admissible shard keys, index key-tuples, and embedding parents a
//! [`advisor_core::Design`] may assign.
//!
//! `advisor_core::Design` itself only enforces catalog-structural
//! invariants (field existence, no `$`-prefixed names, an acyclic
//! single-parent embedding forest). Membership in the enumerated candidate
//! space — "is this shard key one of the finitely many this collection is
//! allowed to have?" — is this crate's concern, kept separate so the core
//! data model never needs to know how candidates are derived.

mod enumerate;
mod space;

pub use enumerate::MAX_CANDIDATE_ARITY;
pub use space::{CandidateSpace, CollectionCandidates};
