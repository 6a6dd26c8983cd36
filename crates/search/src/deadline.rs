//! Cooperative cancellation (§5 "Cancellation"): re-exported from
//! `advisor-core` so the search engine's BB/LNS loops and
//! `advisor-costmodel`'s own sub-cost session loops check the identical
//! `Deadline` type without a dependency cycle between the two crates.

pub use advisor_core::Deadline;
