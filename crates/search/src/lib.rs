//! The physical-design search engine: initial seeding (C5), branch-and-bound
//! (C6), and Large Neighborhood Search (C7) over the candidate space
//! `advisor-candidates` enumerates.
//!
//! `advisor_costmodel::overall_cost` is this crate's sole oracle — neither
//! `BbSearch` nor `LnsDesigner` know anything about network/disk/skew
//! internals, only that cost is a pure `f64` function of a `Design`.

pub mod bb;
pub mod deadline;
pub mod fingerprint;
pub mod lns;
pub mod seed;

pub use bb::{BbOutcome, BbSearch};
pub use deadline::Deadline;
pub use fingerprint::{CostCache, DesignFingerprint};
pub use lns::{LnsDesigner, LnsOutcome};
pub use seed::initial_design;
