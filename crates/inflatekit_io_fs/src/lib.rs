//! `inflatekit_io_fs` v1:
//! Rust-side directory-tree replicator.
//!
//! Module layout:
//! - `replicate` : per-index traversal and copy orchestration
//! - `spec`      : options/errors
//! - `report`    : run-time report model
//! - `util`      : naming and path helpers

pub mod replicate;
pub mod report;
pub mod spec;
mod util;

pub use replicate::replicate_tree;
pub use report::{ReportReplicate, ReportReplicateBuilder};
pub use spec::{N_COPIES_DEFAULT, ReplicateTreeError, SpecReplicateOptions};
pub use util::derive_copy_name;
