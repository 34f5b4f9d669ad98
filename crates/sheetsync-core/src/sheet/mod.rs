//! Snapshots, change sessions, diffing, and reconciliation.

mod diff;
mod reconcile;
mod session;
mod snapshot;

pub use diff::{Diff, DiffEntry, diff_tables};
pub use session::ChangeSession;
pub use snapshot::Snapshot;
