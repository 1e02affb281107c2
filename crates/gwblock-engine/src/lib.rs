//! Reconciliation engine for the Gateway blocklist synchronizer.
//!
//! Diffs the locally computed domain set against the owned remote lists and
//! policy, produces an ordered [`plan::ReconciliationPlan`], and executes it
//! through the resilient client. The planner itself is pure; only the
//! [`Reconciler`] touches the network.

pub mod manager;
pub mod naming;
pub mod plan;
pub mod reconciler;

pub use manager::{RunOutcome, SyncManager};
pub use naming::Naming;
pub use plan::{build_plan, chunk_domains, ListRef, Operation, ReconciliationPlan};
pub use reconciler::Reconciler;
