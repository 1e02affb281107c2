//! Reconciliation plan construction.
//!
//! [`build_plan`] is a pure function over the desired domain set and a
//! snapshot of the owned remote state, so every diffing decision is
//! testable without a network.

use crate::naming::Naming;
use gwblock_core::{
    GatewayError, GatewayPolicy, PatchListRequest, RemoteList, Result, MAX_LIST_SIZE,
};
use std::collections::HashSet;

/// Reference to a list, either one that already exists remotely or one that
/// a `CreateList` operation earlier in the same plan will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRef {
    /// An existing remote list ID
    Existing(String),
    /// The list created for this chunk slot during apply
    Slot(usize),
}

/// One remote mutation, carrying the minimal payload it needs
#[derive(Debug, Clone)]
pub enum Operation {
    /// Delete an owned firewall policy
    DeletePolicy {
        /// Policy ID
        id: String,
        /// Policy name, for logging
        name: String,
    },
    /// Delete an owned list
    DeleteList {
        /// List ID
        id: String,
        /// List name, for logging
        name: String,
    },
    /// Create a list for one chunk of the desired set
    CreateList {
        /// Chunk slot (1-indexed)
        slot: usize,
        /// Slot-suffixed list name
        name: String,
        /// The chunk's domains
        domains: Vec<String>,
    },
    /// Edit the items of an existing list in place
    UpdateList {
        /// List ID
        id: String,
        /// Items to append and remove
        patch: PatchListRequest,
    },
    /// Create the owned firewall policy over the referenced lists
    CreatePolicy {
        /// Policy name
        name: String,
        /// Lists the policy blocks against
        lists: Vec<ListRef>,
    },
    /// Repoint an existing policy at a new list set
    UpdatePolicy {
        /// Policy ID
        id: String,
        /// Policy name
        name: String,
        /// Lists the policy blocks against
        lists: Vec<ListRef>,
    },
}

/// Ordered sequence of operations that converges remote state
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    /// Operations in execution order
    pub ops: Vec<Operation>,
}

impl ReconciliationPlan {
    /// Returns true when remote state is already converged
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

/// Split the desired set into list-sized chunks, slot order preserved
#[must_use]
pub fn chunk_domains(domains: &[String]) -> Vec<Vec<String>> {
    domains.chunks(MAX_LIST_SIZE).map(<[String]>::to_vec).collect()
}

/// Diff the desired domain set against a snapshot of owned remote state.
///
/// Fast path: when the aggregate remote item count equals the desired set
/// size, convergence is assumed by size alone and no lists are touched.
/// This is a count-only comparison: a same-size set with different content
/// is not detected. Otherwise a full resync is planned: delete the owned
/// policy and every owned list, recreate one list per chunk, then create
/// or update the policy over the new slots.
///
/// More than one owned policy is external corruption and fails the plan.
pub fn build_plan(
    desired: &[String],
    lists: &[RemoteList],
    policies: &[GatewayPolicy],
    naming: &Naming,
) -> Result<ReconciliationPlan> {
    let remote_total: u64 = lists.iter().map(|l| l.count).sum();

    if remote_total == desired.len() as u64 {
        return fast_path(lists, policies, naming);
    }

    let mut ops = Vec::new();
    let policy_name = naming.policy_name();

    // Delete-then-create: the policy goes first so it never points at a
    // list mid-deletion. The brief fully-torn-down window is accepted.
    let mut deleted_policies = HashSet::new();
    for policy in policies.iter().filter(|p| p.name.starts_with(&policy_name)) {
        deleted_policies.insert(policy.id.as_str());
        ops.push(Operation::DeletePolicy {
            id: policy.id.clone(),
            name: policy.name.clone(),
        });
    }

    for list in lists {
        ops.push(Operation::DeleteList {
            id: list.id.clone(),
            name: list.name.clone(),
        });
    }

    let mut slots = Vec::new();
    for (index, chunk) in chunk_domains(desired).into_iter().enumerate() {
        let slot = index + 1;
        ops.push(Operation::CreateList {
            slot,
            name: naming.list_name(slot),
            domains: chunk,
        });
        slots.push(ListRef::Slot(slot));
    }

    let survivors: Vec<&GatewayPolicy> = policies
        .iter()
        .filter(|p| !deleted_policies.contains(p.id.as_str()))
        .collect();

    match survivors.as_slice() {
        [] => ops.push(Operation::CreatePolicy {
            name: policy_name,
            lists: slots,
        }),
        [survivor] => ops.push(Operation::UpdatePolicy {
            id: survivor.id.clone(),
            name: policy_name,
            lists: slots,
        }),
        _ => {
            return Err(GatewayError::PolicyConflict {
                count: survivors.len(),
            })
        }
    }

    Ok(ReconciliationPlan { ops })
}

/// Size match: leave the lists alone, only make sure the policy exists
fn fast_path(
    lists: &[RemoteList],
    policies: &[GatewayPolicy],
    naming: &Naming,
) -> Result<ReconciliationPlan> {
    match policies.len() {
        0 => Ok(ReconciliationPlan {
            ops: vec![Operation::CreatePolicy {
                name: naming.policy_name(),
                lists: lists
                    .iter()
                    .map(|l| ListRef::Existing(l.id.clone()))
                    .collect(),
            }],
        }),
        1 => Ok(ReconciliationPlan::default()),
        count => Err(GatewayError::PolicyConflict { count }),
    }
}
