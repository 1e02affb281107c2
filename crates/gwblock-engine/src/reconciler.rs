//! Plan execution against the Gateway API.

use crate::naming::Naming;
use crate::plan::{build_plan, ListRef, Operation, ReconciliationPlan};
use gwblock_client::GatewayClient;
use gwblock_core::{GatewayError, Result};
use std::collections::HashMap;
use tracing::info;

/// Owns the diff-and-apply cycle for one owned prefix.
///
/// The reconciler is the only writer of owned remote state. It tolerates
/// arbitrary starting states (previous failures, manual edits): whatever it
/// finds under the owned prefix is either adopted by the fast path or torn
/// down and rebuilt by the full resync.
pub struct Reconciler {
    client: GatewayClient,
    naming: Naming,
}

impl Reconciler {
    /// Create a reconciler for the given owned naming scheme
    #[must_use]
    pub fn new(client: GatewayClient, naming: Naming) -> Self {
        Self { client, naming }
    }

    /// Fetch owned remote state and diff it against the desired set.
    ///
    /// The two reads are not a consistent snapshot; an external mutation
    /// between them converges on the next run instead.
    pub async fn plan(&self, desired: &[String]) -> Result<ReconciliationPlan> {
        let lists = self.client.lists().all(self.naming.prefix()).await?;
        info!(lists = lists.len(), "fetched owned remote lists");

        let policies = self.client.policies().all(self.naming.prefix()).await?;
        info!(policies = policies.len(), "fetched owned firewall policies");

        build_plan(desired, &lists, &policies, &self.naming)
    }

    /// Execute a plan in order.
    ///
    /// `CreateList` results fill a slot table that later policy operations
    /// resolve their [`ListRef::Slot`] references through.
    pub async fn apply(&self, plan: ReconciliationPlan) -> Result<()> {
        let mut slot_ids: HashMap<usize, String> = HashMap::new();

        for op in plan.ops {
            match op {
                Operation::DeletePolicy { id, name } => {
                    info!(%id, %name, "deleting firewall policy");
                    self.client.policies().delete(&id).await?;
                }
                Operation::DeleteList { id, name } => {
                    info!(%id, %name, "deleting list");
                    self.client.lists().delete(&id).await?;
                }
                Operation::CreateList {
                    slot,
                    name,
                    domains,
                } => {
                    info!(%name, items = domains.len(), "creating list");
                    let created = self.client.lists().create(&name, &domains).await?;
                    slot_ids.insert(slot, created.id);
                }
                Operation::UpdateList { id, patch } => {
                    info!(
                        %id,
                        append = patch.append.len(),
                        remove = patch.remove.len(),
                        "editing list items"
                    );
                    self.client.lists().update_items(&id, &patch).await?;
                }
                Operation::CreatePolicy { name, lists } => {
                    let ids = resolve(&lists, &slot_ids)?;
                    info!(%name, lists = ids.len(), "creating firewall policy");
                    self.client.policies().create(&name, &ids).await?;
                }
                Operation::UpdatePolicy { id, name, lists } => {
                    let ids = resolve(&lists, &slot_ids)?;
                    info!(%id, %name, lists = ids.len(), "updating firewall policy");
                    self.client.policies().update(&id, &name, &ids).await?;
                }
            }
        }

        Ok(())
    }

    /// Delete every owned policy, then every owned list.
    ///
    /// Idempotent: a second call observes zero matches and performs no
    /// operations.
    pub async fn teardown(&self) -> Result<()> {
        let policies = self
            .client
            .policies()
            .all(&self.naming.policy_name())
            .await?;
        for policy in policies {
            info!(id = %policy.id, name = %policy.name, "deleting firewall policy");
            self.client.policies().delete(&policy.id).await?;
        }

        let lists = self.client.lists().all(self.naming.prefix()).await?;
        for list in lists {
            info!(id = %list.id, name = %list.name, "deleting list");
            self.client.lists().delete(&list.id).await?;
        }

        info!("teardown complete");
        Ok(())
    }
}

/// Map plan list references to concrete list IDs
fn resolve(refs: &[ListRef], slot_ids: &HashMap<usize, String>) -> Result<Vec<String>> {
    refs.iter()
        .map(|r| match r {
            ListRef::Existing(id) => Ok(id.clone()),
            ListRef::Slot(slot) => slot_ids.get(slot).cloned().ok_or_else(|| {
                GatewayError::Internal(format!("policy references unfilled chunk slot {slot}"))
            }),
        })
        .collect()
}
