//! The run/leave orchestrator.

use crate::naming::Naming;
use crate::reconciler::Reconciler;
use gwblock_client::GatewayClient;
use gwblock_core::{Result, MAX_TOTAL_DOMAINS};
use tracing::{info, warn};

/// Outcome of a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The block sources produced no domains; nothing was touched
    SkippedEmpty,
    /// The desired set exceeded the capacity limit; nothing was touched
    SkippedOversized {
        /// Size of the rejected set
        total: usize,
    },
    /// Remote state already matched the desired set
    Converged {
        /// Size of the desired set
        domains: usize,
    },
    /// A plan was applied
    Applied {
        /// Size of the desired set
        domains: usize,
        /// Number of operations executed
        operations: usize,
    },
}

/// Thin driver wiring the normalizer and the reconciler together.
///
/// Sequences normalize, safety gates, reconcile, apply, report. All
/// branching complexity lives in the planner.
pub struct SyncManager {
    reconciler: Reconciler,
}

impl SyncManager {
    /// Create a manager for the given adlist name
    #[must_use]
    pub fn new(client: GatewayClient, adlist_name: &str) -> Self {
        Self {
            reconciler: Reconciler::new(client, Naming::new(adlist_name)),
        }
    }

    /// Converge remote state onto the domains computed from the corpora.
    ///
    /// The safety gates exit cleanly, without any remote call: an empty set
    /// would silently wipe all rules and an oversized one indicates runaway
    /// or malicious source content.
    pub async fn run(&self, block_corpus: &str, allow_corpus: &str) -> Result<RunOutcome> {
        let domains = gwblock_domains::normalize(block_corpus, allow_corpus);

        if domains.is_empty() {
            warn!("no domains found in the block sources, exiting");
            return Ok(RunOutcome::SkippedEmpty);
        }
        if domains.len() > MAX_TOTAL_DOMAINS {
            warn!(
                total = domains.len(),
                limit = MAX_TOTAL_DOMAINS,
                "final domain count exceeds the limit, exiting"
            );
            return Ok(RunOutcome::SkippedOversized {
                total: domains.len(),
            });
        }

        info!(domains = domains.len(), "computed desired domain set");

        let plan = self.reconciler.plan(&domains).await?;
        if plan.is_empty() {
            info!("remote state already converged");
            return Ok(RunOutcome::Converged {
                domains: domains.len(),
            });
        }

        let operations = plan.len();
        info!(operations, "applying reconciliation plan");
        self.reconciler.apply(plan).await?;

        info!(domains = domains.len(), operations, "run complete");
        Ok(RunOutcome::Applied {
            domains: domains.len(),
            operations,
        })
    }

    /// Tear down every owned policy and list
    pub async fn leave(&self) -> Result<()> {
        self.reconciler.teardown().await
    }
}
