use serde::{Deserialize, Serialize};

/// A Gateway firewall policy as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPolicy {
    /// Unique policy ID
    pub id: String,

    /// Policy name, carrying the owned prefix tag for policies we manage
    pub name: String,

    /// Whether the policy is active
    #[serde(default)]
    pub enabled: bool,

    /// Traffic expression referencing the owned lists
    #[serde(default)]
    pub traffic: String,
}

impl GatewayPolicy {
    /// Returns true if this policy is managed by the given owned prefix
    #[must_use]
    pub fn is_owned_by(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// Request body for creating or replacing a Gateway firewall policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRequest {
    /// Policy name (owned prefix + " Block Ads")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Action to take on matching traffic
    pub action: String,

    /// Whether the policy is active
    pub enabled: bool,

    /// Filter types this policy applies to
    pub filters: Vec<String>,

    /// Traffic expression over the owned list IDs
    pub traffic: String,

    /// Additional rule behavior
    pub rule_settings: RuleSettings,
}

impl PolicyRequest {
    /// Build a DNS block policy over the given list IDs
    pub fn block_dns<S: AsRef<str>>(name: impl Into<String>, list_ids: &[S]) -> Self {
        Self {
            name: name.into(),
            description: String::from("Block Ads & Tracking"),
            action: String::from("block"),
            enabled: true,
            filters: vec![String::from("dns")],
            traffic: traffic_expression(list_ids),
            rule_settings: RuleSettings {
                block_page_enabled: false,
            },
        }
    }
}

/// Rule behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSettings {
    /// Whether to show a block page instead of refusing resolution
    pub block_page_enabled: bool,
}

/// Build the traffic expression matching domains in any of the given lists.
///
/// The upstream service accepts the bare `or` separator without surrounding
/// whitespace, so that exact form is kept.
pub fn traffic_expression<S: AsRef<str>>(list_ids: &[S]) -> String {
    list_ids
        .iter()
        .map(|id| format!("any(dns.domains[*] in ${})", id.as_ref()))
        .collect::<Vec<_>>()
        .join("or")
}
