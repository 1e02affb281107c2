//! Owned-resource naming scheme.
//!
//! Remote lists and policies created by this system carry a recognizable
//! name tag; anything without the tag is foreign and must never be touched.

/// Naming scheme for the resources owned by one sync configuration
#[derive(Debug, Clone)]
pub struct Naming {
    prefix: String,
}

impl Naming {
    /// Build the scheme from the configured adlist name
    #[must_use]
    pub fn new(adlist_name: &str) -> Self {
        Self {
            prefix: format!("[AdBlock-{adlist_name}]"),
        }
    }

    /// The tag every owned resource name starts with
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the single owned firewall policy
    #[must_use]
    pub fn policy_name(&self) -> String {
        format!("{} Block Ads", self.prefix)
    }

    /// Name of the owned list in the given slot (1-indexed, zero-padded)
    #[must_use]
    pub fn list_name(&self, slot: usize) -> String {
        format!("{} - {slot:03}", self.prefix)
    }
}
