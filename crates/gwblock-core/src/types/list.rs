use serde::{Deserialize, Serialize};

/// A Gateway domain list as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteList {
    /// Unique list ID
    pub id: String,

    /// List name, carrying the owned prefix tag for lists we manage
    pub name: String,

    /// Number of items in the list
    #[serde(default)]
    pub count: u64,

    /// List items, only present on detail endpoints
    #[serde(default)]
    pub items: Option<Vec<ListItem>>,
}

impl RemoteList {
    /// Returns true if this list is managed by the given owned prefix
    #[must_use]
    pub fn is_owned_by(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// A single entry in a Gateway domain list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// The domain (or IPv4 literal) this entry blocks
    pub value: String,
}

impl ListItem {
    /// Create an item from a domain value
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Request body for creating a Gateway domain list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListRequest {
    /// List name (owned prefix + slot suffix)
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// List type, always "DOMAIN" for this system
    #[serde(rename = "type")]
    pub kind: String,

    /// Initial items
    pub items: Vec<ListItem>,
}

impl CreateListRequest {
    /// Build a DOMAIN-type list request from a chunk of domains
    pub fn domains<I, S>(name: impl Into<String>, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: String::from("Ads & Tracking Domains"),
            kind: String::from("DOMAIN"),
            items: domains.into_iter().map(ListItem::new).collect(),
        }
    }
}

/// Request body for editing the items of an existing list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchListRequest {
    /// Items to append
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub append: Vec<ListItem>,

    /// Item values to remove
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}
