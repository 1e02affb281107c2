//! Strongly-typed representations of Gateway API resources.

mod common;
mod list;
mod policy;

pub use common::ApiResponse;
pub use list::{CreateListRequest, ListItem, PatchListRequest, RemoteList};
pub use policy::{GatewayPolicy, PolicyRequest, RuleSettings, traffic_expression};
