//! Resource Schemas - provider-shaped records for every category
//!
//! Records mirror the AWS API descriptions the collector emits (PascalCase
//! JSON). Unknown fields are ignored; identity fields are required so that a
//! payload of the wrong shape fails to decode instead of producing empty nodes.

pub mod iam;
pub mod s3;
pub mod ec2;
pub mod lambda;
pub mod database;

pub use iam::{AttachedPolicy, Effect, Group, InlinePolicy, PolicyDocument, Role, Statement, User};
pub use s3::Bucket;
pub use ec2::{Instance, Subnet, Vpc};
pub use lambda::Function;
pub use database::{DbCluster, DbInstance, DynamoDb, Rds, RedshiftDb};

use crate::node::{Node, NodeLabel};
use serde::{Deserialize, Serialize};

/// A record that materializes as one graph node
pub trait GraphResource: Serialize {
    /// Label of the node this record becomes
    const LABEL: NodeLabel;

    /// Stable node id, the ARN
    fn node_id(&self) -> String;

    /// Display name of the node
    fn node_name(&self) -> String;

    /// Build the node, storing the full record as its properties
    fn to_node(&self) -> serde_json::Result<Node> {
        Ok(Node::new(
            self.node_id(),
            Self::LABEL,
            self.node_name(),
            serde_json::to_value(self)?,
        ))
    }
}

/// A key/value resource tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Value of the `Name` tag, if any
pub fn name_tag(tags: &[Tag]) -> Option<&str> {
    tags.iter()
        .find(|t| t.key == "Name" && !t.value.is_empty())
        .map(|t| t.value.as_str())
}

/// A field AWS serializes either as a single value or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OneOrMany::Many(values) if values.is_empty())
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Region of an availability zone (`us-east-1a` → `us-east-1`)
pub fn region_of_zone(zone: &str) -> &str {
    zone.trim_end_matches(|c: char| c.is_ascii_alphabetic())
}
