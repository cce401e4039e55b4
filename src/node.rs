//! Graph nodes - the stored form of every imported record
//!
//! Each record becomes one node keyed by its ARN:
//! - Identities: `User`, `Group`, `Role`
//! - Resources: `Bucket`, `Instance`, `Vpc`, `Subnet`, `Function`,
//!   `RdsInstance`, `RdsCluster`, `DynamoDb`, `Redshift`

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Node labels in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeLabel {
    User,
    Group,
    Role,
    Bucket,
    Instance,
    Vpc,
    Subnet,
    Function,
    RdsInstance,
    RdsCluster,
    DynamoDb,
    Redshift,
}

impl NodeLabel {
    /// Get the string representation of the label
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::User => "User",
            NodeLabel::Group => "Group",
            NodeLabel::Role => "Role",
            NodeLabel::Bucket => "Bucket",
            NodeLabel::Instance => "Instance",
            NodeLabel::Vpc => "Vpc",
            NodeLabel::Subnet => "Subnet",
            NodeLabel::Function => "Function",
            NodeLabel::RdsInstance => "RdsInstance",
            NodeLabel::RdsCluster => "RdsCluster",
            NodeLabel::DynamoDb => "DynamoDb",
            NodeLabel::Redshift => "Redshift",
        }
    }

    /// Get all node labels
    pub fn all() -> &'static [NodeLabel] {
        &[
            NodeLabel::User,
            NodeLabel::Group,
            NodeLabel::Role,
            NodeLabel::Bucket,
            NodeLabel::Instance,
            NodeLabel::Vpc,
            NodeLabel::Subnet,
            NodeLabel::Function,
            NodeLabel::RdsInstance,
            NodeLabel::RdsCluster,
            NodeLabel::DynamoDb,
            NodeLabel::Redshift,
        ]
    }

    /// Identity nodes are principals, never targets of access edges
    pub fn is_identity(&self) -> bool {
        matches!(self, NodeLabel::User | NodeLabel::Group | NodeLabel::Role)
    }
}

impl FromStr for NodeLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NodeLabel::all()
            .iter()
            .copied()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Config(format!("Unknown node label: {}", s)))
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in the resource graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Resource ARN, the stable identity of the node
    pub id: String,
    pub label: NodeLabel,
    /// Human-facing name (user name, bucket name, instance id...)
    pub name: String,
    /// The full decoded record
    pub properties: serde_json::Value,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        label: NodeLabel,
        name: impl Into<String>,
        properties: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            label,
            name: name.into(),
            properties,
        }
    }

    /// AWS service segment of the node id (`s3` in `arn:aws:s3:::bucket`)
    pub fn service(&self) -> Option<&str> {
        arn_service(&self.id)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Extract the service segment of an ARN
pub fn arn_service(arn: &str) -> Option<&str> {
    let mut parts = arn.splitn(4, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("arn"), Some(_partition), Some(service)) if !service.is_empty() => Some(service),
        _ => None,
    }
}
