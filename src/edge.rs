//! Edge types - relationships between resource nodes
//!
//! Three edge kinds exist:
//! - `MemberOf`: user → group
//! - `Contains`: vpc → subnet, rds cluster → instance
//! - `CanAccess`: role → resource, owned by the linking pass

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// User belongs to a group
    MemberOf,
    /// Network contains a subnet, cluster contains an instance
    Contains,
    /// Role is allowed some actions on a resource
    CanAccess,
}

impl EdgeKind {
    /// Get the string representation of the edge kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::MemberOf => "member_of",
            EdgeKind::Contains => "contains",
            EdgeKind::CanAccess => "can_access",
        }
    }

    /// Get all edge kinds
    pub fn all() -> &'static [EdgeKind] {
        &[EdgeKind::MemberOf, EdgeKind::Contains, EdgeKind::CanAccess]
    }
}

impl FromStr for EdgeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member_of" | "memberof" => Ok(EdgeKind::MemberOf),
            "contains" | "contain" => Ok(EdgeKind::Contains),
            "can_access" | "canaccess" | "access" => Ok(EdgeKind::CanAccess),
            _ => Err(crate::Error::Config(format!("Unknown edge kind: {}", s))),
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id
    pub from_id: String,
    /// Target node id
    pub to_id: String,
    pub kind: EdgeKind,
    /// Allowed actions, only populated on `CanAccess` edges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
}

impl Edge {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
            actions: Vec::new(),
        }
    }

    /// Create an access edge carrying the actions that grant it
    pub fn access(from_id: impl Into<String>, to_id: impl Into<String>, actions: Vec<String>) -> Self {
        Self {
            actions,
            ..Self::new(from_id, to_id, EdgeKind::CanAccess)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.from_id == other.from_id && self.to_id == other.to_id && self.kind == other.kind
    }
}

impl Eq for Edge {}

impl std::hash::Hash for Edge {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.from_id.hash(state);
        self.to_id.hash(state);
        self.kind.hash(state);
    }
}
