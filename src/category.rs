//! Resource categories - the closed taxonomy of importable labels
//!
//! Every label handed to the importer begins with exactly one of these tags:
//! - Informational: `Whoami`, `CredentialReport` (accepted, never stored)
//! - Identities: `Users`, `Groups`, `Roles`
//! - Resources: `Buckets`, `EC2s`, `VPCs`, `Lambdas`, `RDS`, `DynamoDBs`, `RedshiftDBs`
//!
//! A label such as `Users-us-east-1` classifies as [`Category::Users`]. New
//! categories are added by extending the enum, never inferred from payloads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A resource category, identified by its label tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Caller identity of the collector
    Whoami,
    /// IAM credential report
    CredentialReport,
    Users,
    Groups,
    /// Assumable roles; importing them triggers the access linking pass
    Roles,
    /// Object storage buckets
    Buckets,
    /// Compute instances
    EC2s,
    /// A virtual network document
    VPCs,
    /// Serverless functions
    Lambdas,
    /// Relational database document (instances and clusters)
    RDS,
    /// Key-value tables
    DynamoDBs,
    /// Analytical warehouse clusters
    RedshiftDBs,
}

impl Category {
    /// The label tag for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Whoami => "Whoami",
            Category::CredentialReport => "CredentialReport",
            Category::Users => "Users",
            Category::Groups => "Groups",
            Category::Roles => "Roles",
            Category::Buckets => "Buckets",
            Category::EC2s => "EC2s",
            Category::VPCs => "VPCs",
            Category::Lambdas => "Lambdas",
            Category::RDS => "RDS",
            Category::DynamoDBs => "DynamoDBs",
            Category::RedshiftDBs => "RedshiftDBs",
        }
    }

    /// All categories, in classification order
    pub fn all() -> &'static [Category] {
        &[
            Category::Whoami,
            Category::CredentialReport,
            Category::Users,
            Category::Groups,
            Category::Roles,
            Category::Buckets,
            Category::EC2s,
            Category::VPCs,
            Category::Lambdas,
            Category::RDS,
            Category::DynamoDBs,
            Category::RedshiftDBs,
        ]
    }

    /// Classify a label by tag prefix. First match wins.
    pub fn classify(label: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|category| label.starts_with(category.as_str()))
            .ok_or_else(|| Error::Classification { label: label.to_string() })
    }

    /// Informational categories are accepted but have no graph effect
    pub fn is_informational(&self) -> bool {
        matches!(self, Category::Whoami | Category::CredentialReport)
    }

    /// Whether a successful import of this category must be followed by the linking pass
    pub fn triggers_linking(&self) -> bool {
        matches!(self, Category::Roles)
    }

    /// Whether the payload is a single document rather than a sequence of records
    pub fn is_singleton(&self) -> bool {
        matches!(self, Category::VPCs | Category::RDS)
    }

    /// Position in a batch import; lower values are imported first.
    ///
    /// Roles come last so the linking pass sees every resource of the batch.
    pub fn import_priority(&self) -> u8 {
        match self {
            Category::Whoami | Category::CredentialReport => 0,
            Category::Buckets
            | Category::EC2s
            | Category::VPCs
            | Category::Lambdas
            | Category::RDS
            | Category::DynamoDBs
            | Category::RedshiftDBs => 1,
            Category::Groups => 2,
            Category::Users => 3,
            Category::Roles => 4,
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Exact tag lookup. Use [`Category::classify`] for suffixed labels.
    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::Classification { label: s.to_string() })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
