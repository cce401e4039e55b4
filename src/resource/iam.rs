//! IAM records - users, groups, roles and their policy documents

use super::{GraphResource, OneOrMany, Tag};
use crate::node::NodeLabel;
use serde::{Deserialize, Serialize};

/// Statement effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// One statement of a policy document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(default)]
    pub action: OneOrMany<String>,
    #[serde(default, skip_serializing_if = "OneOrMany::is_empty")]
    pub not_action: OneOrMany<String>,
    #[serde(default)]
    pub resource: OneOrMany<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
}

impl Statement {
    pub fn is_allow(&self) -> bool {
        self.effect == Effect::Allow
    }
}

/// An IAM policy document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub statement: OneOrMany<Statement>,
}

impl PolicyDocument {
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statement.iter()
    }
}

/// A managed policy attached to a principal. The collector may inline the
/// default version's document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttachedPolicy {
    pub policy_name: String,
    pub policy_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<PolicyDocument>,
}

/// A policy embedded in a principal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_last_used: Option<String>,
    /// Names of the groups the user belongs to
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub attached_policies: Vec<AttachedPolicy>,
    #[serde(default)]
    pub inline_policies: Vec<InlinePolicy>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl GraphResource for User {
    const LABEL: NodeLabel = NodeLabel::User;

    fn node_id(&self) -> String {
        self.arn.clone()
    }

    fn node_name(&self) -> String {
        self.user_name.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub group_name: String,
    pub group_id: String,
    pub arn: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default)]
    pub attached_policies: Vec<AttachedPolicy>,
    #[serde(default)]
    pub inline_policies: Vec<InlinePolicy>,
}

impl GraphResource for Group {
    const LABEL: NodeLabel = NodeLabel::Group;

    fn node_id(&self) -> String {
        self.arn.clone()
    }

    fn node_name(&self) -> String {
        self.group_name.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub role_name: String,
    pub role_id: String,
    pub arn: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<u32>,
    /// Trust policy: who may assume the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_policy_document: Option<PolicyDocument>,
    #[serde(default)]
    pub attached_policies: Vec<AttachedPolicy>,
    #[serde(default)]
    pub inline_policies: Vec<InlinePolicy>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Role {
    /// Allow statements from every permission policy of the role
    pub fn allow_statements(&self) -> impl Iterator<Item = &Statement> {
        let attached = self
            .attached_policies
            .iter()
            .filter_map(|p| p.document.as_ref());
        let inline = self.inline_policies.iter().map(|p| &p.policy_document);

        attached
            .chain(inline)
            .flat_map(PolicyDocument::statements)
            .filter(|s| s.is_allow())
    }
}

impl GraphResource for Role {
    const LABEL: NodeLabel = NodeLabel::Role;

    fn node_id(&self) -> String {
        self.arn.clone()
    }

    fn node_name(&self) -> String {
        self.role_name.clone()
    }
}
