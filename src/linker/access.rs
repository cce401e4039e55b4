//! Role → resource access linking
//!
//! Every `Allow` statement of a role's permission policies is matched against
//! the ids of all stored resource nodes. IAM wildcards (`*`, `?`) in resource
//! patterns are honoured, and an action only reaches resources of its own
//! service (`s3:GetObject` never links to a DynamoDB table). Matches collapse
//! into one `can_access` edge per (role, resource) listing the granting actions.

use crate::edge::Edge;
use crate::node::{Node, NodeLabel, arn_service};
use crate::resource::{Role, Statement};
use crate::storage::{SqliteGraphStore, StoreResult};
use glob::Pattern;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LinkStats {
    /// Roles whose policies were evaluated
    pub roles: usize,
    /// Candidate resource nodes
    pub resources: usize,
    /// Access edges written
    pub edges: usize,
}

impl fmt::Display for LinkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Access Linker Stats:")?;
        writeln!(f, "  Roles: {}", self.roles)?;
        writeln!(f, "  Resources: {}", self.resources)?;
        writeln!(f, "  🔗 Access edges: {}", self.edges)
    }
}

/// The edges a linking pass will write
#[derive(Debug, Clone)]
pub struct AccessPlan {
    pub edges: Vec<Edge>,
    pub stats: LinkStats,
}

pub struct AccessLinker<'a> {
    store: &'a SqliteGraphStore,
}

impl<'a> AccessLinker<'a> {
    pub fn new(store: &'a SqliteGraphStore) -> Self {
        Self { store }
    }

    /// Compute the full access edge set from the current store contents
    pub fn plan(&self) -> StoreResult<AccessPlan> {
        let mut roles = Vec::new();
        for node in self.store.find_nodes_by_label(NodeLabel::Role)? {
            match serde_json::from_value::<Role>(node.properties) {
                Ok(role) => roles.push(role),
                Err(e) => tracing::warn!("Skipping role {} with unreadable policies: {}", node.id, e),
            }
        }

        let resources: Vec<Node> = self
            .store
            .all_nodes()?
            .into_iter()
            .filter(|node| !node.label.is_identity())
            .collect();

        let edges = compute_access_edges(&roles, &resources)?;
        let stats = LinkStats {
            roles: roles.len(),
            resources: resources.len(),
            edges: edges.len(),
        };
        tracing::debug!(
            "Linked {} roles to {} resources with {} edges",
            stats.roles,
            stats.resources,
            stats.edges
        );

        Ok(AccessPlan { edges, stats })
    }
}

/// Access edges granted by `roles` over `resources`, sorted by (role, resource)
pub fn compute_access_edges(roles: &[Role], resources: &[Node]) -> StoreResult<Vec<Edge>> {
    let mut granted: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();

    for role in roles {
        for statement in role.allow_statements() {
            let Some(grant) = Grant::from_statement(statement)? else {
                continue;
            };
            for node in resources {
                let actions = grant.actions_for(node);
                if !actions.is_empty() {
                    granted
                        .entry((role.arn.as_str(), node.id.as_str()))
                        .or_default()
                        .extend(actions);
                }
            }
        }
    }

    Ok(granted
        .into_iter()
        .map(|((role, resource), actions)| {
            Edge::access(role, resource, actions.into_iter().map(String::from).collect())
        })
        .collect())
}

/// One allow statement, compiled
struct Grant<'s> {
    actions: Vec<&'s str>,
    patterns: Vec<Pattern>,
}

impl<'s> Grant<'s> {
    /// `None` for statements granting nothing modelled (NotAction-only)
    fn from_statement(statement: &'s Statement) -> StoreResult<Option<Self>> {
        let actions: Vec<&str> = statement.action.iter().map(String::as_str).collect();
        if actions.is_empty() {
            return Ok(None);
        }
        let mut patterns = Vec::new();
        for resource in statement.resource.iter() {
            patterns.push(resource_pattern(resource)?);
            if let Some(bucket) = object_bucket(resource) {
                patterns.push(resource_pattern(bucket)?);
            }
        }
        Ok(Some(Self { actions, patterns }))
    }

    /// Actions of this statement that reach `node`
    fn actions_for(&self, node: &Node) -> Vec<&'s str> {
        if !self.patterns.iter().any(|p| p.matches(&node.id)) {
            return Vec::new();
        }
        let service = node.service().unwrap_or("");
        self.actions
            .iter()
            .copied()
            .filter(|action| {
                let prefix = action_service(action);
                prefix == "*" || prefix.eq_ignore_ascii_case(service)
            })
            .collect()
    }
}

/// Service prefix of an action (`s3` in `s3:GetObject`, `*` for `*`)
fn action_service(action: &str) -> &str {
    action.split_once(':').map(|(service, _)| service).unwrap_or(action)
}

/// Bucket part of an S3 object pattern (`arn:aws:s3:::logs` in
/// `arn:aws:s3:::logs/*`). Object grants link to the bucket holding the objects.
fn object_bucket(raw: &str) -> Option<&str> {
    if arn_service(raw) != Some("s3") {
        return None;
    }
    let (prefix, resource) = raw.split_once(":::")?;
    let bucket_len = resource.find('/')?;
    Some(&raw[..prefix.len() + 3 + bucket_len])
}

/// Compile an IAM resource pattern. Only `*` and `?` are wildcards.
fn resource_pattern(raw: &str) -> StoreResult<Pattern> {
    let mut escaped = String::with_capacity(raw.len());
    let mut last_star = false;
    for c in raw.chars() {
        match c {
            // glob rejects `**` outside a path component
            '*' if last_star => continue,
            '[' => escaped.push_str("[[]"),
            ']' => escaped.push_str("[]]"),
            _ => escaped.push(c),
        }
        last_star = c == '*';
    }
    Ok(Pattern::new(&escaped)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::GraphResource;
    use crate::resource::{Bucket, DynamoDb, Function};
    use serde_json::json;

    fn role(arn: &str, statements: serde_json::Value) -> Role {
        serde_json::from_value(json!({
            "RoleName": arn.rsplit('/').next().unwrap(),
            "RoleId": "AROA",
            "Arn": arn,
            "InlinePolicies": [{"PolicyName": "p", "PolicyDocument": {"Statement": statements}}]
        }))
        .unwrap()
    }

    fn resources() -> Vec<Node> {
        let bucket: Bucket = serde_json::from_value(json!({"Name": "data-raw"})).unwrap();
        let other: Bucket = serde_json::from_value(json!({"Name": "logs"})).unwrap();
        let table: DynamoDb = serde_json::from_value(json!({
            "TableName": "orders", "TableArn": "arn:aws:dynamodb:us-east-1:1:table/orders"
        }))
        .unwrap();
        let function: Function = serde_json::from_value(json!({
            "FunctionName": "f", "FunctionArn": "arn:aws:lambda:us-east-1:1:function:f"
        }))
        .unwrap();
        vec![
            bucket.to_node().unwrap(),
            other.to_node().unwrap(),
            table.to_node().unwrap(),
            function.to_node().unwrap(),
        ]
    }

    #[test]
    fn test_wildcard_resource_pattern() {
        let roles = vec![role(
            "arn:aws:iam::1:role/reader",
            json!({"Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::data-*"}),
        )];
        let edges = compute_access_edges(&roles, &resources()).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_id, "arn:aws:s3:::data-raw");
        assert_eq!(edges[0].actions, vec!["s3:GetObject"]);
    }

    #[test]
    fn test_actions_filtered_by_service() {
        let roles = vec![role(
            "arn:aws:iam::1:role/mixed",
            json!([{"Effect": "Allow", "Action": ["s3:ListBucket", "dynamodb:Query"], "Resource": "*"}]),
        )];
        let edges = compute_access_edges(&roles, &resources()).unwrap();
        assert_eq!(edges.len(), 3);

        let table = edges
            .iter()
            .find(|e| e.to_id.contains(":dynamodb:"))
            .unwrap();
        assert_eq!(table.actions, vec!["dynamodb:Query"]);
        assert!(edges.iter().all(|e| !e.to_id.contains(":lambda:")));
    }

    #[test]
    fn test_admin_reaches_everything_once() {
        let roles = vec![role(
            "arn:aws:iam::1:role/admin",
            json!([
                {"Effect": "Allow", "Action": "*", "Resource": "*"},
                {"Effect": "Allow", "Action": "s3:*", "Resource": "arn:aws:s3:::*"}
            ]),
        )];
        let edges = compute_access_edges(&roles, &resources()).unwrap();
        assert_eq!(edges.len(), 4);

        let bucket = edges.iter().find(|e| e.to_id == "arn:aws:s3:::logs").unwrap();
        assert_eq!(bucket.actions, vec!["*", "s3:*"]);
    }

    #[test]
    fn test_deny_and_not_action_grant_nothing() {
        let roles = vec![role(
            "arn:aws:iam::1:role/none",
            json!([
                {"Effect": "Deny", "Action": "*", "Resource": "*"},
                {"Effect": "Allow", "NotAction": "iam:*", "Resource": "*"}
            ]),
        )];
        assert!(compute_access_edges(&roles, &resources()).unwrap().is_empty());
    }

    #[test]
    fn test_resource_pattern_escaping() {
        assert!(resource_pattern("arn:aws:s3:::bucket/**").unwrap().matches("arn:aws:s3:::bucket/a/b"));
        assert!(resource_pattern("arn:aws:s3:::b[1]").unwrap().matches("arn:aws:s3:::b[1]"));
        assert!(resource_pattern("arn:aws:s3:::log?").unwrap().matches("arn:aws:s3:::logs"));
        assert!(!resource_pattern("arn:aws:s3:::logs").unwrap().matches("arn:aws:s3:::logs2"));
    }

    #[test]
    fn test_object_grant_links_bucket() {
        let roles = vec![role(
            "arn:aws:iam::1:role/log-reader",
            json!({"Effect": "Allow", "Action": "s3:GetObject", "Resource": "arn:aws:s3:::logs/*"}),
        )];
        let edges = compute_access_edges(&roles, &resources()).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_id, "arn:aws:s3:::logs");
        assert_eq!(edges[0].actions, vec!["s3:GetObject"]);
    }

    #[test]
    fn test_object_bucket() {
        assert_eq!(object_bucket("arn:aws:s3:::logs/*"), Some("arn:aws:s3:::logs"));
        assert_eq!(object_bucket("arn:aws:s3:::data-*/2024/*"), Some("arn:aws:s3:::data-*"));
        assert_eq!(object_bucket("arn:aws:s3:::logs"), None);
        assert_eq!(object_bucket("arn:aws:dynamodb:us-east-1:1:table/orders"), None);
        assert_eq!(object_bucket("*"), None);
    }

    #[test]
    fn test_action_service() {
        assert_eq!(action_service("s3:GetObject"), "s3");
        assert_eq!(action_service("*"), "*");
    }
}
