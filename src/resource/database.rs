//! Managed databases: relational, key-value and analytical

use super::{GraphResource, region_of_zone};
use crate::node::NodeLabel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbInstance {
    #[serde(rename = "DBInstanceIdentifier")]
    pub identifier: String,
    #[serde(rename = "DBInstanceArn")]
    pub arn: String,
    #[serde(rename = "DBInstanceClass", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(rename = "Engine", default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(rename = "EngineVersion", default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    #[serde(rename = "DBInstanceStatus", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Endpoint", default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    #[serde(rename = "PubliclyAccessible", default)]
    pub publicly_accessible: bool,
    #[serde(rename = "StorageEncrypted", default)]
    pub storage_encrypted: bool,
    #[serde(rename = "DBClusterIdentifier", default, skip_serializing_if = "Option::is_none")]
    pub cluster_identifier: Option<String>,
}

impl GraphResource for DbInstance {
    const LABEL: NodeLabel = NodeLabel::RdsInstance;

    fn node_id(&self) -> String {
        self.arn.clone()
    }

    fn node_name(&self) -> String {
        self.identifier.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterMember {
    #[serde(rename = "DBInstanceIdentifier")]
    pub instance_identifier: String,
    #[serde(rename = "IsClusterWriter", default)]
    pub is_writer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbCluster {
    #[serde(rename = "DBClusterIdentifier")]
    pub identifier: String,
    #[serde(rename = "DBClusterArn")]
    pub arn: String,
    #[serde(rename = "Engine", default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(rename = "EngineVersion", default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Endpoint", default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(rename = "DatabaseName", default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
    #[serde(rename = "StorageEncrypted", default)]
    pub storage_encrypted: bool,
    #[serde(rename = "DBClusterMembers", default)]
    pub members: Vec<ClusterMember>,
}

impl GraphResource for DbCluster {
    const LABEL: NodeLabel = NodeLabel::RdsCluster;

    fn node_id(&self) -> String {
        self.arn.clone()
    }

    fn node_name(&self) -> String {
        self.identifier.clone()
    }
}

/// The relational database document: every instance and cluster of an account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rds {
    #[serde(rename = "DBInstances", default)]
    pub instances: Vec<DbInstance>,
    #[serde(rename = "DBClusters", default)]
    pub clusters: Vec<DbCluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: String,
}

/// A key-value table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DynamoDb {
    pub table_name: String,
    pub table_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_size_bytes: Option<i64>,
    #[serde(default)]
    pub key_schema: Vec<KeySchemaElement>,
    #[serde(rename = "SSEDescription", default, skip_serializing_if = "Option::is_none")]
    pub sse_description: Option<serde_json::Value>,
}

impl GraphResource for DynamoDb {
    const LABEL: NodeLabel = NodeLabel::DynamoDb;

    fn node_id(&self) -> String {
        self.table_arn.clone()
    }

    fn node_name(&self) -> String {
        self.table_name.clone()
    }
}

/// An analytical warehouse cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedshiftDb {
    pub cluster_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_status: Option<String>,
    #[serde(rename = "DBName", default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub publicly_accessible: bool,
    #[serde(default)]
    pub encrypted: bool,
    /// Owning account; the describe call does not return a cluster ARN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

impl GraphResource for RedshiftDb {
    const LABEL: NodeLabel = NodeLabel::Redshift;

    fn node_id(&self) -> String {
        format!(
            "arn:aws:redshift:{}:{}:cluster:{}",
            region_of_zone(&self.availability_zone),
            self.account_id.as_deref().unwrap_or(""),
            self.cluster_identifier
        )
    }

    fn node_name(&self) -> String {
        self.cluster_identifier.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_rds_document() {
        let rds: Rds = serde_json::from_str(
            r#"{
                "DBInstances": [{
                    "DBInstanceIdentifier": "orders-1",
                    "DBInstanceArn": "arn:aws:rds:us-east-1:1:db:orders-1",
                    "Engine": "aurora-postgresql",
                    "Endpoint": {"Address": "orders-1.x.rds.amazonaws.com", "Port": 5432},
                    "DBClusterIdentifier": "orders"
                }],
                "DBClusters": [{
                    "DBClusterIdentifier": "orders",
                    "DBClusterArn": "arn:aws:rds:us-east-1:1:cluster:orders",
                    "DBClusterMembers": [{"DBInstanceIdentifier": "orders-1", "IsClusterWriter": true}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(rds.instances[0].node_name(), "orders-1");
        assert_eq!(rds.instances[0].endpoint.as_ref().unwrap().port, Some(5432));
        assert!(rds.clusters[0].members[0].is_writer);
    }

    #[test]
    fn test_empty_rds_document() {
        let rds: Rds = serde_json::from_str("{}").unwrap();
        assert!(rds.instances.is_empty());
        assert!(rds.clusters.is_empty());
    }

    #[test]
    fn test_redshift_arn() {
        let cluster: RedshiftDb = serde_json::from_str(
            r#"{"ClusterIdentifier": "dw", "AvailabilityZone": "us-west-2a", "AccountId": "1", "DBName": "dev"}"#,
        )
        .unwrap();
        assert_eq!(cluster.node_id(), "arn:aws:redshift:us-west-2:1:cluster:dw");
        assert_eq!(cluster.db_name.as_deref(), Some("dev"));
    }

    #[test]
    fn test_dynamodb_sse_field_name() {
        let table: DynamoDb = serde_json::from_str(
            r#"{"TableName": "t", "TableArn": "arn:aws:dynamodb:us-east-1:1:table/t", "SSEDescription": {"Status": "ENABLED"}}"#,
        )
        .unwrap();
        assert_eq!(table.sse_description.unwrap()["Status"], "ENABLED");
    }
}
