//! Object storage buckets

use super::{GraphResource, Tag};
use super::iam::PolicyDocument;
use crate::node::NodeLabel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Bucket policy, when the collector could read it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access_block: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl GraphResource for Bucket {
    const LABEL: NodeLabel = NodeLabel::Bucket;

    fn node_id(&self) -> String {
        format!("arn:aws:s3:::{}", self.name)
    }

    fn node_name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_arn() {
        let bucket: Bucket =
            serde_json::from_str(r#"{"Name": "logs", "CreationDate": "2023-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(bucket.node_id(), "arn:aws:s3:::logs");
    }

    #[test]
    fn test_bucket_sequence_rejects_scalar() {
        assert!(serde_json::from_str::<Vec<Bucket>>("42").is_err());
    }
}
