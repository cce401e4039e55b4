//! Compute instances and virtual networks

use super::{GraphResource, Tag, name_tag, region_of_zone};
use crate::node::NodeLabel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Placement {
    #[serde(default)]
    pub availability_zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IamInstanceProfile {
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupIdentifier {
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Instance {
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<InstanceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<IamInstanceProfile>,
    #[serde(default)]
    pub security_groups: Vec<GroupIdentifier>,
    /// Account owning the reservation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Instance {
    pub fn region(&self) -> &str {
        self.placement
            .as_ref()
            .map(|p| region_of_zone(&p.availability_zone))
            .unwrap_or("")
    }
}

impl GraphResource for Instance {
    const LABEL: NodeLabel = NodeLabel::Instance;

    fn node_id(&self) -> String {
        format!(
            "arn:aws:ec2:{}:{}:instance/{}",
            self.region(),
            self.owner_id.as_deref().unwrap_or(""),
            self.instance_id
        )
    }

    fn node_name(&self) -> String {
        name_tag(&self.tags).unwrap_or(&self.instance_id).to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub subnet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub map_public_ip_on_launch: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_id: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_permissions: Option<serde_json::Value>,
}

/// A virtual network with its subnets and security groups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Vpc {
    pub vpc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Vpc {
    fn region(&self) -> &str {
        self.region.as_deref().unwrap_or("")
    }

    /// Node id of one of this network's subnets
    pub fn subnet_id(&self, subnet: &Subnet) -> String {
        let region = match region_of_zone(&subnet.availability_zone) {
            "" => self.region(),
            region => region,
        };
        format!(
            "arn:aws:ec2:{}:{}:subnet/{}",
            region,
            self.owner_id.as_deref().unwrap_or(""),
            subnet.subnet_id
        )
    }
}

impl GraphResource for Vpc {
    const LABEL: NodeLabel = NodeLabel::Vpc;

    fn node_id(&self) -> String {
        format!(
            "arn:aws:ec2:{}:{}:vpc/{}",
            self.region(),
            self.owner_id.as_deref().unwrap_or(""),
            self.vpc_id
        )
    }

    fn node_name(&self) -> String {
        name_tag(&self.tags).unwrap_or(&self.vpc_id).to_string()
    }
}
