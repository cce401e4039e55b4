#![allow(dead_code)]

use cloudgraph::linker::LinkStats;
use cloudgraph::resource::{
    Bucket, DynamoDb, Function, Group, Instance, Rds, RedshiftDb, Role, User, Vpc,
};
use cloudgraph::storage::{GraphStore, QueryParams, Row, StoreError, StoreResult};
use serde_json::{Value, json};

/// Store that records every call and can be told to fail one operation
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Vec<(&'static str, usize)>,
    pub fail_on: Option<&'static str>,
}

impl RecordingStore {
    pub fn failing_on(operation: &'static str) -> Self {
        Self { calls: Vec::new(), fail_on: Some(operation) }
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.calls.iter().map(|(op, _)| *op).collect()
    }

    fn record(&mut self, operation: &'static str, records: usize) -> StoreResult<()> {
        self.calls.push((operation, records));
        match self.fail_on {
            Some(op) if op == operation => Err(StoreError::Query(format!("{} refused", op))),
            _ => Ok(()),
        }
    }
}

impl GraphStore for RecordingStore {
    fn add_users(&mut self, users: &[User]) -> StoreResult<()> {
        self.record("add_users", users.len())
    }

    fn add_groups(&mut self, groups: &[Group]) -> StoreResult<()> {
        self.record("add_groups", groups.len())
    }

    fn add_roles(&mut self, roles: &[Role]) -> StoreResult<()> {
        self.record("add_roles", roles.len())
    }

    fn add_buckets(&mut self, buckets: &[Bucket]) -> StoreResult<()> {
        self.record("add_buckets", buckets.len())
    }

    fn add_compute(&mut self, instances: &[Instance]) -> StoreResult<()> {
        self.record("add_compute", instances.len())
    }

    fn add_network(&mut self, _vpc: &Vpc) -> StoreResult<()> {
        self.record("add_network", 1)
    }

    fn add_functions(&mut self, functions: &[Function]) -> StoreResult<()> {
        self.record("add_functions", functions.len())
    }

    fn add_relational_db(&mut self, rds: &Rds) -> StoreResult<()> {
        self.record("add_relational_db", rds.instances.len() + rds.clusters.len())
    }

    fn add_key_value_dbs(&mut self, tables: &[DynamoDb]) -> StoreResult<()> {
        self.record("add_key_value_dbs", tables.len())
    }

    fn add_analytical_dbs(&mut self, clusters: &[RedshiftDb]) -> StoreResult<()> {
        self.record("add_analytical_dbs", clusters.len())
    }

    fn link_roles_to_resources(&mut self) -> StoreResult<LinkStats> {
        self.record("link_roles_to_resources", 0)?;
        Ok(LinkStats::default())
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        self.record("clear_all", 0)
    }

    fn run_query(&self, _query: &str, _params: &QueryParams) -> StoreResult<Vec<Row>> {
        Ok(Vec::new())
    }
}

pub fn users(count: usize) -> Value {
    let users: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "UserName": format!("user-{}", i),
                "UserId": format!("AIDA{:04}", i),
                "Arn": format!("arn:aws:iam::123456789012:user/user-{}", i),
                "Path": "/",
                "Groups": ["engineering"]
            })
        })
        .collect();
    Value::Array(users)
}

pub fn reader_role() -> Value {
    json!([{
        "RoleName": "reader",
        "RoleId": "AROA0001",
        "Arn": "arn:aws:iam::123456789012:role/reader",
        "AssumeRolePolicyDocument": {
            "Version": "2012-10-17",
            "Statement": [{"Effect": "Allow", "Action": "sts:AssumeRole", "Resource": "*"}]
        },
        "InlinePolicies": [{
            "PolicyName": "read-logs",
            "PolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [
                    {"Effect": "Allow", "Action": ["s3:GetObject", "s3:ListBucket"], "Resource": "arn:aws:s3:::logs*"}
                ]
            }
        }]
    }])
}
