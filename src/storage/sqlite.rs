//! SQLite storage implementation

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::Value;
use crate::edge::{Edge, EdgeKind};
use crate::linker::{AccessLinker, LinkStats};
use crate::node::{Node, NodeLabel};
use crate::resource::{
    Bucket, DynamoDb, Function, GraphResource, Group, Instance, Rds, RedshiftDb, Role, User, Vpc,
    name_tag,
};
use super::{GraphStore, QueryParams, Row, StoreError, StoreResult, schema};

/// URL selecting a private in-memory database
pub const MEMORY_URL: &str = "sqlite::memory:";

/// SQLite-backed graph store
pub struct SqliteGraphStore {
    conn: Connection,
}

impl SqliteGraphStore {
    /// Open a database file (creates it and its directory if needed)
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open the database named by `url` and authenticate as `principal`.
    ///
    /// Accepted URLs: `sqlite::memory:`, `sqlite://<path>` or a bare path.
    pub fn connect(url: &str, principal: &str, credential: &str) -> StoreResult<Self> {
        let store = match database_path(url) {
            Some(path) => Self::open(&path)?,
            None => Self::open_in_memory()?,
        };
        store.authenticate(principal, credential)?;
        tracing::debug!("Connected to graph store {} as {}", url, principal);
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> StoreResult<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Check the principal and credential against the ones recorded at first
    /// open; record them if the database is new.
    pub fn authenticate(&self, principal: &str, credential: &str) -> StoreResult<()> {
        let digest = credential_digest(principal, credential);
        let recorded: Option<(String, String)> = self
            .conn
            .query_row(
                r#"
                SELECT p.value, c.value FROM meta p, meta c
                WHERE p.key = 'principal' AND c.key = 'credential_digest'
                "#,
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match recorded {
            Some((p, d)) if p == principal && d == digest => Ok(()),
            Some(_) => Err(StoreError::Authentication(principal.to_string())),
            None => {
                self.conn.execute(
                    "INSERT OR REPLACE INTO meta (key, value) VALUES ('principal', ?1), ('credential_digest', ?2)",
                    params![principal, digest],
                )?;
                Ok(())
            }
        }
    }

    /// Run `f` in a transaction; nothing is written unless it succeeds
    fn write<F>(&mut self, f: F) -> StoreResult<()>
    where
        F: FnOnce(&Transaction<'_>) -> StoreResult<()>,
    {
        let tx = self.conn.transaction()?;
        f(&tx)?;
        tx.commit()?;
        Ok(())
    }

    fn add_resources<R: GraphResource>(&mut self, records: &[R]) -> StoreResult<()> {
        let nodes = to_nodes(records)?;
        self.write(|tx| upsert_nodes(tx, &nodes))?;
        tracing::debug!("Stored {} {} nodes", nodes.len(), R::LABEL);
        Ok(())
    }

    fn add_identities<R: GraphResource>(&mut self, records: &[R]) -> StoreResult<()> {
        let nodes = to_nodes(records)?;
        self.write(|tx| {
            upsert_nodes(tx, &nodes)?;
            tx.execute_batch(schema::RELINK_MEMBERSHIPS)?;
            Ok(())
        })?;
        tracing::debug!("Stored {} {} nodes", nodes.len(), R::LABEL);
        Ok(())
    }

    /// Replace every `can_access` edge with `edges`
    fn replace_access_edges(&mut self, edges: &[Edge]) -> StoreResult<()> {
        self.write(|tx| {
            tx.execute("DELETE FROM edges WHERE kind = ?1", [EdgeKind::CanAccess.as_str()])?;
            upsert_edges(tx, edges)
        })
    }

    // ========== Node Operations ==========

    /// Get a node by id
    pub fn get_node(&self, id: &str) -> StoreResult<Option<Node>> {
        self.conn
            .query_row(
                "SELECT id, label, name, properties FROM nodes WHERE id = ?1",
                [id],
                row_to_node,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Find nodes by label
    pub fn find_nodes_by_label(&self, label: NodeLabel) -> StoreResult<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label, name, properties FROM nodes WHERE label = ?1 ORDER BY id")?;
        let nodes = stmt
            .query_map([label.as_str()], row_to_node)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    /// All nodes, ordered by id
    pub fn all_nodes(&self) -> StoreResult<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, label, name, properties FROM nodes ORDER BY id")?;
        let nodes = stmt
            .query_map([], row_to_node)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    /// Count all nodes
    pub fn count_nodes(&self) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Edge Operations ==========

    /// Get edges from a node
    pub fn get_edges_from(&self, id: &str) -> StoreResult<Vec<Edge>> {
        let mut stmt = self
            .conn
            .prepare("SELECT from_id, to_id, kind, actions FROM edges WHERE from_id = ?1 ORDER BY to_id")?;
        let edges = stmt
            .query_map([id], row_to_edge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    /// Get edges by kind
    pub fn get_edges_by_kind(&self, kind: EdgeKind) -> StoreResult<Vec<Edge>> {
        let mut stmt = self.conn.prepare(
            "SELECT from_id, to_id, kind, actions FROM edges WHERE kind = ?1 ORDER BY from_id, to_id",
        )?;
        let edges = stmt
            .query_map([kind.as_str()], row_to_edge)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    /// Count all edges
    pub fn count_edges(&self) -> StoreResult<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> StoreResult<GraphStats> {
        Ok(GraphStats {
            nodes: self.grouped_counts("SELECT label, COUNT(*) FROM nodes GROUP BY label")?,
            edges: self.grouped_counts("SELECT kind, COUNT(*) FROM edges GROUP BY kind")?,
        })
    }

    fn grouped_counts(&self, sql: &str) -> StoreResult<BTreeMap<String, usize>> {
        let mut stmt = self.conn.prepare(sql)?;
        let counts = stmt
            .query_map([], |row| {
                let key: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((key, count as usize))
            })?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(counts)
    }
}

impl GraphStore for SqliteGraphStore {
    fn add_users(&mut self, users: &[User]) -> StoreResult<()> {
        self.add_identities(users)
    }

    fn add_groups(&mut self, groups: &[Group]) -> StoreResult<()> {
        self.add_identities(groups)
    }

    fn add_roles(&mut self, roles: &[Role]) -> StoreResult<()> {
        self.add_resources(roles)
    }

    fn add_buckets(&mut self, buckets: &[Bucket]) -> StoreResult<()> {
        self.add_resources(buckets)
    }

    fn add_compute(&mut self, instances: &[Instance]) -> StoreResult<()> {
        self.add_resources(instances)
    }

    fn add_network(&mut self, vpc: &Vpc) -> StoreResult<()> {
        let vpc_id = vpc.node_id();
        let mut nodes = vec![vpc.to_node()?];
        let mut edges = Vec::with_capacity(vpc.subnets.len());

        for subnet in &vpc.subnets {
            let subnet_id = vpc.subnet_id(subnet);
            let name = name_tag(&subnet.tags).unwrap_or(&subnet.subnet_id);
            nodes.push(Node::new(
                subnet_id.clone(),
                NodeLabel::Subnet,
                name,
                serde_json::to_value(subnet)?,
            ));
            edges.push(Edge::new(vpc_id.clone(), subnet_id, EdgeKind::Contains));
        }

        self.write(|tx| {
            upsert_nodes(tx, &nodes)?;
            upsert_edges(tx, &edges)
        })?;
        tracing::debug!("Stored network {} with {} subnets", vpc.vpc_id, edges.len());
        Ok(())
    }

    fn add_functions(&mut self, functions: &[Function]) -> StoreResult<()> {
        self.add_resources(functions)
    }

    fn add_relational_db(&mut self, rds: &Rds) -> StoreResult<()> {
        let mut nodes = to_nodes(&rds.instances)?;
        nodes.extend(to_nodes(&rds.clusters)?);

        let instance_ids: HashMap<&str, &str> = rds
            .instances
            .iter()
            .map(|i| (i.identifier.as_str(), i.arn.as_str()))
            .collect();
        let edges: Vec<Edge> = rds
            .clusters
            .iter()
            .flat_map(|cluster| {
                cluster.members.iter().filter_map(|member| {
                    instance_ids
                        .get(member.instance_identifier.as_str())
                        .map(|arn| Edge::new(cluster.arn.as_str(), *arn, EdgeKind::Contains))
                })
            })
            .collect();

        self.write(|tx| {
            upsert_nodes(tx, &nodes)?;
            upsert_edges(tx, &edges)
        })?;
        tracing::debug!(
            "Stored {} RDS instances and {} clusters",
            rds.instances.len(),
            rds.clusters.len()
        );
        Ok(())
    }

    fn add_key_value_dbs(&mut self, tables: &[DynamoDb]) -> StoreResult<()> {
        self.add_resources(tables)
    }

    fn add_analytical_dbs(&mut self, clusters: &[RedshiftDb]) -> StoreResult<()> {
        self.add_resources(clusters)
    }

    fn link_roles_to_resources(&mut self) -> StoreResult<LinkStats> {
        let plan = AccessLinker::new(self).plan()?;
        self.replace_access_edges(&plan.edges)?;
        Ok(plan.stats)
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        self.write(|tx| {
            tx.execute("DELETE FROM edges", [])?;
            tx.execute("DELETE FROM nodes", [])?;
            Ok(())
        })
    }

    fn run_query(&self, query: &str, params: &QueryParams) -> StoreResult<Vec<Row>> {
        let mut stmt = self.conn.prepare(query)?;
        if !stmt.readonly() {
            return Err(StoreError::Query("only read-only statements are accepted".to_string()));
        }

        for (name, value) in params {
            let key = if name.starts_with([':', '@', '$']) {
                name.clone()
            } else {
                format!(":{}", name)
            };
            let index = stmt
                .parameter_index(&key)?
                .ok_or_else(|| StoreError::Query(format!("unknown parameter: {}", name)))?;
            stmt.raw_bind_parameter(index, to_sql_value(value))?;
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (i, column) in columns.iter().enumerate() {
                record.insert(column.clone(), from_sql_value(row.get_ref(i)?));
            }
            results.push(record);
        }
        Ok(results)
    }
}

/// Database file named by a connection URL; `None` for in-memory
pub fn database_path(url: &str) -> Option<PathBuf> {
    match url {
        MEMORY_URL | ":memory:" | "sqlite://:memory:" => None,
        _ => Some(PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(url))),
    }
}

fn credential_digest(principal: &str, credential: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(principal.as_bytes());
    hasher.update(&[0]);
    hasher.update(credential.as_bytes());
    hasher.finalize().to_hex().to_string()
}

fn to_nodes<R: GraphResource>(records: &[R]) -> StoreResult<Vec<Node>> {
    records
        .iter()
        .map(|record| record.to_node().map_err(StoreError::from))
        .collect()
}

fn upsert_nodes(conn: &Connection, nodes: &[Node]) -> StoreResult<()> {
    let mut stmt = conn.prepare_cached(schema::UPSERT_NODE)?;
    for node in nodes {
        stmt.execute(params![
            node.id,
            node.label.as_str(),
            node.name,
            node.properties.to_string(),
        ])?;
    }
    Ok(())
}

fn upsert_edges(conn: &Connection, edges: &[Edge]) -> StoreResult<()> {
    let mut stmt = conn.prepare_cached(schema::UPSERT_EDGE)?;
    for edge in edges {
        stmt.execute(params![
            edge.from_id,
            edge.to_id,
            edge.kind.as_str(),
            serde_json::to_string(&edge.actions)?,
        ])?;
    }
    Ok(())
}

/// Helper to convert a row to a Node
fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<Node> {
    let label_str: String = row.get(1)?;
    let properties_str: String = row.get(3)?;

    let label: NodeLabel = label_str.parse().map_err(|e: crate::Error| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let properties: Value = serde_json::from_str(&properties_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Node {
        id: row.get(0)?,
        label,
        name: row.get(2)?,
        properties,
    })
}

/// Helper to convert a row to an Edge
fn row_to_edge(row: &rusqlite::Row) -> rusqlite::Result<Edge> {
    let kind_str: String = row.get(2)?;
    let actions_str: String = row.get(3)?;

    let kind: EdgeKind = kind_str.parse().map_err(|e: crate::Error| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let actions: Vec<String> = serde_json::from_str(&actions_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Edge {
        from_id: row.get(0)?,
        to_id: row.get(1)?,
        kind,
        actions,
    })
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real))
            .unwrap_or(SqlValue::Null),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => SqlValue::Text(value.to_string()),
    }
}

/// Text columns holding JSON documents come back as JSON
fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            if text.starts_with(['{', '[']) {
                if let Ok(json) = serde_json::from_str(&text) {
                    return json;
                }
            }
            Value::String(text.into_owned())
        }
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}

/// Node and edge counts
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct GraphStats {
    /// Node count per label
    pub nodes: BTreeMap<String, usize>,
    /// Edge count per kind
    pub edges: BTreeMap<String, usize>,
}

impl GraphStats {
    pub fn total_nodes(&self) -> usize {
        self.nodes.values().sum()
    }

    pub fn total_edges(&self) -> usize {
        self.edges.values().sum()
    }
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph Statistics:")?;
        writeln!(f, "  Nodes: {}", self.total_nodes())?;
        for (label, count) in &self.nodes {
            writeln!(f, "    {}: {}", label, count)?;
        }
        writeln!(f, "  Edges: {}", self.total_edges())?;
        for (kind, count) in &self.edges {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            {"UserName": "alice", "UserId": "AIDA1", "Arn": "arn:aws:iam::1:user/alice", "Groups": ["admins"]},
            {"UserName": "bob", "UserId": "AIDA2", "Arn": "arn:aws:iam::1:user/bob", "Groups": ["admins", "devs"]}
        ]))
        .unwrap()
    }

    fn groups() -> Vec<Group> {
        serde_json::from_value(json!([
            {"GroupName": "admins", "GroupId": "AGPA1", "Arn": "arn:aws:iam::1:group/admins"},
            {"GroupName": "devs", "GroupId": "AGPA2", "Arn": "arn:aws:iam::1:group/devs"}
        ]))
        .unwrap()
    }

    fn buckets(names: &[&str]) -> Vec<Bucket> {
        let values: Vec<Value> = names.iter().map(|n| json!({"Name": n})).collect();
        serde_json::from_value(Value::Array(values)).unwrap()
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        store.add_buckets(&buckets(&["a", "b"])).unwrap();
        store.add_buckets(&buckets(&["a", "b"])).unwrap();
        assert_eq!(store.count_nodes().unwrap(), 2);

        let node = store.get_node("arn:aws:s3:::a").unwrap().unwrap();
        assert_eq!(node.label, NodeLabel::Bucket);
        assert_eq!(node.name, "a");
    }

    #[test]
    fn test_memberships_in_either_order() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        store.add_users(&users()).unwrap();
        assert!(store.get_edges_by_kind(EdgeKind::MemberOf).unwrap().is_empty());

        store.add_groups(&groups()).unwrap();
        let edges = store.get_edges_by_kind(EdgeKind::MemberOf).unwrap();
        assert_eq!(edges.len(), 3);

        store.add_users(&users()).unwrap();
        assert_eq!(store.get_edges_by_kind(EdgeKind::MemberOf).unwrap().len(), 3);
    }

    #[test]
    fn test_memberships_stay_within_account() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let alice: Vec<User> = serde_json::from_value(json!([
            {"UserName": "alice", "UserId": "AIDA1", "Arn": "arn:aws:iam::111:user/alice", "Groups": ["admins"]}
        ]))
        .unwrap();
        let admins: Vec<Group> = serde_json::from_value(json!([
            {"GroupName": "admins", "GroupId": "AGPA1", "Arn": "arn:aws:iam::111:group/admins"},
            {"GroupName": "admins", "GroupId": "AGPA2", "Arn": "arn:aws:iam::222:group/admins"}
        ]))
        .unwrap();

        store.add_users(&alice).unwrap();
        store.add_groups(&admins).unwrap();

        let edges = store.get_edges_by_kind(EdgeKind::MemberOf).unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from_id, "arn:aws:iam::111:user/alice");
        assert_eq!(edges[0].to_id, "arn:aws:iam::111:group/admins");
    }

    #[test]
    fn test_network_contains_subnets() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let vpc: Vpc = serde_json::from_value(json!({
            "VpcId": "vpc-1", "OwnerId": "1", "Region": "us-east-1",
            "Subnets": [{"SubnetId": "subnet-a"}, {"SubnetId": "subnet-b"}]
        }))
        .unwrap();
        store.add_network(&vpc).unwrap();

        let edges = store.get_edges_from("arn:aws:ec2:us-east-1:1:vpc/vpc-1").unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::Contains));
        assert_eq!(store.find_nodes_by_label(NodeLabel::Subnet).unwrap().len(), 2);
    }

    #[test]
    fn test_rds_cluster_members() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        let rds: Rds = serde_json::from_value(json!({
            "DBInstances": [{"DBInstanceIdentifier": "db-1", "DBInstanceArn": "arn:aws:rds:us-east-1:1:db:db-1"}],
            "DBClusters": [{
                "DBClusterIdentifier": "c", "DBClusterArn": "arn:aws:rds:us-east-1:1:cluster:c",
                "DBClusterMembers": [{"DBInstanceIdentifier": "db-1"}, {"DBInstanceIdentifier": "elsewhere"}]
            }]
        }))
        .unwrap();
        store.add_relational_db(&rds).unwrap();

        assert_eq!(store.count_nodes().unwrap(), 2);
        let edges = store.get_edges_from("arn:aws:rds:us-east-1:1:cluster:c").unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_id, "arn:aws:rds:us-east-1:1:db:db-1");
    }

    #[test]
    fn test_clear_all() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        store.add_users(&users()).unwrap();
        store.add_groups(&groups()).unwrap();
        store.clear_all().unwrap();
        assert_eq!(store.count_nodes().unwrap(), 0);
        assert_eq!(store.count_edges().unwrap(), 0);
    }

    #[test]
    fn test_run_query_with_params() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        store.add_buckets(&buckets(&["a", "b", "c"])).unwrap();

        let mut params = QueryParams::new();
        params.insert("name".into(), json!("b"));
        let rows = store
            .run_query("SELECT id, name, properties FROM nodes WHERE name = :name", &params)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "arn:aws:s3:::b");
        assert_eq!(rows[0]["properties"]["Name"], "b");

        let mut prefixed = QueryParams::new();
        prefixed.insert(":label".into(), json!("Bucket"));
        let rows = store
            .run_query("SELECT COUNT(*) AS n FROM nodes WHERE label = :label", &prefixed)
            .unwrap();
        assert_eq!(rows[0]["n"], 3);
    }

    #[test]
    fn test_run_query_rejects_writes_and_unknown_params() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        let err = store.run_query("DELETE FROM nodes", &QueryParams::new()).unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));

        let mut params = QueryParams::new();
        params.insert("missing".into(), json!(1));
        let err = store.run_query("SELECT * FROM nodes", &params).unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
    }

    #[test]
    fn test_authenticate() {
        let store = SqliteGraphStore::open_in_memory().unwrap();
        store.authenticate("graph", "secret").unwrap();
        store.authenticate("graph", "secret").unwrap();
        assert!(matches!(
            store.authenticate("graph", "wrong"),
            Err(StoreError::Authentication(_))
        ));
        assert!(matches!(
            store.authenticate("other", "secret"),
            Err(StoreError::Authentication(_))
        ));
    }

    #[test]
    fn test_database_path() {
        assert_eq!(database_path(MEMORY_URL), None);
        assert_eq!(database_path(":memory:"), None);
        assert_eq!(database_path("sqlite://data/graph.db"), Some(PathBuf::from("data/graph.db")));
        assert_eq!(database_path("graph.db"), Some(PathBuf::from("graph.db")));
    }

    #[test]
    fn test_stats() {
        let mut store = SqliteGraphStore::open_in_memory().unwrap();
        store.add_users(&users()).unwrap();
        store.add_groups(&groups()).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.nodes["User"], 2);
        assert_eq!(stats.nodes["Group"], 2);
        assert_eq!(stats.edges["member_of"], 3);
        assert_eq!(stats.total_nodes(), 4);
    }
}
