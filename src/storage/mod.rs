//! Storage Layer - the graph store facade and its SQLite implementation
//!
//! The importer depends only on [`GraphStore`]. The shipped implementation is
//! SQLite with tables:
//! - nodes(id, label, name, properties)
//! - edges(from_id, to_id, kind, actions)
//! - meta(key, value)

pub mod schema;
pub mod sqlite;

pub use sqlite::{GraphStats, SqliteGraphStore};

use crate::linker::LinkStats;
use crate::resource::{Bucket, DynamoDb, Function, Group, Instance, Rds, RedshiftDb, Role, User, Vpc};

/// A result row, keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Named query parameters
pub type QueryParams = serde_json::Map<String, serde_json::Value>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by a graph store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid resource pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Authentication failed for principal {0}")]
    Authentication(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The graph store facade.
///
/// One mutation per data-bearing category, plus the linking pass, a full
/// reset and read access. Mutations take `&mut self`: a store is driven by one
/// caller at a time.
pub trait GraphStore {
    fn add_users(&mut self, users: &[User]) -> StoreResult<()>;

    fn add_groups(&mut self, groups: &[Group]) -> StoreResult<()>;

    fn add_roles(&mut self, roles: &[Role]) -> StoreResult<()>;

    fn add_buckets(&mut self, buckets: &[Bucket]) -> StoreResult<()>;

    fn add_compute(&mut self, instances: &[Instance]) -> StoreResult<()>;

    fn add_network(&mut self, vpc: &Vpc) -> StoreResult<()>;

    fn add_functions(&mut self, functions: &[Function]) -> StoreResult<()>;

    fn add_relational_db(&mut self, rds: &Rds) -> StoreResult<()>;

    fn add_key_value_dbs(&mut self, tables: &[DynamoDb]) -> StoreResult<()>;

    fn add_analytical_dbs(&mut self, clusters: &[RedshiftDb]) -> StoreResult<()>;

    /// Recompute every role → resource edge from the current store contents.
    /// Must be idempotent.
    fn link_roles_to_resources(&mut self) -> StoreResult<LinkStats>;

    /// Destructively remove every node and edge
    fn clear_all(&mut self) -> StoreResult<()>;

    /// Run a read-only query with named parameters
    fn run_query(&self, query: &str, params: &QueryParams) -> StoreResult<Vec<Row>>;
}
