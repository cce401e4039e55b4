//! Connector - the boundary callers drive
//!
//! Owns one graph store handle and one [`ImportRouter`] for its whole
//! lifetime. All calls are sequential through `&mut self`.

use serde_json::{Map, Value};
use crate::config::ConnectionSettings;
use crate::linker::LinkStats;
use crate::router::{BatchReport, ImportOutcome, ImportRouter};
use crate::storage::{GraphStore, QueryParams, Row, SqliteGraphStore};
use crate::{Error, Result};

pub struct Connector<S: GraphStore = SqliteGraphStore> {
    store: S,
    router: ImportRouter,
}

impl Connector<SqliteGraphStore> {
    /// Connect using `cloudgraph.toml` and the `CLOUDGRAPH_*` environment
    pub fn new() -> Result<Self> {
        let settings = ConnectionSettings::load(None)?;
        Self::connect(&settings)
    }

    /// Connect with explicit settings
    pub fn connect(settings: &ConnectionSettings) -> Result<Self> {
        let store = SqliteGraphStore::connect(&settings.url, &settings.principal, &settings.credential)
            .map_err(Error::Connection)?;
        tracing::info!("Connected to {}", settings.url);
        Ok(Self::with_store(store))
    }
}

impl<S: GraphStore> Connector<S> {
    /// Wrap an already-connected store
    pub fn with_store(store: S) -> Self {
        Self { store, router: ImportRouter::new() }
    }

    /// Destructively remove everything from the store
    pub fn flush_all(&mut self) -> Result<&mut Self> {
        self.store.clear_all().map_err(|source| Error::StoreMutation {
            operation: "clear_all",
            category: None,
            source,
        })?;
        tracing::info!("Flushed graph store");
        Ok(self)
    }

    /// Import one labeled payload; the first error is returned
    pub fn import_results(&mut self, label: &str, payload: &[u8]) -> Result<ImportOutcome> {
        self.router.import_one(&mut self.store, label, payload)
    }

    /// Import a batch keyed by label, isolating failures per entry
    pub fn import_bulk_results(&mut self, batch: &Map<String, Value>) -> BatchReport {
        let report = self.router.import_many(&mut self.store, batch);
        tracing::info!(
            "Bulk import: {} of {} entries stored, {} failed",
            report.imported(),
            report.entries.len(),
            report.failures().count()
        );
        report
    }

    /// Run the linking pass outside of a role import
    pub fn link_roles_to_resources(&mut self) -> Result<LinkStats> {
        self.store.link_roles_to_resources().map_err(|source| Error::StoreMutation {
            operation: "link_roles_to_resources",
            category: None,
            source,
        })
    }

    /// Read-only passthrough to the store
    pub fn query(&self, query: &str, params: &QueryParams) -> Result<Vec<Row>> {
        self.store.run_query(query, params).map_err(Error::Query)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
