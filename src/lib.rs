//! # Cloudgraph - Cloud inventory graph ingestion
//!
//! Routes labeled blocks of cloud-inventory JSON into a graph store.
//!
//! Cloudgraph provides:
//! - A closed taxonomy of resource categories, classified by label prefix
//! - Provider-shaped record types for every category
//! - An import router that decodes each block and calls the matching store mutation
//! - A role → resource linking pass recomputed after role imports
//! - SQLite-backed graph storage with read-only query passthrough

pub mod category;
pub mod resource;
pub mod node;
pub mod edge;
pub mod storage;
pub mod linker;
pub mod router;
pub mod connector;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use category::Category;
pub use connector::Connector;
pub use router::{BatchReport, ImportOutcome, ImportRouter};
pub use storage::{GraphStore, SqliteGraphStore, StoreError};

/// Result type alias for Cloudgraph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Cloudgraph operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Connection error: {0}")]
    Connection(#[source] StoreError),

    #[error("No category matches label: {label}")]
    Classification { label: String },

    #[error("No import handler registered for {category}")]
    Unhandled { category: Category },

    #[error("Failed to decode {category} payload: {source}")]
    Decode {
        category: Category,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode batch entry {label}: {source}")]
    Encode {
        label: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store rejected {operation}: {source}")]
    StoreMutation {
        operation: &'static str,
        /// Category being imported, `None` for flushes and on-demand linking
        category: Option<Category>,
        #[source]
        source: StoreError,
    },

    #[error("Query error: {0}")]
    Query(#[source] StoreError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category the failing input was attributed to, if classification got that far
    pub fn category(&self) -> Option<Category> {
        match self {
            Error::Decode { category, .. } | Error::Unhandled { category } => Some(*category),
            Error::StoreMutation { category, .. } => *category,
            _ => None,
        }
    }
}
