//! Import Router - decode labeled payloads and dispatch them to the store
//!
//! Each data-bearing [`Category`] has one registered handler that decodes the
//! payload into the category's record shape and calls the matching
//! [`GraphStore`] mutation. Role imports are followed by the linking pass.

use std::collections::HashMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use crate::category::Category;
use crate::linker::LinkStats;
use crate::resource::{Bucket, DynamoDb, Function, Group, Instance, Rds, RedshiftDb, Role, User, Vpc};
use crate::storage::{GraphStore, StoreError};
use crate::{Error, Result};

/// Decodes a payload and applies it to the store, returning the record count
pub type ImportHandler = fn(&mut dyn GraphStore, &[u8]) -> Result<usize>;

/// What a successful import did
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum ImportOutcome {
    /// Records were decoded and stored
    Imported {
        category: Category,
        records: usize,
        /// Result of the linking pass run right after the import, if any
        link: Option<LinkStats>,
    },
    /// Informational payload, accepted without touching the store
    Ignored { category: Category },
}

impl ImportOutcome {
    pub fn category(&self) -> Category {
        match self {
            ImportOutcome::Imported { category, .. } | ImportOutcome::Ignored { category } => *category,
        }
    }

    pub fn records(&self) -> usize {
        match self {
            ImportOutcome::Imported { records, .. } => *records,
            ImportOutcome::Ignored { .. } => 0,
        }
    }
}

/// Outcome of one batch entry
#[derive(Debug)]
pub struct EntryOutcome {
    pub label: String,
    pub result: Result<ImportOutcome>,
}

/// Per-entry results of a batch import
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Entries in the order they were imported
    pub entries: Vec<EntryOutcome>,
    /// End-of-batch linking pass, run when at least one role entry was stored
    pub linking: Option<Result<LinkStats>>,
}

impl BatchReport {
    /// Failed entries with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().err().map(|e| (entry.label.as_str(), e)))
    }

    /// Number of entries that reached the store
    pub fn imported(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.result, Ok(ImportOutcome::Imported { .. })))
            .count()
    }

    /// Error of the end-of-batch linking pass, if it failed
    pub fn link_error(&self) -> Option<&Error> {
        self.linking.as_ref().and_then(|linking| linking.as_ref().err())
    }

    /// True when every entry and the linking pass succeeded
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none() && self.link_error().is_none()
    }

    /// One-line description of what went wrong, `None` on success
    pub fn failure_summary(&self) -> Option<String> {
        let failed = self.failures().count();
        let entries = (failed > 0).then(|| format!("{} of {} entries failed", failed, self.entries.len()));
        let linking = self.link_error().map(|e| format!("linking pass failed: {}", e));

        match (entries, linking) {
            (None, None) => None,
            (Some(entries), None) => Some(entries),
            (None, Some(linking)) => Some(linking),
            (Some(entries), Some(linking)) => Some(format!("{}; {}", entries, linking)),
        }
    }
}

/// Registry of category handlers
pub struct ImportRouter {
    handlers: HashMap<Category, ImportHandler>,
}

impl Default for ImportRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportRouter {
    /// Create a router with every built-in category handler
    pub fn new() -> Self {
        let mut router = Self { handlers: HashMap::new() };
        router.register(Category::Users, import_users);
        router.register(Category::Groups, import_groups);
        router.register(Category::Roles, import_roles);
        router.register(Category::Buckets, import_buckets);
        router.register(Category::EC2s, import_compute);
        router.register(Category::VPCs, import_network);
        router.register(Category::Lambdas, import_functions);
        router.register(Category::RDS, import_relational_db);
        router.register(Category::DynamoDBs, import_key_value_dbs);
        router.register(Category::RedshiftDBs, import_analytical_dbs);
        router
    }

    /// Register (or replace) the handler of a category
    pub fn register(&mut self, category: Category, handler: ImportHandler) {
        self.handlers.insert(category, handler);
    }

    /// Whether a handler is registered for a category
    pub fn handles(&self, category: Category) -> bool {
        self.handlers.contains_key(&category)
    }

    /// Import one labeled payload.
    ///
    /// Role imports run the linking pass exactly once after the roles are stored.
    pub fn import_one(&self, store: &mut dyn GraphStore, label: &str, payload: &[u8]) -> Result<ImportOutcome> {
        let category = Category::classify(label)?;
        tracing::info!("Importing: {}", label);

        let outcome = self.dispatch(store, category, payload)?;
        if category.triggers_linking() {
            let stats = link(store, category)?;
            return Ok(ImportOutcome::Imported {
                category,
                records: outcome.records(),
                link: Some(stats),
            });
        }
        Ok(outcome)
    }

    /// Import a batch of labeled values with per-entry failure isolation.
    ///
    /// Entries are imported by category priority (resources before
    /// identities, roles last), then by label. Role entries do not link
    /// individually: one linking pass runs after the last entry if any role
    /// entry was stored.
    pub fn import_many(&self, store: &mut dyn GraphStore, batch: &Map<String, Value>) -> BatchReport {
        let mut ordered: Vec<(&String, &Value)> = batch.iter().collect();
        ordered.sort_by(|(a, _), (b, _)| {
            let priority = |label: &str| Category::classify(label).ok().map(|c| c.import_priority());
            priority(a.as_str())
                .cmp(&priority(b.as_str()))
                .then_with(|| a.cmp(b))
        });

        let mut report = BatchReport::default();
        let mut roles_stored = false;

        for (label, value) in ordered {
            let result = serde_json::to_vec(value)
                .map_err(|source| Error::Encode { label: label.clone(), source })
                .and_then(|payload| {
                    let category = Category::classify(label)?;
                    tracing::info!("Importing: {}", label);
                    self.dispatch(store, category, &payload)
                });

            match &result {
                Ok(outcome) => {
                    roles_stored |= outcome.category().triggers_linking()
                        && matches!(outcome, ImportOutcome::Imported { .. });
                }
                Err(e) => tracing::warn!("Failed to import {}: {}", label, e),
            }
            report.entries.push(EntryOutcome { label: label.clone(), result });
        }

        if roles_stored {
            let linking = link(store, Category::Roles);
            if let Err(e) = &linking {
                tracing::warn!("Linking pass failed: {}", e);
            }
            report.linking = Some(linking);
        }

        report
    }

    /// Decode and store one payload of a known category, without linking
    fn dispatch(&self, store: &mut dyn GraphStore, category: Category, payload: &[u8]) -> Result<ImportOutcome> {
        if category.is_informational() {
            tracing::debug!("Ignoring informational payload {}", category);
            return Ok(ImportOutcome::Ignored { category });
        }

        let handler = self
            .handlers
            .get(&category)
            .ok_or(Error::Unhandled { category })?;
        tracing::debug!(
            "Decoding {} payload as a {}",
            category,
            if category.is_singleton() { "single document" } else { "record sequence" }
        );
        let records = handler(store, payload)?;
        tracing::debug!("Imported {} {} records", records, category);

        Ok(ImportOutcome::Imported { category, records, link: None })
    }
}

/// Run the linking pass on behalf of `category`
fn link(store: &mut dyn GraphStore, category: Category) -> Result<LinkStats> {
    store
        .link_roles_to_resources()
        .map_err(mutation(category, "link_roles_to_resources"))
}

fn decode<T: DeserializeOwned>(category: Category, payload: &[u8]) -> Result<T> {
    serde_json::from_slice(payload).map_err(|source| Error::Decode { category, source })
}

fn mutation(category: Category, operation: &'static str) -> impl FnOnce(StoreError) -> Error {
    move |source| Error::StoreMutation { operation, category: Some(category), source }
}

fn import_users(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let users: Vec<User> = decode(Category::Users, payload)?;
    store.add_users(&users).map_err(mutation(Category::Users, "add_users"))?;
    Ok(users.len())
}

fn import_groups(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let groups: Vec<Group> = decode(Category::Groups, payload)?;
    store.add_groups(&groups).map_err(mutation(Category::Groups, "add_groups"))?;
    Ok(groups.len())
}

fn import_roles(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let roles: Vec<Role> = decode(Category::Roles, payload)?;
    store.add_roles(&roles).map_err(mutation(Category::Roles, "add_roles"))?;
    Ok(roles.len())
}

fn import_buckets(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let buckets: Vec<Bucket> = decode(Category::Buckets, payload)?;
    store.add_buckets(&buckets).map_err(mutation(Category::Buckets, "add_buckets"))?;
    Ok(buckets.len())
}

fn import_compute(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let instances: Vec<Instance> = decode(Category::EC2s, payload)?;
    store.add_compute(&instances).map_err(mutation(Category::EC2s, "add_compute"))?;
    Ok(instances.len())
}

fn import_network(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let vpc: Vpc = decode(Category::VPCs, payload)?;
    store.add_network(&vpc).map_err(mutation(Category::VPCs, "add_network"))?;
    Ok(1)
}

fn import_functions(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let functions: Vec<Function> = decode(Category::Lambdas, payload)?;
    store.add_functions(&functions).map_err(mutation(Category::Lambdas, "add_functions"))?;
    Ok(functions.len())
}

fn import_relational_db(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let rds: Rds = decode(Category::RDS, payload)?;
    store.add_relational_db(&rds).map_err(mutation(Category::RDS, "add_relational_db"))?;
    Ok(rds.instances.len() + rds.clusters.len())
}

fn import_key_value_dbs(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let tables: Vec<DynamoDb> = decode(Category::DynamoDBs, payload)?;
    store.add_key_value_dbs(&tables).map_err(mutation(Category::DynamoDBs, "add_key_value_dbs"))?;
    Ok(tables.len())
}

fn import_analytical_dbs(store: &mut dyn GraphStore, payload: &[u8]) -> Result<usize> {
    let clusters: Vec<RedshiftDb> = decode(Category::RedshiftDBs, payload)?;
    store
        .add_analytical_dbs(&clusters)
        .map_err(mutation(Category::RedshiftDBs, "add_analytical_dbs"))?;
    Ok(clusters.len())
}
