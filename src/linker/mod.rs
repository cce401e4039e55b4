pub mod access;

pub use access::{AccessLinker, AccessPlan, LinkStats, compute_access_edges};
