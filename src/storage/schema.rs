//! Database schema definitions

/// SQL to create the nodes table
pub const CREATE_NODES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    id TEXT PRIMARY KEY,
    label TEXT NOT NULL,
    name TEXT NOT NULL,
    properties TEXT NOT NULL DEFAULT '{}'
)
"#;

/// SQL to create the edges table
pub const CREATE_EDGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS edges (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_id TEXT NOT NULL,
    to_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    actions TEXT NOT NULL DEFAULT '[]',
    UNIQUE(from_id, to_id, kind)
)
"#;

/// SQL to create the meta table
/// Holds the principal and credential digest recorded at first open
pub const CREATE_META_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_nodes_label ON nodes(label)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_name ON nodes(name)",
    "CREATE INDEX IF NOT EXISTS idx_edges_from ON edges(from_id)",
    "CREATE INDEX IF NOT EXISTS idx_edges_to ON edges(to_id)",
    "CREATE INDEX IF NOT EXISTS idx_edges_kind ON edges(kind)",
];

/// Upsert a node, replacing label, name and properties of an existing id
pub const UPSERT_NODE: &str = r#"
INSERT INTO nodes (id, label, name, properties)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(id) DO UPDATE SET
    label = excluded.label,
    name = excluded.name,
    properties = excluded.properties
"#;

/// Upsert an edge; a repeated (from, to, kind) only refreshes its actions
pub const UPSERT_EDGE: &str = r#"
INSERT INTO edges (from_id, to_id, kind, actions)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(from_id, to_id, kind) DO UPDATE SET
    actions = excluded.actions
"#;

/// Rebuild user → group edges from the `Groups` list stored on each user.
/// Group names are only unique per account: the ARN prefix up to the
/// resource type (`arn:aws:iam::111:`) must match as well.
pub const RELINK_MEMBERSHIPS: &str = r#"
DELETE FROM edges WHERE kind = 'member_of';
INSERT OR IGNORE INTO edges (from_id, to_id, kind, actions)
SELECT u.id, g.id, 'member_of', '[]'
FROM nodes u
JOIN json_each(u.properties, '$.Groups') AS j
JOIN nodes g ON g.label = 'Group' AND g.name = j.value
    AND substr(g.id, 1, instr(g.id, ':group/')) = substr(u.id, 1, instr(u.id, ':user/'))
WHERE u.label = 'User';
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_NODES_TABLE, CREATE_EDGES_TABLE, CREATE_META_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
