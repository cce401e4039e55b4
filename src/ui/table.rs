use crate::storage::{GraphStats, Row};
use serde_json::Value;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct CountRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// Node and edge counts, one row per label or edge kind
pub fn stats_table(stats: &GraphStats) -> String {
    let nodes = stats.nodes.iter().map(|(label, count)| CountRow {
        kind: "node".to_string(),
        name: label.clone(),
        count: *count,
    });
    let edges = stats.edges.iter().map(|(kind, count)| CountRow {
        kind: "edge".to_string(),
        name: kind.clone(),
        count: *count,
    });
    let rows: Vec<CountRow> = nodes.chain(edges).collect();
    if rows.is_empty() {
        return String::new();
    }

    Table::new(&rows).with(Style::rounded()).to_string()
}

/// Query results with one column per key of the first row
pub fn rows_table(rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<String> = first.keys().cloned().collect();

    let mut builder = Builder::default();
    builder.push_record(columns.clone());
    for row in rows {
        builder.push_record(columns.iter().map(|column| cell(row.get(column))));
    }

    builder.build().with(Style::rounded()).to_string()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
