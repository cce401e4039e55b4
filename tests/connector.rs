mod common;

use cloudgraph::config::ConnectionSettings;
use cloudgraph::storage::QueryParams;
use cloudgraph::{Connector, Error};
use common::{reader_role, users};
use serde_json::{Value, json};

fn in_memory() -> Connector {
    Connector::connect(&ConnectionSettings::in_memory()).unwrap()
}

fn params(value: Value) -> QueryParams {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn flush_then_query_is_empty() {
    let mut conn = in_memory();
    conn.import_results("Users", users(2).to_string().as_bytes()).unwrap();
    conn.import_results("Buckets", br#"[{"Name": "logs"}]"#).unwrap();

    let nodes = conn.flush_all().unwrap().query("SELECT * FROM nodes", &QueryParams::new()).unwrap();
    let edges = conn.query("SELECT * FROM edges", &QueryParams::new()).unwrap();

    assert!(nodes.is_empty());
    assert!(edges.is_empty());
}

#[test]
fn users_round_trip_through_query() {
    let mut conn = in_memory();
    let input = users(5);
    conn.import_results("Users", input.to_string().as_bytes()).unwrap();
    // Upsert: a second import of the same users must not duplicate them
    conn.import_results("Users-again", input.to_string().as_bytes()).unwrap();

    let rows = conn
        .query(
            "SELECT id, name, properties FROM nodes WHERE label = :label ORDER BY name",
            &params(json!({"label": "User"})),
        )
        .unwrap();

    assert_eq!(rows.len(), 5);
    for (row, user) in rows.iter().zip(input.as_array().unwrap()) {
        assert_eq!(row["id"], user["Arn"]);
        assert_eq!(row["name"], user["UserName"]);
        assert_eq!(row["properties"]["UserId"], user["UserId"]);
        assert_eq!(row["properties"]["Groups"], user["Groups"]);
    }
}

#[test]
fn memberships_link_regardless_of_import_order() {
    let mut conn = in_memory();
    conn.import_results("Users", users(2).to_string().as_bytes()).unwrap();
    conn.import_results(
        "Groups",
        br#"[{"GroupName": "engineering", "GroupId": "AGPA1", "Arn": "arn:aws:iam::123456789012:group/engineering"}]"#,
    )
    .unwrap();

    let rows = conn
        .query(
            "SELECT from_id FROM edges WHERE kind = 'member_of' AND to_id = :group",
            &params(json!({"group": "arn:aws:iam::123456789012:group/engineering"})),
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn role_import_links_matching_resources() {
    let mut conn = in_memory();
    conn.import_results(
        "Buckets",
        br#"[{"Name": "logs"}, {"Name": "logs-archive"}, {"Name": "payroll"}]"#,
    )
    .unwrap();
    conn.import_results(
        "DynamoDBs",
        br#"[{"TableName": "logs", "TableArn": "arn:aws:dynamodb:us-east-1:123456789012:table/logs"}]"#,
    )
    .unwrap();
    conn.import_results("Roles", reader_role().to_string().as_bytes()).unwrap();

    let rows = conn
        .query(
            "SELECT to_id, actions FROM edges WHERE kind = 'can_access' ORDER BY to_id",
            &QueryParams::new(),
        )
        .unwrap();

    let targets: Vec<&str> = rows.iter().filter_map(|r| r["to_id"].as_str()).collect();
    assert_eq!(targets, vec!["arn:aws:s3:::logs", "arn:aws:s3:::logs-archive"]);
    assert_eq!(rows[0]["actions"], json!(["s3:GetObject", "s3:ListBucket"]));

    // Re-linking yields the same edge set
    let stats = conn.link_roles_to_resources().unwrap();
    assert_eq!(stats.edges, 2);
    let count = conn
        .query("SELECT COUNT(*) AS n FROM edges WHERE kind = 'can_access'", &QueryParams::new())
        .unwrap();
    assert_eq!(count[0]["n"], json!(2));
}

#[test]
fn bulk_import_reports_each_entry() {
    let mut conn = in_memory();
    let batch = json!({
        "Users": users(2),
        "BadLabel": [],
        "Buckets-us-east-1": 42,
        "Whoami": {"Account": "123456789012"}
    });

    let report = conn.import_bulk_results(batch.as_object().unwrap());

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.imported(), 1);
    let mut failed: Vec<&str> = report.failures().map(|(label, _)| label).collect();
    failed.sort();
    assert_eq!(failed, vec!["BadLabel", "Buckets-us-east-1"]);

    let nodes = conn.query("SELECT id FROM nodes", &QueryParams::new()).unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn query_rejects_writes() {
    let conn = in_memory();
    let err = conn.query("DROP TABLE nodes", &QueryParams::new()).unwrap_err();
    assert!(matches!(err, Error::Query(_)));
}

#[test]
fn wrong_credential_fails_to_connect() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("graph.db").display());
    let settings = ConnectionSettings {
        url: url.clone(),
        principal: "ops".into(),
        credential: "s3cret".into(),
    };

    {
        let mut conn = Connector::connect(&settings).unwrap();
        conn.import_results("Buckets", br#"[{"Name": "logs"}]"#).unwrap();
    }

    let wrong = ConnectionSettings { credential: "guess".into(), ..settings.clone() };
    assert!(matches!(Connector::connect(&wrong), Err(Error::Connection(_))));

    let conn = Connector::connect(&settings).unwrap();
    let rows = conn.query("SELECT id FROM nodes", &QueryParams::new()).unwrap();
    assert_eq!(rows.len(), 1);
}
