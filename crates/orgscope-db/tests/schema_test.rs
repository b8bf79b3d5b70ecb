//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    orgscope_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    for table in [
        "organization",
        "role_assignment",
        "branding",
        "feature_flag",
        "_migration",
    ] {
        assert!(info_str.contains(table), "missing {table} table");
    }
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    orgscope_db::run_migrations(&db).await.unwrap();
    orgscope_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn organization_status_is_constrained() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    orgscope_db::run_migrations(&db).await.unwrap();

    db.query("CREATE organization SET name = 'ACME Corp', status = 'active'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE organization SET name = 'Bad Corp', status = 'archived'")
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown status should be rejected");
}

#[tokio::test]
async fn duplicate_feature_flags_are_rejected() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    orgscope_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE feature_flag SET organization_id = 'org-1', \
         feature_name = 'chatbots', is_enabled = true",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let result = db
        .query(
            "CREATE feature_flag SET organization_id = 'org-1', \
             feature_name = 'chatbots', is_enabled = false",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate flag should be rejected");
}
