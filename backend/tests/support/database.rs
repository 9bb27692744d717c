//! Database helpers shared by the Diesel adapter suites.
//!
//! Resetting goes through the `postgres` client so `DROP DATABASE` never runs
//! inside a Diesel transaction. Schema setup reuses the embedded migrations
//! the server applies at startup.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};

use salesdesk::outbound::persistence::run_pending_migrations;

/// Render a `postgres` error with its SQLSTATE when the server sent one.
pub fn format_postgres_error(err: &postgres::Error) -> String {
    err.as_db_error().map_or_else(
        || err.to_string(),
        |db| format!("{} ({}): {}", db.severity(), db.code().code(), db.message()),
    )
}

/// Drop and recreate `name` on the cluster.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client =
        Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!(
            "DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE); CREATE DATABASE \"{name}\";"
        ))
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the embedded migrations, seed rows included.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    run_pending_migrations(url)
        .map(|_| ())
        .map_err(|err| err.to_string())
}

/// Open a raw client for seeding rows the repositories cannot write.
pub fn raw_client(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))
}

fn skip_requested() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy; otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if skip_requested() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("embedded cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
