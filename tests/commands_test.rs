// Copyright (c) 2025 Marc Rivero López
// Licensed under GPLv3. See LICENSE file for details.
// This test suite validates real code behavior without mocks or stubs.

//! Commands Module Integration Tests
//!
//! Drives the record commands end to end: a local TLS server stands in for
//! the tracked domain and each test gets its own SQLite file.

mod common;

use certwatch::commands::{
    AddCommand, Command, CommandContext, CommandRouter, InitConfigCommand, ListCommand,
    RefreshAllCommand, RefreshCommand, RemoveCommand,
};
use certwatch::db::{CertwatchDatabase, DatabaseConfig};
use certwatch::{AppConfig, Args, OutputFormat, TlsError};
use clap::Parser;
use common::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_path(extension: &str) -> PathBuf {
    let counter = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "certwatch-cmd-{}-{}.{}",
        std::process::id(),
        counter,
        extension
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn context_for(port: u16, db_path: PathBuf, format: OutputFormat) -> CommandContext {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::sqlite(db_path);
    config.inspector.port = port;
    config.inspector.connect_timeout_secs = 2;
    config.inspector.handshake_timeout_secs = 2;
    CommandContext::new(config, format)
}

async fn stored_records(db_path: &PathBuf) -> Vec<certwatch::db::CertificateRecord> {
    let db = CertwatchDatabase::new(&DatabaseConfig::sqlite(db_path.clone()))
        .await
        .unwrap();
    let store = db.record_store();
    let records = certwatch::db::RecordStore::select_records(&store).await.unwrap();
    db.close().await;
    records
}

#[tokio::test]
async fn test_add_list_refresh_remove() {
    let port = spawn_tls_server(example_certificate()).await;
    let db_path = unique_path("db");
    let context = context_for(port, db_path.clone(), OutputFormat::Terminal);

    AddCommand::new(context.clone(), "127.0.0.1".to_string())
        .execute()
        .await
        .unwrap();

    let records = stored_records(&db_path).await;
    assert_eq!(records.len(), 1);
    let id = records[0].id;
    assert_eq!(records[0].name, "127.0.0.1");
    assert_eq!(records[0].subject, "CN=example.com");
    assert_eq!(records[0].tls_version, "TLSv1.3");

    ListCommand::new(context.clone()).execute().await.unwrap();
    RefreshCommand::new(context.clone(), id).execute().await.unwrap();
    RefreshAllCommand::new(context.clone()).execute().await.unwrap();

    let refreshed = stored_records(&db_path).await;
    assert_eq!(refreshed, records);

    RemoveCommand::new(context.clone(), id).execute().await.unwrap();
    // Removing again reports nothing removed but still succeeds
    RemoveCommand::new(context, id).execute().await.unwrap();

    assert!(stored_records(&db_path).await.is_empty());
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_add_refuses_duplicate_name() {
    let port = spawn_tls_server(example_certificate()).await;
    let db_path = unique_path("db");
    let context = context_for(port, db_path.clone(), OutputFormat::Json);

    AddCommand::new(context.clone(), "127.0.0.1".to_string())
        .execute()
        .await
        .unwrap();
    let err = AddCommand::new(context, "127.0.0.1".to_string())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, TlsError::InvalidInput { .. }));
    assert_eq!(stored_records(&db_path).await.len(), 1);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_add_of_unreachable_domain_stores_nothing() {
    let port = closed_port().await;
    let db_path = unique_path("db");
    let context = context_for(port, db_path.clone(), OutputFormat::Terminal);

    let err = AddCommand::new(context, "127.0.0.1".to_string())
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, TlsError::Connection { .. }));
    assert!(stored_records(&db_path).await.is_empty());
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_refresh_of_unknown_id_is_invalid_input() {
    let db_path = unique_path("db");
    let context = context_for(443, db_path.clone(), OutputFormat::Terminal);

    let err = RefreshCommand::new(context, 42).execute().await.unwrap_err();

    assert!(matches!(err, TlsError::InvalidInput { .. }));
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_init_config_writes_loadable_file() {
    let path = unique_path("toml");

    InitConfigCommand::new(path.clone()).execute().await.unwrap();
    let config = AppConfig::from_file(&path).unwrap();
    assert_eq!(config.inspector.port, 443);

    // Existing files are left alone
    assert!(InitConfigCommand::new(path.clone()).execute().await.is_err());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_router_reads_database_override() {
    let db_path = unique_path("db");
    let db_arg = db_path.to_string_lossy().to_string();
    let args = Args::try_parse_from(["certwatch", "--db", db_arg.as_str(), "--json", "list"]).unwrap();

    let context = CommandContext::from_args(&args).unwrap();
    assert!(context.is_json());
    assert_eq!(context.config.database, DatabaseConfig::sqlite(db_path));

    let command = CommandRouter::route(args).unwrap();
    assert_eq!(command.name(), "ListCommand");
}
