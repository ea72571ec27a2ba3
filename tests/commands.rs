//! Command-level behavior: table inspection, stage classification and exit codes.

use std::path::PathBuf;

use clap::Parser;
use product_export::error_handling::SourceError;
use product_export::{analyze_with, run_command, run_tables, Cli, CommandOutcome, DbSettings, Stage};

#[path = "helpers.rs"]
mod helpers;

use helpers::{create_catalogue, open_catalogue};

fn command(args: &[&str]) -> product_export::Command {
    Cli::try_parse_from(args.iter().copied())
        .expect("arguments should parse")
        .command
}

#[tokio::test]
async fn test_tables_are_listed_sorted() {
    let (_dir, db) = create_catalogue().await;
    let tables = run_tables(&DbSettings::Sqlite { path: db }).await.unwrap();
    assert_eq!(
        tables,
        vec![
            "caracteristiques",
            "dictionnaires_langues",
            "produits",
            "produits_gallery",
            "produits_group",
            "produits_group_caracteristiques",
            "produits_marque",
        ]
    );
}

#[tokio::test]
async fn test_analyze_products_table() {
    let (_dir, db) = create_catalogue().await;
    let mut executor = open_catalogue(&db).await;

    let analysis = analyze_with(&mut executor, "produits").await.unwrap();

    assert_eq!(analysis.columns.len(), 26);
    assert_eq!(analysis.columns[0].name, "idproduit");
    assert_eq!(analysis.columns[0].key, "PRI");
    // Counts cover every row, active or not
    assert_eq!(analysis.total, 5);
    assert_eq!(analysis.with_ean, Some(3));
    assert_eq!(analysis.samples.len(), 3);
    assert!(analysis.to_string().contains("Rows with EAN: 3 (60.0%)"));
}

#[tokio::test]
async fn test_analyze_table_without_ean_column() {
    let (_dir, db) = create_catalogue().await;
    let mut executor = open_catalogue(&db).await;

    let analysis = analyze_with(&mut executor, "produits_marque").await.unwrap();
    assert_eq!(analysis.total, 2);
    assert_eq!(analysis.with_ean, None);
}

#[tokio::test]
async fn test_analyze_unknown_or_hostile_table() {
    let (_dir, db) = create_catalogue().await;
    let mut executor = open_catalogue(&db).await;

    assert!(matches!(
        analyze_with(&mut executor, "nope").await,
        Err(SourceError::UnknownTable(_))
    ));
    assert!(analyze_with(&mut executor, "produits; DROP TABLE produits")
        .await
        .is_err());
}

#[tokio::test]
async fn test_run_command_exports_through_settings() {
    let (dir, db) = create_catalogue().await;
    let output = dir.path().join("sample.csv");
    let output_arg = output.to_string_lossy().to_string();
    let cmd = command(&[
        "product_export",
        "sample",
        "--limit",
        "2",
        "--output",
        output_arg.as_str(),
    ]);

    let outcome = run_command(&DbSettings::Sqlite { path: db }, &cmd)
        .await
        .unwrap();

    match outcome {
        CommandOutcome::Export(summary) => {
            assert_eq!(summary.rows_written, 2);
            assert_eq!(summary.output_path, output);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn test_configuration_errors_come_before_connecting() {
    // The database does not exist: reaching the connect stage would fail differently
    let settings = DbSettings::Sqlite {
        path: PathBuf::from("/nonexistent/catalogue.db"),
    };

    let err = run_command(&settings, &command(&["product_export", "search", "--ean", " , "]))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Config);
    assert_eq!(err.exit_code(), 2);

    let err = run_command(&settings, &command(&["product_export", "export", "--page-size", "0"]))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Config);
}

#[tokio::test]
async fn test_unreachable_database_is_a_connect_error() {
    let settings = DbSettings::Sqlite {
        path: PathBuf::from("/nonexistent/catalogue.db"),
    };
    let err = run_command(&settings, &command(&["product_export", "tables"]))
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Stage::Connect);
    assert_eq!(err.exit_code(), 3);
    assert_eq!(err.rows_written(), 0);
}
