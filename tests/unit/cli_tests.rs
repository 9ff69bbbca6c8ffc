//! Unit tests for CLI argument parsing and validation

use clap::Parser;
use std::path::PathBuf;
use tabrecon::cli::{Cli, Commands, OutputFormat};
use tabrecon::DataType;

#[test]
fn test_cli_compare_command_defaults() {
    let cli = Cli::try_parse_from(["tabrecon", "compare", "a.csv", "b.csv"]).unwrap();
    assert!(!cli.verbose);
    assert!(cli.config.is_none());
    match cli.command {
        Commands::Compare {
            source,
            target,
            key,
            equality,
            density,
            max_changes,
            types,
            delimiter,
            output,
            format,
            no_progress,
        } => {
            assert_eq!(source, PathBuf::from("a.csv"));
            assert_eq!(target, PathBuf::from("b.csv"));
            assert!(key.is_none());
            assert!(equality.is_none());
            assert!(density.is_none());
            assert!(max_changes.is_none());
            assert!(types.is_empty());
            assert!(delimiter.is_none());
            assert!(output.is_none());
            assert_eq!(format, "pretty");
            assert!(!no_progress);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_compare_command_with_options() {
    let cli = Cli::try_parse_from([
        "tabrecon",
        "compare",
        "a.csv",
        "b.csv",
        "--key",
        "id",
        "--equality",
        "loss-tolerant",
        "--density",
        "sparse",
        "--max-changes",
        "25",
        "--types",
        "integer,text",
        "--delimiter",
        ";",
        "--output",
        "diff.csv",
        "--format",
        "json",
        "--no-progress",
    ])
    .unwrap();

    match cli.command {
        Commands::Compare {
            key,
            equality,
            density,
            max_changes,
            types,
            delimiter,
            output,
            format,
            no_progress,
            ..
        } => {
            assert_eq!(key.as_deref(), Some("id"));
            assert_eq!(equality.as_deref(), Some("loss-tolerant"));
            assert_eq!(density.as_deref(), Some("sparse"));
            assert_eq!(max_changes, Some(25));
            assert_eq!(types, vec![DataType::Integer, DataType::Text]);
            assert_eq!(delimiter, Some(';'));
            assert_eq!(output, Some(PathBuf::from("diff.csv")));
            assert_eq!(format, "json");
            assert!(no_progress);
        }
        _ => panic!("Expected Compare command"),
    }
}

#[test]
fn test_cli_global_flags() {
    let cli = Cli::try_parse_from([
        "tabrecon", "schema", "a.csv", "b.csv", "--config", "conf.json", "-v",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("conf.json")));
    assert!(matches!(cli.command, Commands::Schema { .. }));
}

#[test]
fn test_cli_init_config_command() {
    let cli = Cli::try_parse_from(["tabrecon", "init-config", "conf.json", "--force"]).unwrap();
    match cli.command {
        Commands::InitConfig { path, force } => {
            assert_eq!(path, PathBuf::from("conf.json"));
            assert!(force);
        }
        _ => panic!("Expected InitConfig command"),
    }
}

#[test]
fn test_cli_rejects_invalid_arguments() {
    assert!(Cli::try_parse_from(["tabrecon", "compare", "a.csv"]).is_err());
    assert!(Cli::try_parse_from(["tabrecon", "compare", "a.csv", "b.csv", "--types", "blob"]).is_err());
    assert!(Cli::try_parse_from([
        "tabrecon", "compare", "a.csv", "b.csv", "--max-changes", "-1"
    ])
    .is_err());
    assert!(Cli::try_parse_from(["tabrecon", "unknown"]).is_err());
}

#[test]
fn test_output_format_parse() {
    assert!(matches!(OutputFormat::parse("pretty"), Ok(OutputFormat::Pretty)));
    assert!(matches!(OutputFormat::parse("Json"), Ok(OutputFormat::Json)));
    assert!(matches!(OutputFormat::parse("csv"), Ok(OutputFormat::Csv)));
    assert!(OutputFormat::parse("yaml").is_err());
}
