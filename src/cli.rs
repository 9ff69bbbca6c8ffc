//! Command-line interface for tabrecon

use crate::value::DataType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tabrecon")]
#[command(about = "Row-by-row reconciliation of two tabular data sets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (JSON); flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare a source data set with a target data set
    Compare {
        /// Source CSV file
        source: PathBuf,

        /// Target CSV file
        target: PathBuf,

        /// Key columns, by name or 1-based position, e.g. "region,id";
        /// rows are compared by position without them
        #[arg(long, value_delimiter = ',')]
        key: Vec<String>,

        /// Cell equality: "strict" or "loss-tolerant"
        #[arg(long)]
        equality: Option<String>,

        /// Report density: "dense" or "sparse"
        #[arg(long)]
        density: Option<String>,

        /// Abort once more changes than this were found
        #[arg(long)]
        max_changes: Option<u64>,

        /// Column types by position, e.g. "integer,text,float"
        #[arg(long, value_delimiter = ',', value_parser = parse_type)]
        types: Vec<DataType>,

        /// Field delimiter
        #[arg(long)]
        delimiter: Option<char>,

        /// Write the diff listing to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: "pretty", "json" or "csv"
        #[arg(long, default_value = "pretty")]
        format: String,

        /// Disable progress spinners
        #[arg(long)]
        no_progress: bool,
    },

    /// Check whether two data sets have compatible schemas
    Schema {
        /// Source CSV file
        source: PathBuf,

        /// Target CSV file
        target: PathBuf,

        /// Column types by position, e.g. "integer,text,float"
        #[arg(long, value_delimiter = ',', value_parser = parse_type)]
        types: Vec<DataType>,
    },

    /// Write a configuration file template
    InitConfig {
        /// Path of the configuration file
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse output format string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!(
                "Invalid output format: {}. Use 'pretty', 'json' or 'csv'",
                s
            )),
        }
    }
}

/// Parse one entry of a comma separated list of column types
fn parse_type(s: &str) -> Result<DataType, String> {
    DataType::parse(s.trim())
}
