//! Command implementations for tabrecon CLI

use crate::accumulator::ReportDensity;
use crate::cell::EqualityMode;
use crate::cli::{Commands, OutputFormat};
use crate::config::ReconConfig;
use crate::csv_cursor::{CsvCursor, CsvOptions};
use crate::cursor::RowCursor;
use crate::engine::{KeyColumn, MergeJoinEngine};
use crate::error::{ReconError, Result};
use crate::observer::{DiffObserver, LogObserver};
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressObserver;
use crate::schema::SchemaComparator;
use crate::sink::CsvReportSink;
use crate::value::DataType;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Execute a command; `Ok(false)` means the data sets differ
pub fn execute_command(command: Commands, config_path: Option<&Path>) -> Result<bool> {
    match command {
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
            let mut config = load_config(config_path)?;
            apply_overrides(
                &mut config,
                &key,
                equality.as_deref(),
                density.as_deref(),
                max_changes,
                delimiter,
            )?;
            compare_command(
                &config,
                &source,
                &target,
                types,
                output.as_deref(),
                &format,
                no_progress,
            )
        }
        Commands::Schema {
            source,
            target,
            types,
        } => {
            let config = load_config(config_path)?;
            schema_command(&config, &source, &target, types)
        }
        Commands::InitConfig { path, force } => init_config_command(&path, force),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<ReconConfig> {
    match config_path {
        Some(path) => ReconConfig::load(path),
        None => Ok(ReconConfig::default()),
    }
}

/// Command line flags take precedence over the configuration file
fn apply_overrides(
    config: &mut ReconConfig,
    key: &[String],
    equality: Option<&str>,
    density: Option<&str>,
    max_changes: Option<u64>,
    delimiter: Option<char>,
) -> Result<()> {
    if !key.is_empty() {
        config.key_columns = key.iter().map(|k| KeyColumn::parse(k)).collect();
    }
    if let Some(equality) = equality {
        config.equality = EqualityMode::parse(equality).map_err(ReconError::invalid_input)?;
    }
    if let Some(density) = density {
        config.density = ReportDensity::parse(density).map_err(ReconError::invalid_input)?;
    }
    if max_changes.is_some() {
        config.max_changes = max_changes;
    }
    if let Some(delimiter) = delimiter {
        config.delimiter = delimiter;
    }
    Ok(())
}

/// Open both sides in parallel
fn open_pair(
    source: &Path,
    target: &Path,
    options: &CsvOptions,
) -> Result<(CsvCursor<File>, CsvCursor<File>)> {
    let (source, target) = rayon::join(
        || CsvCursor::open(source, options),
        || CsvCursor::open(target, options),
    );
    Ok((source?, target?))
}

/// Compare two CSV files
fn compare_command(
    config: &ReconConfig,
    source_path: &Path,
    target_path: &Path,
    types: Vec<DataType>,
    output: Option<&Path>,
    format: &str,
    no_progress: bool,
) -> Result<bool> {
    let output_format = OutputFormat::parse(format).map_err(ReconError::invalid_input)?;
    let csv_options = config.to_csv_options(types)?;
    let options = config.to_diff_options();

    let (mut source, mut target) = open_pair(source_path, target_path, &csv_options)?;

    if output_format == OutputFormat::Pretty {
        println!(
            "🔍 Comparing '{}' with '{}'...",
            source_path.display(),
            target_path.display()
        );
    }

    let mut sink = match output {
        Some(path) => Some(CsvReportSink::with_delimiter(
            BufWriter::new(File::create(path)?),
            config.format.clone(),
            csv_options.delimiter,
        )),
        None => None,
    };

    let mut observer: Box<dyn DiffObserver> = if no_progress || output_format != OutputFormat::Pretty
    {
        Box::new(LogObserver)
    } else {
        Box::new(ProgressObserver::new())
    };

    let mut engine = MergeJoinEngine::new(options).with_observer(&mut *observer);
    if let Some(sink) = sink.as_mut() {
        engine = engine.with_sink(sink);
    }
    let report = engine.run(&mut source, &mut target)?;
    drop(observer);

    if let Some(sink) = sink {
        sink.into_inner()?;
    }

    let summary = report.summary(
        &source_path.display().to_string(),
        &target_path.display().to_string(),
    );

    match output_format {
        OutputFormat::Pretty => {
            PrettyPrinter::print_report(&summary, &report, &config.format);
            if let Some(path) = output {
                println!("\n💾 Diff listing saved to: {}", path.display());
            }
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::format_report(&summary, &report)?);
        }
        OutputFormat::Csv => {
            report.write_csv(std::io::stdout().lock(), &config.format)?;
        }
    }

    Ok(report.are_equal())
}

/// Check whether two CSV files can be compared
fn schema_command(
    config: &ReconConfig,
    source_path: &Path,
    target_path: &Path,
    types: Vec<DataType>,
) -> Result<bool> {
    let csv_options = config.to_csv_options(types)?;
    let (source, target) = open_pair(source_path, target_path, &csv_options)?;

    let reason = SchemaComparator::compare(source.columns(), target.columns());
    PrettyPrinter::print_schema(source.columns(), target.columns(), &reason);

    Ok(reason.is_empty())
}

/// Write a configuration template
fn init_config_command(path: &Path, force: bool) -> Result<bool> {
    ReconConfig::write_default(path, force)?;
    println!("✅ Wrote configuration template to: {}", path.display());
    Ok(true)
}
