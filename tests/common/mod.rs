//! Common test utilities and helpers

use std::fs;
use std::path::{Path, PathBuf};
use tabrecon::Result;
use tempfile::TempDir;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a test CSV file with sample data
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = String::new();

        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test CSV file with raw string content
    pub fn create_csv_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a large keyed CSV file; every `change_every`-th row gets a different value
    pub fn create_large_csv(
        &self,
        name: &str,
        rows: usize,
        change_every: Option<usize>,
    ) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = String::from("id,name,amount\n");

        for row in 0..rows {
            let changed = change_every.map_or(false, |n| row % n == 0);
            let amount = if changed { row * 3 + 1 } else { row * 3 };
            content.push_str(&format!("{},name_{},{}\n", row, row, amount));
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn path_str(&self, name: &str) -> String {
        self.root().join(name).display().to_string()
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a tabrecon command; `Ok(false)` means the data sets differ
    pub fn run_command(&self, args: &[&str]) -> Result<bool> {
        use clap::Parser;
        use tabrecon::cli::Cli;
        use tabrecon::commands::execute_command;

        let mut cmd_args = vec!["tabrecon"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| tabrecon::ReconError::invalid_input(e.to_string()))?;

        execute_command(cli.command, cli.config.as_deref())
    }

    /// Run a command and expect the data sets to be equal
    pub fn expect_equal(&self, args: &[&str]) {
        assert!(
            self.run_command(args).expect("Command should succeed"),
            "Data sets should be equal"
        );
    }

    /// Run a command and expect the data sets to differ
    pub fn expect_different(&self, args: &[&str]) {
        assert!(
            !self.run_command(args).expect("Command should succeed"),
            "Data sets should differ"
        );
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> tabrecon::ReconError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// In-memory cursors for engine tests
pub mod cursors {
    use tabrecon::schema::columns_from;
    use tabrecon::{CellValue, DataType, MemoryCursor};

    /// Two columns: integer `id`, text `name`
    pub fn keyed(rows: &[(i64, &str)]) -> MemoryCursor {
        MemoryCursor::new(
            columns_from([("id", DataType::Integer), ("name", DataType::Text)]),
            rows.iter()
                .map(|(id, name)| vec![CellValue::Integer(*id), CellValue::text(*name)])
                .collect(),
        )
    }

    /// One text column `value`
    pub fn single(values: &[&str]) -> MemoryCursor {
        MemoryCursor::new(
            columns_from([("value", DataType::Text)]),
            values.iter().map(|v| vec![CellValue::text(*v)]).collect(),
        )
    }

    /// Two columns: integer `id`, float `amount`
    pub fn amounts(rows: &[(i64, f64)]) -> MemoryCursor {
        MemoryCursor::new(
            columns_from([("id", DataType::Integer), ("amount", DataType::Float)]),
            rows.iter()
                .map(|(id, amount)| vec![CellValue::Integer(*id), CellValue::Float(*amount)])
                .collect(),
        )
    }

    /// Three columns: text `region`, integer `id`, integer `qty`
    pub fn regional(rows: &[(&str, i64, i64)]) -> MemoryCursor {
        MemoryCursor::new(
            columns_from([
                ("region", DataType::Text),
                ("id", DataType::Integer),
                ("qty", DataType::Integer),
            ]),
            rows.iter()
                .map(|(region, id, qty)| {
                    vec![CellValue::text(*region), CellValue::Integer(*id), CellValue::Integer(*qty)]
                })
                .collect(),
        )
    }

    /// Cursor with explicit cells, for null and mixed values
    pub fn raw(rows: Vec<Vec<CellValue>>) -> MemoryCursor {
        MemoryCursor::new(
            columns_from([("id", DataType::Integer), ("name", DataType::Text)]),
            rows,
        )
    }
}

/// Sample data generators for testing
pub mod sample_data {
    pub fn simple_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.50"],
            vec!["2", "Banana", "0.75"],
            vec!["3", "Cherry", "2.00"],
        ]
    }

    pub fn updated_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price"],
            vec!["1", "Apple", "1.60"], // Price changed
            vec!["2", "Banana", "0.75"],
            vec!["4", "Date", "3.00"], // New row, Cherry removed
        ]
    }

    pub fn schema_changed_csv_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["id", "name", "price", "category"], // New column
            vec!["1", "Apple", "1.50", "Fruit"],
            vec!["2", "Banana", "0.75", "Fruit"],
            vec!["3", "Cherry", "2.00", "Fruit"],
        ]
    }
}

/// Assertion helpers for test validation
pub mod assertions {
    use std::path::Path;

    /// Assert that a file exists and is not empty
    pub fn assert_file_exists_and_not_empty(path: &Path) {
        assert!(path.exists(), "File should exist: {}", path.display());
        let metadata = std::fs::metadata(path).expect("Should be able to read file metadata");
        assert!(metadata.len() > 0, "File should not be empty: {}", path.display());
    }

    /// Assert the report listing as `(marker, key)` pairs
    pub fn assert_listing(report: &tabrecon::DiffReport, expected: &[(&str, &str)]) {
        let actual: Vec<(&str, &str)> = report
            .rows()
            .iter()
            .map(|r| (r.marker.symbol(), r.key.as_str()))
            .collect();
        assert_eq!(actual, expected, "Unexpected report listing");
    }
}
