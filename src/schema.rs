//! Column metadata and the structural gate run before any row is read

use crate::value::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column descriptor exposed by a row cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// 1-based position in the row
    pub position: usize,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, position: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            position,
            data_type,
        }
    }
}

/// Build column descriptors from `(name, type)` pairs, numbering from 1
pub fn columns_from<I, S>(defs: I) -> Vec<ColumnDef>
where
    I: IntoIterator<Item = (S, DataType)>,
    S: Into<String>,
{
    defs.into_iter()
        .enumerate()
        .map(|(i, (name, data_type))| ColumnDef::new(name, i + 1, data_type))
        .collect()
}

/// Name lookup over a column list, keeping declaration order.
///
/// A repeated name resolves to its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    by_name: IndexMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(columns: &[ColumnDef]) -> Self {
        let mut by_name = IndexMap::with_capacity(columns.len());
        for col in columns {
            by_name.entry(col.name.clone()).or_insert(col.position);
        }
        Self { by_name }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Comma separated list of the known column names
    pub fn known_columns(&self) -> String {
        self.by_name.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Structural comparison of two column lists
pub struct SchemaComparator;

impl SchemaComparator {
    /// Return every incompatibility found, one per line, or an empty string
    /// when the two sides can be compared row by row.
    pub fn compare(source: &[ColumnDef], target: &[ColumnDef]) -> String {
        let mut reasons = Vec::new();

        if source.is_empty() {
            reasons.push("The source has no columns".to_string());
        }

        if source.len() != target.len() {
            reasons.push(format!(
                "The source has ({}) columns while the target has ({}) columns",
                source.len(),
                target.len()
            ));
        }

        // Position by position over the common prefix
        for (source_col, target_col) in source.iter().zip(target.iter()) {
            if source_col.data_type != target_col.data_type {
                reasons.push(format!(
                    "The column at position ({}) has the type ({}) in the source ({}) but ({}) in the target ({})",
                    source_col.position,
                    source_col.data_type,
                    source_col.name,
                    target_col.data_type,
                    target_col.name
                ));
            }
        }

        reasons.join("\n")
    }

    pub fn is_compatible(source: &[ColumnDef], target: &[ColumnDef]) -> bool {
        Self::compare(source, target).is_empty()
    }
}
