//! Cell equality with an optional floating-point loss tolerance

use crate::value::CellValue;
use serde::{Deserialize, Serialize};

/// How two cells are judged equal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EqualityMode {
    /// Natural equality of the value kind
    #[default]
    Strict,
    /// Strict, or floats that agree once narrowed to single precision
    LossTolerant,
}

impl EqualityMode {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "loss-tolerant" | "loss" => Ok(Self::LossTolerant),
            _ => Err(format!(
                "Invalid equality mode: {}. Use 'strict' or 'loss-tolerant'",
                s
            )),
        }
    }
}

/// Result of comparing one pair of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    Equal,
    /// Different strictly but equal once narrowed to single precision
    LossEqual,
    Different,
}

/// A cell of a modified row whose values are not strictly equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellDiff {
    /// 1-based column position
    pub position: usize,
    /// Equality mode that decided the outcome of this cell
    pub mode: EqualityMode,
}

impl CellDiff {
    pub fn strict(position: usize) -> Self {
        Self {
            position,
            mode: EqualityMode::Strict,
        }
    }

    pub fn loss_tolerant(position: usize) -> Self {
        Self {
            position,
            mode: EqualityMode::LossTolerant,
        }
    }

    /// Whether this cell is a real difference
    pub fn is_strict(&self) -> bool {
        self.mode == EqualityMode::Strict
    }
}

pub struct CellComparator;

impl CellComparator {
    pub fn equal(source: &CellValue, target: &CellValue, mode: EqualityMode) -> bool {
        Self::compare(source, target, mode) != CellOutcome::Different
    }

    pub fn compare(source: &CellValue, target: &CellValue, mode: EqualityMode) -> CellOutcome {
        if Self::strict_equal(source, target) {
            return CellOutcome::Equal;
        }
        match (mode, source, target) {
            (EqualityMode::LossTolerant, CellValue::Float(a), CellValue::Float(b))
                if same_single_precision(*a, *b) =>
            {
                CellOutcome::LossEqual
            }
            _ => CellOutcome::Different,
        }
    }

    fn strict_equal(source: &CellValue, target: &CellValue) -> bool {
        match (source, target) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Integer(a), CellValue::Integer(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            (CellValue::Timestamp(a), CellValue::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

/// Whether two doubles agree once narrowed to single precision.
///
/// A single precision system may have produced its value by truncating or by
/// rounding, so agreement under either narrowing counts.
fn same_single_precision(a: f64, b: f64) -> bool {
    truncate_to_single(a) == truncate_to_single(b) || (a as f32) == (b as f32)
}

/// Narrow a double to single precision, rounding toward zero.
fn truncate_to_single(value: f64) -> f32 {
    let narrowed = value as f32;
    if narrowed.is_nan() || !value.is_finite() {
        return narrowed;
    }
    // `as` rounds to nearest; step one ulp back toward zero when it overshot
    if (narrowed as f64).abs() > value.abs() {
        f32::from_bits(narrowed.to_bits() - 1)
    } else {
        narrowed
    }
}
