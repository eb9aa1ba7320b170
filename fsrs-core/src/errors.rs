use std::fmt;
use thiserror::Error;

use crate::CardId;

/// One parameter that fell outside its allowed range.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterViolation {
    pub index: usize,
    pub value: f64,
    pub lower: f64,
    pub upper: f64,
}

impl fmt::Display for ParameterViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameters[{}] = {} is out of bounds: ({}, {})",
            self.index, self.value, self.lower, self.upper
        )
    }
}

fn list_violations(violations: &[ParameterViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum FsrsError {
    #[error("expected {expected} parameters, got {found}")]
    ParameterCount { expected: usize, found: usize },
    #[error("one or more parameters are out of bounds:\n{}", list_violations(.0))]
    ParametersOutOfBounds(Vec<ParameterViolation>),
    #[error("desired retention must be in (0, 1], got {0}")]
    InvalidRetention(f64),
    #[error("maximum interval must be at least one day")]
    InvalidMaximumInterval,
    #[error("invalid step: {0}")]
    InvalidStep(String),
    #[error("datetime must be timezone-aware and set to UTC: {0}")]
    NonUtcDatetime(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("review log card_id {found} does not match card_id {expected}")]
    CardIdMismatch { expected: CardId, found: CardId },
    #[error("unknown rating: {0}")]
    UnknownRating(i64),
    #[error("unknown state: {0}")]
    UnknownState(i64),
    #[error("invalid card: {0}")]
    InvalidCard(&'static str),
    #[error("due date out of range")]
    DueOutOfRange,
}

impl FsrsError {
    /// Indices of every out-of-bounds parameter, empty for other errors.
    pub fn violating_indices(&self) -> Vec<usize> {
        match self {
            FsrsError::ParametersOutOfBounds(v) => v.iter().map(|p| p.index).collect(),
            _ => Vec::new(),
        }
    }
}
