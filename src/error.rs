use thiserror::Error;

use crate::shape::ShapeKind;
use crate::variable::Role;

/// Errors raised while configuring or evaluating a fuzzy system.
///
/// Numeric fail-safes are not errors: an unset term has membership 0.0 and
/// a centroid over an all-zero fuzzy output is 0.0.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuzzyError {
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("{kind:?} takes {expected} threshold(s), got {found}")]
    InvalidParameterCount {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },

    #[error("invalid universe of discourse: [{low}, {high}] with interval {interval}")]
    InvalidDomain { low: f64, high: f64, interval: f64 },

    #[error("variable is not part of this system")]
    UnknownVariable,

    #[error("premise names a variable that is not a declared input")]
    UndeclaredInput,

    #[error("expected an {expected:?} variable, found an {found:?} variable")]
    RoleMismatch { expected: Role, found: Role },

    #[error("expected {expected} term indices, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("rule {rule} does not target the declared output variable at slot {slot}")]
    InconsistentConsequence { rule: usize, slot: usize },
}

pub type Result<T> = std::result::Result<T, FuzzyError>;

impl FuzzyError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        FuzzyError::IndexOutOfRange { what, index, len }
    }
}
