use thiserror::Error;

/// Contract violations surfaced to the caller at construction or call time.
/// Coordinates are never silently clamped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("mapping range inverted: start {start} > stop {stop}")]
    InvertedRange { start: u64, stop: u64 },

    #[error("operator string covers {operator_span} reference bases but mapping spans {mapping_span}")]
    OperatorSpanMismatch {
        operator_span: u64,
        mapping_span: u64,
    },

    #[error("allowed deviation must be a percentage in 0..=100, got {0}")]
    DeviationOutOfRange(u8),

    #[error("unrecognized alignment operator '{0}'")]
    UnknownOperator(char),

    #[error("alignment operator '{0}' has no length")]
    MissingOperatorLength(char),

    #[error("alignment operator '{0}' has zero length")]
    ZeroLengthOperator(char),

    #[error("operator string ends with dangling length '{0}'")]
    DanglingLength(String),

    #[error("unrecognized strand symbol '{0}'")]
    UnknownStrand(char),
}
