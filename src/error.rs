use thiserror::Error;

/// Failure of a single transform call. None of these are transient.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("empty input: at least one observation is required")]
    EmptyInput,

    #[error("degenerate covariate: all covariate values are identical")]
    DegenerateCovariate,

    #[error("alignment error: {series} series points do not fit into {index} index slots")]
    AlignmentError { series: usize, index: usize },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("non-finite value in input at position {index}")]
    NonFiniteInput { index: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("numeric overflow computing {0}")]
    NumericOverflow(&'static str),
}

pub type TransformResult<T> = Result<T, TransformError>;
