use crate::dtype::DType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeErrorKind {
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },
    #[error("shapes {lhs:?} and {rhs:?} do not match")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },
    #[error("axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },
    #[error("index {index} out of range for extent {extent}")]
    IndexOutOfRange { index: usize, extent: usize },
    #[error("invalid slice: {0}")]
    InvalidSlice(String),
    #[error("{0:?} is not a permutation")]
    InvalidPermutation(Vec<usize>),
    #[error("layout size overflows isize")]
    Overflow,
}

pub type NdResult<T> = Result<T, NdError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NdError {
    #[error("out of memory allocating {nbytes} bytes (align {align})")]
    OutOfMemory { nbytes: usize, align: usize },
    #[error("noncontiguous: {0}")]
    Noncontiguous(String),
    #[error("shape error: {0}")]
    Shape(ShapeErrorKind),
    #[error("dtype mismatch: expected {expected}, got {got}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("invalid alignment {0}")]
    InvalidAlignment(usize),
    #[error("cannot build a mutable view over read-only memory")]
    ReadOnly,
}

impl From<ShapeErrorKind> for NdError {
    fn from(e: ShapeErrorKind) -> Self {
        NdError::Shape(e)
    }
}

impl From<NdError> for String {
    fn from(e: NdError) -> Self {
        format!("{}", e)
    }
}
