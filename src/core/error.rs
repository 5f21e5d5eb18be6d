use thiserror::Error;

/// Rejected store mutations. A rejected call leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("row has {got} entries, expected {expected} (time + {dims} values)", dims = .expected.saturating_sub(1))]
    RowLength { expected: usize, got: usize },

    #[error("sample time {0} is not finite")]
    NonFiniteTime(f64),

    #[error("cannot shrink dimensions from {current} to {requested}")]
    ShrinkDims { current: usize, requested: usize },
}
