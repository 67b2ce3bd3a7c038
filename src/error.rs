use std::fmt;

/// Positions an operation accepts, always starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidRange {
    /// `[0, n)`: positions that hold a value.
    HalfOpen(usize),
    /// `[0, n]`: positions a value can be inserted at or removed from.
    Closed(usize),
}

impl fmt::Display for ValidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidRange::HalfOpen(end) => write!(f, "[0, {})", end),
            ValidRange::Closed(end) => write!(f, "[0, {}]", end),
        }
    }
}

/// The only way a list operation can fail: the caller asked for a position
/// the list does not currently have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// `index` fell outside `valid`, the range the call accepts given the
    /// list length at the time of the call.
    #[error("attempted access at index {index}, which is out of bounds {valid}")]
    IndexOutOfBounds { index: usize, valid: ValidRange },
}

impl ListError {
    pub(crate) fn read_out_of_bounds(index: usize, len: usize) -> ListError {
        ListError::IndexOutOfBounds {
            index,
            valid: ValidRange::HalfOpen(len),
        }
    }

    pub(crate) fn position_out_of_bounds(index: usize, len: usize) -> ListError {
        ListError::IndexOutOfBounds {
            index,
            valid: ValidRange::Closed(len),
        }
    }

    // Empty-list accesses have no meaningful index of their own.
    pub(crate) fn empty() -> ListError {
        ListError::read_out_of_bounds(0, 0)
    }
}

pub type Result<T> = std::result::Result<T, ListError>;
