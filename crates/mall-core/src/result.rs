//! Result type aliases for the Mall catalog.

use crate::MallError;

/// A specialized `Result` type for Mall operations.
pub type MallResult<T> = Result<T, MallError>;
