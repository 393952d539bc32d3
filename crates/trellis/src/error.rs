//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps the
//! error conditions that can occur while arranging a diagram.

use thiserror::Error;

/// The main error type for Trellis operations.
///
/// The built-in strategies are total over well-formed input and never fail;
/// errors arise only on the delegating path, where an external algorithm can
/// reject a level graph or hand back positions for ids the hierarchy does
/// not know.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}
