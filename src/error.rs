// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Error type for the tessellator API
use thiserror::Error;

/// Errors reported by [`Tessellator`](crate::Tessellator).
///
/// Every error is raised before the session is modified, so a failed call
/// leaves the polygon under construction intact.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TessError {
    /// A call was made out of the `begin_polygon` / `begin_contour` /
    /// `end_contour` / `end_polygon` sequence
    #[error("invalid call sequence: {0}")]
    InvalidState(&'static str),

    /// A triangle or contour index is past the end of the result
    #[error("index {index} is out of range (count is {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// A vertex coordinate or attribute is NaN or infinite
    #[error("vertex coordinate or attribute is not finite")]
    InvalidCoordinate,

    /// Vertex attribute width differs from the first vertex of the polygon
    #[error("vertex carries {found} attribute values, polygon uses {expected}")]
    AttributeCount { expected: usize, found: usize },
}
