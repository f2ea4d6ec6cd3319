// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Receiver for tessellation results as they are produced.

use crate::arrangement::VertIdx;
use crate::geom::Real;

/// Primitive kinds replayed to a [`TessSink`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Consecutive triples of vertices form counter-clockwise triangles.
    Triangles,
    /// A closed boundary loop.
    LineLoop,
}

/// Observer installed on a [`Tessellator`](crate::Tessellator).
///
/// `combine` fires once for each synthesized vertex, with the four vertices it
/// was blended from. After that, every primitive is bracketed by `begin` and
/// `end`, with one `vertex` call per vertex index. All methods default to
/// doing nothing.
pub trait TessSink {
    /// Starts a primitive.
    fn begin(&mut self, _kind: PrimitiveKind) {}
    /// Next vertex of the current primitive, as an index into the vertex table.
    fn vertex(&mut self, _index: VertIdx) {}
    /// Closes the current primitive.
    fn end(&mut self) {}
    /// Vertex `index` was synthesized from `sources` (vertex, weight).
    fn combine(&mut self, _index: VertIdx, _sources: &[(VertIdx, Real); 4]) {}
}
