// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Output vertex records and the point conversions accepted by `add_vertex`.

use crate::geom::Real;

/// A vertex position as passed to [`Tessellator::add_vertex`](crate::Tessellator::add_vertex).
/// 2D points are placed in the z = 0 plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position(pub [Real; 3]);

impl From<[Real; 3]> for Position {
    fn from(p: [Real; 3]) -> Self {
        Position(p)
    }
}

impl From<[Real; 2]> for Position {
    fn from(p: [Real; 2]) -> Self {
        Position([p[0], p[1], 0.0])
    }
}

impl From<[f32; 3]> for Position {
    fn from(p: [f32; 3]) -> Self {
        Position([p[0] as Real, p[1] as Real, p[2] as Real])
    }
}

impl From<[f32; 2]> for Position {
    fn from(p: [f32; 2]) -> Self {
        Position([p[0] as Real, p[1] as Real, 0.0])
    }
}

impl From<(Real, Real)> for Position {
    fn from((x, y): (Real, Real)) -> Self {
        Position([x, y, 0.0])
    }
}

impl From<(Real, Real, Real)> for Position {
    fn from((x, y, z): (Real, Real, Real)) -> Self {
        Position([x, y, z])
    }
}

/// Where a vertex came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexKind {
    /// Added by the caller; the value is its emission order.
    Input(u32),
    /// Synthesized at an edge intersection.
    Combined,
}

/// One entry of the vertex table.
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    /// Position in the caller's coordinates; blended for combined vertices.
    pub position: [Real; 3],
    /// Attributes carried with the position (texture coordinates, colors, ...).
    pub data: Vec<Real>,
    /// Input or combined.
    pub kind: VertexKind,
}

impl Vertex {
    pub fn is_combined(&self) -> bool {
        self.kind == VertexKind::Combined
    }
}
