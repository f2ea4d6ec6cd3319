// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The tessellator: session state machine and public API.
//
// A session runs begin_polygon -> (begin_contour -> add_vertex* ->
// end_contour)* -> end_polygon. The vertex table, contours and results all
// live in this struct; end_polygon runs the whole pipeline:
//   projection (geometry.rs) -> arrangement -> sweep -> face mesh -> output.

mod geometry;
mod output;

#[cfg(test)]
mod tests;

use crate::arrangement::{Arrangement, Contour, VertIdx};
use crate::error::TessError;
use crate::geom::Real;
use crate::sink::TessSink;
use crate::sweep;
use crate::vertex::{Position, Vertex, VertexKind};

// ─────────────────────────────── Public types ──────────────────────────────────

/// Decides from a region's winding number whether it is inside the polygon.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindingRule {
    #[default]
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::Odd => winding & 1 == 1,
            WindingRule::NonZero => winding != 0,
            WindingRule::Positive => winding > 0,
            WindingRule::Negative => winding < 0,
            WindingRule::AbsGeqTwo => winding.abs() >= 2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TessOption {
    /// Output the boundary loops between interior and exterior instead of
    /// triangles.
    BoundaryOnly,
    /// Contours begun while set contribute reversed winding.
    ReverseContours,
}

/// Coordinates beyond this magnitude could overflow the planar predicates.
const MAX_VALID_COORD: Real = 1.0e100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Polygon,
    Contour,
    Finished,
}

// ─────────────────────────── Tessellator ──────────────────────────────────────

pub struct Tessellator {
    phase: Phase,
    winding_rule: WindingRule,
    boundary_only: bool,
    reverse_contours: bool,
    normal: [Real; 3],
    sink: Option<Box<dyn TessSink + Send>>,

    // Session input
    vertices: Vec<Vertex>,
    contours: Vec<Contour>,
    data_width: Option<usize>,
    input_count: u32,

    // Output
    triangles: Vec<[VertIdx; 3]>,
    boundaries: Vec<Vec<VertIdx>>,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Tessellator {
            phase: Phase::Idle,
            winding_rule: WindingRule::Odd,
            boundary_only: false,
            reverse_contours: false,
            normal: [0.0; 3],
            sink: None,
            vertices: Vec::new(),
            contours: Vec::new(),
            data_width: None,
            input_count: 0,
            triangles: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    pub fn set_option(&mut self, option: TessOption, value: bool) {
        match option {
            TessOption::BoundaryOnly => self.boundary_only = value,
            TessOption::ReverseContours => self.reverse_contours = value,
        }
    }

    /// Sets the rule used by the next `end_polygon`. Persists across sessions.
    pub fn set_winding_rule(&mut self, rule: WindingRule) {
        self.winding_rule = rule;
    }

    pub fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    /// Installs a sink that receives combined vertices and output primitives
    /// from every following `end_polygon`.
    pub fn set_sink(&mut self, sink: Box<dyn TessSink + Send>) {
        self.sink = Some(sink);
    }

    pub fn take_sink(&mut self) -> Option<Box<dyn TessSink + Send>> {
        self.sink.take()
    }

    // ─────── Session ─────────────────────────────────────────────────────────

    /// Starts a polygon, discarding the previous result.
    ///
    /// Input is projected onto the plane perpendicular to `normal` and output
    /// triangles are counter-clockwise about it. A zero (or non-finite) normal
    /// is estimated from the points instead, oriented so that the contours'
    /// total signed area is non-negative.
    pub fn begin_polygon(&mut self, normal: [Real; 3]) -> Result<(), TessError> {
        if matches!(self.phase, Phase::Polygon | Phase::Contour) {
            return Err(TessError::InvalidState(
                "begin_polygon called while a polygon is open",
            ));
        }
        self.clear_session();
        self.normal = normal;
        self.phase = Phase::Polygon;
        Ok(())
    }

    pub fn begin_contour(&mut self) -> Result<(), TessError> {
        match self.phase {
            Phase::Polygon => {}
            Phase::Contour => {
                return Err(TessError::InvalidState(
                    "begin_contour called while a contour is open",
                ))
            }
            Phase::Idle | Phase::Finished => {
                return Err(TessError::InvalidState(
                    "begin_contour called outside begin_polygon/end_polygon",
                ))
            }
        }
        self.contours.push(Contour {
            vertices: Vec::new(),
            winding: if self.reverse_contours { -1 } else { 1 },
        });
        self.phase = Phase::Contour;
        Ok(())
    }

    /// Appends a vertex without attributes to the open contour and returns
    /// its index in the vertex table.
    pub fn add_vertex(&mut self, point: impl Into<Position>) -> Result<VertIdx, TessError> {
        self.add_vertex_with_data(point, &[])
    }

    pub fn add_vertex_with_texcoord(
        &mut self,
        point: impl Into<Position>,
        texcoord: [Real; 2],
    ) -> Result<VertIdx, TessError> {
        self.add_vertex_with_data(point, &texcoord)
    }

    /// Appends a vertex carrying `data` attributes. Every vertex of a polygon
    /// must carry the same number of attributes; combined vertices get a
    /// weighted blend of their sources' attributes.
    pub fn add_vertex_with_data(
        &mut self,
        point: impl Into<Position>,
        data: &[Real],
    ) -> Result<VertIdx, TessError> {
        if self.phase != Phase::Contour {
            return Err(TessError::InvalidState(
                "add_vertex called without an open contour",
            ));
        }
        let Position(position) = point.into();
        if !position.iter().chain(data).all(|&c| is_valid_coord(c)) {
            return Err(TessError::InvalidCoordinate);
        }
        match self.data_width {
            Some(expected) if expected != data.len() => {
                return Err(TessError::AttributeCount {
                    expected,
                    found: data.len(),
                })
            }
            Some(_) => {}
            None => self.data_width = Some(data.len()),
        }

        let index = self.vertices.len() as VertIdx;
        self.vertices.push(Vertex {
            position,
            data: data.to_vec(),
            kind: VertexKind::Input(self.input_count),
        });
        self.input_count += 1;
        if let Some(contour) = self.contours.last_mut() {
            contour.vertices.push(index);
        }
        Ok(index)
    }

    pub fn end_contour(&mut self) -> Result<(), TessError> {
        if self.phase != Phase::Contour {
            return Err(TessError::InvalidState(
                "end_contour called without an open contour",
            ));
        }
        self.phase = Phase::Polygon;
        Ok(())
    }

    /// Closes the polygon and tessellates it. Calling it again on a finished
    /// polygon does nothing.
    pub fn end_polygon(&mut self) -> Result<(), TessError> {
        match self.phase {
            Phase::Polygon => {}
            Phase::Finished => return Ok(()),
            Phase::Contour => {
                return Err(TessError::InvalidState(
                    "end_polygon called while a contour is open",
                ))
            }
            Phase::Idle => {
                return Err(TessError::InvalidState(
                    "end_polygon called without begin_polygon",
                ))
            }
        }
        self.phase = Phase::Finished;
        self.tessellate();
        Ok(())
    }

    /// Discards all session state. The winding rule, options and sink are kept.
    pub fn reset(&mut self) {
        self.clear_session();
        self.phase = Phase::Idle;
    }

    fn clear_session(&mut self) {
        self.vertices.clear();
        self.contours.clear();
        self.data_width = None;
        self.input_count = 0;
        self.triangles.clear();
        self.boundaries.clear();
    }

    // ─────── Accessors ────────────────────────────────────────────────────────

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn get_triangle(&self, i: usize) -> Result<[VertIdx; 3], TessError> {
        self.triangles
            .get(i)
            .copied()
            .ok_or(TessError::IndexOutOfRange {
                index: i,
                count: self.triangles.len(),
            })
    }

    pub fn triangles(&self) -> &[[VertIdx; 3]] {
        &self.triangles
    }

    /// Boundary loops, filled when `TessOption::BoundaryOnly` is set.
    pub fn num_contours(&self) -> usize {
        self.boundaries.len()
    }

    pub fn get_contour(&self, i: usize) -> Result<&[VertIdx], TessError> {
        self.boundaries
            .get(i)
            .map(Vec::as_slice)
            .ok_or(TessError::IndexOutOfRange {
                index: i,
                count: self.boundaries.len(),
            })
    }

    pub fn contours(&self) -> &[Vec<VertIdx>] {
        &self.boundaries
    }

    /// Input vertices in emission order, then combined vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    // ─────── Pipeline ─────────────────────────────────────────────────────────

    fn tessellate(&mut self) {
        let points = self.project_polygon();
        let arrangement = Arrangement::build(points, &self.contours);
        self.add_combined_vertices(&arrangement);

        let sweep = sweep::compute_interior(&arrangement.points, &arrangement.segments, self.winding_rule);
        if self.boundary_only {
            self.output_contours(&arrangement, &sweep);
        } else {
            self.output_triangles(&arrangement, &sweep);
        }

        log::debug!(
            "tessellated {} contours ({:?}): {} input + {} combined vertices, {} triangles, {} boundary loops",
            self.contours.len(),
            self.winding_rule,
            self.input_count,
            arrangement.combines.len(),
            self.triangles.len(),
            self.boundaries.len()
        );
    }

    /// Appends a vertex for each crossing, blending position and attributes
    /// of its four sources with the crossing weights.
    fn add_combined_vertices(&mut self, arrangement: &Arrangement) {
        let width = self.data_width.unwrap_or(0);
        for combine in &arrangement.combines {
            debug_assert_eq!(combine.index as usize, self.vertices.len());
            let mut position = [0.0; 3];
            let mut data = vec![0.0; width];
            for &(src, weight) in &combine.sources {
                let source = &self.vertices[src as usize];
                for (p, s) in position.iter_mut().zip(&source.position) {
                    *p += weight * s;
                }
                for (d, s) in data.iter_mut().zip(&source.data) {
                    *d += weight * s;
                }
            }
            self.vertices.push(Vertex {
                position,
                data,
                kind: VertexKind::Combined,
            });
            if let Some(sink) = self.sink.as_mut() {
                sink.combine(combine.index, &combine.sources);
            }
        }
    }
}

fn is_valid_coord(c: Real) -> bool {
    c.is_finite() && c.abs() <= MAX_VALID_COORD
}
