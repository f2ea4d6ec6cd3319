// Copyright 2025 Lars Brubaker
// Output generation methods for the Tessellator.

use super::Tessellator;
use crate::arrangement::Arrangement;
use crate::mesh::{tessellate_mono_region, Mesh};
use crate::sink::PrimitiveKind;
use crate::sweep::SweepResult;

impl Tessellator {
    /// Triangulates the interior: every inside face of the segments plus the
    /// sweep's diagonals is monotone and is handed to the monotone triangulator.
    pub(crate) fn output_triangles(&mut self, arrangement: &Arrangement, sweep: &SweepResult) {
        let mut mesh = Mesh::new();
        for (seg, sides) in arrangement.segments.iter().zip(&sweep.sides) {
            if sides.touches_interior() {
                // Walking left to right, the region above is on the left.
                mesh.add_edge(seg.org, seg.dst, sides.above, sides.below);
            }
        }
        for &(a, b) in &sweep.diagonals {
            mesh.add_edge(a, b, true, true);
        }
        mesh.link_faces(&arrangement.points);

        for face in mesh.inside_loops() {
            tessellate_mono_region(&arrangement.points, &face, &mut self.triangles);
        }

        if self.triangles.is_empty() {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            sink.begin(PrimitiveKind::Triangles);
            for tri in &self.triangles {
                for &v in tri {
                    sink.vertex(v);
                }
            }
            sink.end();
        }
    }

    /// Collects the loops separating interior from exterior. Outer loops come
    /// out counter-clockwise and holes clockwise.
    pub(crate) fn output_contours(&mut self, arrangement: &Arrangement, sweep: &SweepResult) {
        let mut mesh = Mesh::new();
        for (seg, sides) in arrangement.segments.iter().zip(&sweep.sides) {
            if sides.is_boundary() {
                mesh.add_edge(seg.org, seg.dst, sides.above, sides.below);
            }
        }
        mesh.link_faces(&arrangement.points);
        self.boundaries = mesh.inside_loops();

        if let Some(sink) = self.sink.as_mut() {
            for contour in &self.boundaries {
                sink.begin(PrimitiveKind::LineLoop);
                for &v in contour {
                    sink.vertex(v);
                }
                sink.end();
            }
        }
    }
}
