// Copyright 2025 Lars Brubaker
// Projection of the 3D input onto the sweep plane.

use super::Tessellator;
use crate::geom::{loop_area, Point, Real};
use crate::vertex::Vertex;

pub(crate) fn dot(u: &[Real; 3], v: &[Real; 3]) -> Real {
    u[0] * v[0] + u[1] * v[1] + u[2] * v[2]
}

fn cross(u: &[Real; 3], v: &[Real; 3]) -> [Real; 3] {
    [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]
}

fn sub(u: &[Real; 3], v: &[Real; 3]) -> [Real; 3] {
    [u[0] - v[0], u[1] - v[1], u[2] - v[2]]
}

pub(crate) fn long_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

pub(crate) fn short_axis(v: &[Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

fn is_usable_normal(n: &[Real; 3]) -> bool {
    n.iter().all(|c| c.is_finite()) && dot(n, n) > 0.0
}

/// Estimates a plane normal from the extreme vertices: the two vertices
/// furthest apart along the widest axis span a line, and the vertex giving
/// the largest triangle with that line fixes the plane. Its sign is arbitrary.
pub(crate) fn compute_normal(vertices: &[Vertex]) -> [Real; 3] {
    let Some(first) = vertices.first() else {
        return [0.0, 0.0, 1.0];
    };

    let mut min_val = first.position;
    let mut max_val = first.position;
    let mut min_vert = [0usize; 3];
    let mut max_vert = [0usize; 3];
    for (v, vertex) in vertices.iter().enumerate() {
        for i in 0..3 {
            let c = vertex.position[i];
            if c < min_val[i] {
                min_val[i] = c;
                min_vert[i] = v;
            }
            if c > max_val[i] {
                max_val[i] = c;
                max_vert[i] = v;
            }
        }
    }

    let mut i = 0;
    if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
        i = 1;
    }
    if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
        i = 2;
    }
    if min_val[i] >= max_val[i] {
        // All vertices coincide.
        return [0.0, 0.0, 1.0];
    }

    let v2 = &vertices[max_vert[i]].position;
    let d1 = sub(&vertices[min_vert[i]].position, v2);

    let mut norm = [0.0; 3];
    let mut max_len2 = 0.0;
    for vertex in vertices {
        let tn = cross(&d1, &sub(&vertex.position, v2));
        let tl2 = dot(&tn, &tn);
        if tl2 > max_len2 {
            max_len2 = tl2;
            norm = tn;
        }
    }

    if max_len2 <= 0.0 {
        // All vertices are collinear; any normal perpendicular to the line works.
        norm = [0.0; 3];
        norm[short_axis(&d1)] = 1.0;
    }
    norm
}

/// Projects `c` onto the plane perpendicular to axis `i`. The sign of the
/// normal's component along that axis decides the orientation of t, so
/// counter-clockwise about the normal stays counter-clockwise in (s, t).
fn project(c: &[Real; 3], i: usize, flip: bool) -> Point {
    let t = c[(i + 2) % 3];
    Point::new(c[(i + 1) % 3], if flip { -t } else { t })
}

impl Tessellator {
    /// Projects every vertex of the session onto the sweep plane.
    pub(crate) fn project_polygon(&self) -> Vec<Point> {
        let supplied = is_usable_normal(&self.normal);
        let norm = if supplied {
            self.normal
        } else {
            compute_normal(&self.vertices)
        };
        let i = long_axis(&norm);
        let flip = norm[i] < 0.0;

        let mut points: Vec<Point> = self
            .vertices
            .iter()
            .map(|v| project(&v.position, i, flip))
            .collect();

        if !supplied && self.signed_contour_area(&points) < 0.0 {
            // An estimated normal may point either way; choose the side that
            // makes the contours counter-clockwise overall.
            for p in &mut points {
                p.t = -p.t;
            }
        }
        points
    }

    /// Sum of the contour areas, each weighted by its winding contribution.
    fn signed_contour_area(&self, points: &[Point]) -> Real {
        self.contours
            .iter()
            .filter(|c| c.vertices.len() >= 3)
            .map(|c| {
                let ring: Vec<Point> = c.vertices.iter().map(|&v| points[v as usize]).collect();
                loop_area(ring) * c.winding as Real
            })
            .sum()
    }
}
