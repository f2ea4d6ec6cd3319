// Copyright 2025 Lars Brubaker
// Shared test utilities for polytess tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use polytess::{PrimitiveKind, Real, TessSink, Tessellator, WindingRule};

/// Parse a `.dat`-style listing: one vertex per line as `x y` or `x, y`.
/// Blank lines separate contours.
pub fn parse_contours(data: &str) -> Vec<Vec<[Real; 2]>> {
    let mut contours: Vec<Vec<[Real; 2]>> = Vec::new();
    let mut current: Vec<[Real; 2]> = Vec::new();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                contours.push(std::mem::take(&mut current));
            }
            continue;
        }
        let values: Vec<Real> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<Real>().ok())
            .collect();
        if values.len() >= 2 {
            current.push([values[0], values[1]]);
        }
    }
    if !current.is_empty() {
        contours.push(current);
    }
    contours
}

/// Signed area of a triangle in the xy-plane.
pub fn triangle_area(a: [Real; 3], b: [Real; 3], c: [Real; 3]) -> Real {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

fn triangle_positions(tess: &Tessellator, tri: [u32; 3]) -> [[Real; 3]; 3] {
    let verts = tess.vertices();
    tri.map(|v| verts[v as usize].position)
}

/// Total absolute xy-area of all output triangles.
pub fn total_tessellation_area(tess: &Tessellator) -> Real {
    tess.triangles()
        .iter()
        .map(|&tri| {
            let [a, b, c] = triangle_positions(tess, tri);
            triangle_area(a, b, c).abs()
        })
        .sum()
}

/// Total signed xy-area of all output triangles.
pub fn total_tessellation_signed_area(tess: &Tessellator) -> Real {
    tess.triangles()
        .iter()
        .map(|&tri| {
            let [a, b, c] = triangle_positions(tess, tri);
            triangle_area(a, b, c)
        })
        .sum()
}

/// Verify that all output is valid: indices in range, vertices finite,
/// no repeated index inside a triangle or loop.
pub fn verify_valid_output(tess: &Tessellator) {
    let count = tess.num_vertices();
    for (i, v) in tess.vertices().iter().enumerate() {
        assert!(
            v.position.iter().all(|c| c.is_finite()),
            "vertex {} = {:?} is not finite",
            i,
            v.position
        );
    }
    for (i, tri) in tess.triangles().iter().enumerate() {
        for &idx in tri {
            assert!(
                (idx as usize) < count,
                "triangle {} index {} out of range (vertex count {})",
                i,
                idx,
                count
            );
        }
        assert!(
            tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2],
            "triangle {} repeats a vertex: {:?}",
            i,
            tri
        );
    }
    for contour in tess.contours() {
        assert!(contour.len() >= 3, "boundary loop too short: {:?}", contour);
        assert!(contour.iter().all(|&v| (v as usize) < count));
    }
}

/// Verify no zero-area triangles in the output, and that every triangle is
/// counter-clockwise in the xy-plane.
pub fn verify_ccw_nondegenerate(tess: &Tessellator, epsilon: Real) {
    for (i, &tri) in tess.triangles().iter().enumerate() {
        let [a, b, c] = triangle_positions(tess, tri);
        let area = triangle_area(a, b, c);
        assert!(
            area > epsilon,
            "triangle {} is degenerate or clockwise (area={}, vertices={:?} {:?} {:?})",
            i,
            area,
            a,
            b,
            c
        );
    }
}

/// Tessellate 2D contours in the xy-plane with the given winding rule.
pub fn tessellate_contours(contours: &[Vec<[Real; 2]>], winding_rule: WindingRule) -> Tessellator {
    let mut tess = Tessellator::new();
    tess.set_winding_rule(winding_rule);
    tess.begin_polygon([0.0, 0.0, 1.0]).unwrap();
    for contour in contours {
        add_contour(&mut tess, contour);
    }
    tess.end_polygon().unwrap();
    tess
}

pub fn add_contour(tess: &mut Tessellator, contour: &[[Real; 2]]) {
    tess.begin_contour().unwrap();
    for &p in contour {
        tess.add_vertex(p).unwrap();
    }
    tess.end_contour().unwrap();
}

pub fn square(x: Real, y: Real, size: Real) -> Vec<[Real; 2]> {
    vec![[x, y], [x + size, y], [x + size, y + size], [x, y + size]]
}

/// Signed area of a simple polygon.
pub fn polygon_signed_area(verts: &[[Real; 2]]) -> Real {
    let n = verts.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += verts[i][0] * verts[j][1] - verts[j][0] * verts[i][1];
    }
    area * 0.5
}

/// Signed xy-area of a boundary loop given as vertex indices.
pub fn loop_signed_area(tess: &Tessellator, contour: &[u32]) -> Real {
    let points: Vec<[Real; 2]> = contour
        .iter()
        .map(|&v| {
            let p = tess.vertices()[v as usize].position;
            [p[0], p[1]]
        })
        .collect();
    polygon_signed_area(&points)
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    Begin(PrimitiveKind),
    Vertex(u32),
    End,
    Combine(u32, [(u32, Real); 4]),
}

/// Sink that records every callback into a shared log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Arc<Mutex<Vec<SinkEvent>>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<SinkEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&mut self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl TessSink for RecordingSink {
    fn begin(&mut self, kind: PrimitiveKind) {
        self.push(SinkEvent::Begin(kind));
    }

    fn vertex(&mut self, index: u32) {
        self.push(SinkEvent::Vertex(index));
    }

    fn end(&mut self) {
        self.push(SinkEvent::End);
    }

    fn combine(&mut self, index: u32, sources: &[(u32, Real); 4]) {
        self.push(SinkEvent::Combine(index, *sources));
    }
}

/// Winding number of `p` with respect to closed contours. Contours with
/// fewer than three vertices enclose nothing.
pub fn winding_number(contours: &[Vec<[Real; 2]>], p: [Real; 2]) -> i32 {
    let mut winding = 0;
    for c in contours.iter().filter(|c| c.len() >= 3) {
        for (i, &a) in c.iter().enumerate() {
            let b = c[(i + 1) % c.len()];
            let side = (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1]);
            if a[1] <= p[1] {
                if b[1] > p[1] && side > 0.0 {
                    winding += 1;
                }
            } else if b[1] <= p[1] && side < 0.0 {
                winding -= 1;
            }
        }
    }
    winding
}

fn segment_distance(p: [Real; 2], a: [Real; 2], b: [Real; 2]) -> Real {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dx * dx + dy * dy;
    let u = if len2 > 0.0 {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((p[0] - a[0] - u * dx).powi(2) + (p[1] - a[1] - u * dy).powi(2)).sqrt()
}

fn strictly_inside(p: [Real; 2], tri: [[Real; 2]; 3]) -> bool {
    let side = |a: [Real; 2], b: [Real; 2]| (b[0] - a[0]) * (p[1] - a[1]) - (p[0] - a[0]) * (b[1] - a[1]);
    let s = [side(tri[0], tri[1]), side(tri[1], tri[2]), side(tri[2], tri[0])];
    s.iter().all(|&x| x > 0.0) || s.iter().all(|&x| x < 0.0)
}

/// Samples an `n` x `n` grid over the contours' bounding box and returns the
/// samples where the number of covering triangles is not what the winding
/// rule asks for (one inside, zero outside). Samples within a small margin
/// of an input edge or a triangle edge are skipped.
pub fn coverage_mismatches(
    tess: &Tessellator,
    contours: &[Vec<[Real; 2]>],
    rule: WindingRule,
    n: usize,
) -> Vec<[Real; 2]> {
    let all = contours.iter().flatten();
    let (mut lo, mut hi) = ([Real::MAX; 2], [Real::MIN; 2]);
    for p in all {
        for k in 0..2 {
            lo[k] = lo[k].min(p[k]);
            hi[k] = hi[k].max(p[k]);
        }
    }
    if lo[0] > hi[0] {
        return Vec::new();
    }
    let margin = 1e-7 * (hi[0] - lo[0]).max(hi[1] - lo[1]).max(1.0);

    let triangles: Vec<[[Real; 2]; 3]> = tess
        .triangles()
        .iter()
        .map(|tri| {
            tri.map(|v| {
                let p = tess.vertices()[v as usize].position;
                [p[0], p[1]]
            })
        })
        .collect();
    let mut edges: Vec<([Real; 2], [Real; 2])> = Vec::new();
    for c in contours.iter().filter(|c| c.len() >= 3) {
        for (i, &a) in c.iter().enumerate() {
            edges.push((a, c[(i + 1) % c.len()]));
        }
    }
    for t in &triangles {
        edges.extend([(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]);
    }

    let mut bad = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let p = [
                lo[0] + (hi[0] - lo[0]) * (i as Real + 0.5) / n as Real,
                lo[1] + (hi[1] - lo[1]) * (j as Real + 0.5) / n as Real,
            ];
            if edges.iter().any(|&(a, b)| segment_distance(p, a, b) < margin) {
                continue;
            }
            let expected = rule.is_inside(winding_number(contours, p)) as usize;
            let covered = triangles.iter().filter(|&&t| strictly_inside(p, t)).count();
            if covered != expected {
                bad.push(p);
            }
        }
    }
    bad
}

/// Small deterministic xorshift generator for randomized tests.
pub struct XorShift(pub u64);

impl XorShift {
    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    /// Uniform integer in `0..n`.
    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}
