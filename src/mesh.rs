// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge graph over the classified arrangement, and the face walks that
// turn it into output.
//
// Design:
//   - Half-edges are allocated in pairs: edges[i] and edges[i^1] are always a
//     pair, sym(e) = e ^ 1.
//   - Each half-edge knows whether the face on its left is inside.
//   - lnext is derived from the angular order of the edges around each
//     vertex, so walking lnext traces the face on the left counter-clockwise.

use crate::arrangement::VertIdx;
use crate::geom::{orient, Point};

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::edges
pub type EdgeIdx = u32;

/// Compute the symmetric half-edge index (always the other half of the pair).
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Origin vertex index.
    pub org: VertIdx,
    /// Next edge CCW around the left face.
    pub lnext: EdgeIdx,
    /// Is the face on the left inside the polygon?
    pub inside: bool,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            org: INVALID,
            lnext: INVALID,
            inside: false,
        }
    }
}

/// The half-edge mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub edges: Vec<HalfEdge>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge pair org->dst. `inside_left` and `inside_right` describe
    /// the faces on either side as seen walking from org to dst.
    pub fn add_edge(&mut self, org: VertIdx, dst: VertIdx, inside_left: bool, inside_right: bool) -> EdgeIdx {
        let e = self.edges.len() as EdgeIdx;
        self.edges.push(HalfEdge {
            org,
            lnext: INVALID,
            inside: inside_left,
        });
        self.edges.push(HalfEdge {
            org: dst,
            lnext: INVALID,
            inside: inside_right,
        });
        e
    }

    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[sym(e) as usize].org
    }

    /// Links every half-edge to the next one around its left face.
    ///
    /// Around each vertex the outgoing edges are sorted counter-clockwise;
    /// arriving along e, the left face continues with the outgoing edge just
    /// clockwise of sym(e).
    pub fn link_faces(&mut self, points: &[Point]) {
        let mut outgoing: Vec<Vec<(f64, EdgeIdx)>> = vec![Vec::new(); points.len()];
        for (e, edge) in self.edges.iter().enumerate() {
            let e = e as EdgeIdx;
            let o = points[edge.org as usize];
            let d = points[self.dst(e) as usize];
            outgoing[edge.org as usize].push(((d.t - o.t).atan2(d.s - o.s), e));
        }

        for fan in &mut outgoing {
            fan.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            let k = fan.len();
            for i in 0..k {
                let arriving = sym(fan[i].1);
                let leaving = fan[(i + k - 1) % k].1;
                self.edges[arriving as usize].lnext = leaving;
            }
        }
    }

    /// Walks every face whose left side is inside and returns its vertex loop
    /// in counter-clockwise order. Requires `link_faces`.
    pub fn inside_loops(&self) -> Vec<Vec<VertIdx>> {
        let mut visited = vec![false; self.edges.len()];
        let mut loops = Vec::new();

        for start in 0..self.edges.len() {
            if visited[start] || !self.edges[start].inside {
                continue;
            }
            let mut face = Vec::new();
            let mut e = start;
            let closed = loop {
                if visited[e] || !self.edges[e].inside || face.len() > self.edges.len() {
                    break false;
                }
                visited[e] = true;
                face.push(self.edges[e].org);
                let next = self.edges[e].lnext;
                if next == INVALID {
                    break false;
                }
                e = next as usize;
                if e == start {
                    break true;
                }
            };
            if closed {
                loops.push(face);
            } else {
                log::warn!("skipping inconsistent face at half-edge {}", start);
            }
        }
        loops
    }
}

/// Triangulates a face that is monotone in sweep order, given as a
/// counter-clockwise vertex loop. Triangles are appended counter-clockwise.
/// Returns the number of triangles added.
///
/// The two chains between the leftmost and rightmost vertices are merged in
/// sweep order and consumed with a stack of vertices still waiting for a
/// triangle, which is linear in the size of the face.
pub fn tessellate_mono_region(points: &[Point], face: &[VertIdx], out: &mut Vec<[VertIdx; 3]>) -> usize {
    let n = face.len();
    if n < 3 {
        return 0;
    }
    let pt = |i: usize| points[face[i] as usize];
    let before = |i: usize, j: usize| pt(i).sweep_cmp(pt(j)).then(i.cmp(&j)).is_lt();

    let mut first = 0;
    let mut last = 0;
    for i in 1..n {
        if before(i, first) {
            first = i;
        }
        if before(last, i) {
            last = i;
        }
    }
    if first == last {
        return 0;
    }

    // Walking forward (counter-clockwise) from the leftmost vertex follows the
    // lower chain; walking backward follows the upper chain.
    let mut lower = vec![false; n];
    let mut order = Vec::with_capacity(n);
    order.push(first);
    let mut lo = (first + 1) % n;
    let mut up = (first + n - 1) % n;
    while lo != last || up != last {
        let take_lower = if lo == last {
            false
        } else if up == last {
            true
        } else {
            before(lo, up)
        };
        if take_lower {
            lower[lo] = true;
            order.push(lo);
            lo = (lo + 1) % n;
        } else {
            order.push(up);
            up = (up + n - 1) % n;
        }
    }
    order.push(last);

    let added = out.len();
    let mut emit = |a: usize, b: usize, c: usize| {
        let (va, vb, vc) = (face[a], face[b], face[c]);
        if va == vb || vb == vc || va == vc {
            return;
        }
        let area = orient(pt(a), pt(b), pt(c));
        if area > 0.0 {
            out.push([va, vb, vc]);
        } else if area < 0.0 {
            out.push([va, vc, vb]);
        }
    };

    let mut stack = vec![order[0], order[1]];
    for j in 2..order.len() - 1 {
        let u = order[j];
        let top = stack[stack.len() - 1];
        if lower[u] != lower[top] {
            // u sees every vertex on the stack.
            for w in stack.windows(2) {
                emit(u, w[0], w[1]);
            }
            stack.clear();
            stack.push(order[j - 1]);
            stack.push(u);
        } else {
            let mut prev = top;
            stack.pop();
            while let Some(&t) = stack.last() {
                let turn = orient(pt(t), pt(prev), pt(u));
                let convex = if lower[u] { turn > 0.0 } else { turn < 0.0 };
                if !convex {
                    break;
                }
                emit(t, prev, u);
                prev = t;
                stack.pop();
            }
            stack.push(prev);
            stack.push(u);
        }
    }

    let u = order[order.len() - 1];
    for w in stack.windows(2) {
        emit(u, w[0], w[1]);
    }

    out.len() - added
}
