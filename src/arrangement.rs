// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Planar arrangement of the input contours.
//
// Turns the contours into a set of segments that meet only at shared
// endpoints:
//   - points that coincide in the projection collapse onto the earliest index,
//   - every segment is split where another segment crosses or touches it,
//   - a crossing that is not already a vertex becomes a combined vertex,
//   - coincident segments merge and their winding contributions add up.
//
// Each segment is stored left to right in sweep order. Its winding is the
// change in winding number when crossing it from below (right of org->dst)
// to above (left of org->dst).

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::geom::{point_on_segment, segment_crossing, Point, Real};

/// Index of a vertex in the session's vertex table.
pub type VertIdx = u32;

/// Relative distance under which two points are treated as the same point.
const SNAP_EPSILON: Real = 1e-10;

/// Splitting can move a crossing slightly off its segments, which may in turn
/// create new crossings. Refinement stops after this many passes.
const MAX_REFINE_PASSES: usize = 4;

/// A closed loop of vertex indices as added by the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    pub vertices: Vec<VertIdx>,
    /// +1 for contours as given, -1 for reversed contours.
    pub winding: i32,
}

/// An edge of the arrangement, directed left to right in sweep order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub org: VertIdx,
    pub dst: VertIdx,
    pub winding: i32,
}

/// A vertex synthesized where two segments cross.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Combine {
    pub index: VertIdx,
    pub point: Point,
    /// The endpoints of both crossing segments and their blend weights.
    /// Weights sum to one.
    pub sources: [(VertIdx, Real); 4],
}

#[derive(Clone, Debug, Default)]
pub struct Arrangement {
    /// Projected positions of all vertices, input vertices first.
    pub points: Vec<Point>,
    pub segments: Vec<Segment>,
    /// Synthesized vertices in creation order; `combines[i].index` is
    /// `input count + i`.
    pub combines: Vec<Combine>,
    tolerance: Real,
    grid: SnapGrid,
}

impl Arrangement {
    pub fn build(points: Vec<Point>, contours: &[Contour]) -> Arrangement {
        let tolerance = snap_tolerance(&points);
        let canon = collapse_duplicates(&points);

        let mut grid = SnapGrid::new(&points, tolerance);
        for (i, &c) in canon.iter().enumerate() {
            if c as usize == i {
                grid.insert(points[i], c);
            }
        }

        let mut arrangement = Arrangement {
            points,
            segments: Vec::new(),
            combines: Vec::new(),
            tolerance,
            grid,
        };

        let mut segments = Vec::new();
        for contour in contours {
            arrangement.add_contour(&canon, contour, &mut segments);
        }

        for pass in 0..MAX_REFINE_PASSES {
            let (refined, changed) = arrangement.split_pass(&segments);
            segments = refined;
            if !changed {
                break;
            }
            if pass + 1 == MAX_REFINE_PASSES {
                log::warn!(
                    "arrangement still changing after {} refinement passes",
                    MAX_REFINE_PASSES
                );
            }
        }

        arrangement.segments = merge_coincident(segments);
        arrangement
    }

    #[inline]
    pub fn point(&self, v: VertIdx) -> Point {
        self.points[v as usize]
    }

    fn add_contour(&self, canon: &[VertIdx], contour: &Contour, out: &mut Vec<Segment>) {
        let n = contour.vertices.len();
        if n < 3 {
            return;
        }
        for i in 0..n {
            let a = canon[contour.vertices[i] as usize];
            let b = canon[contour.vertices[(i + 1) % n] as usize];
            push_segment(&self.points, out, a, b, contour.winding);
        }
    }

    /// Finds every crossing and touching point between segment pairs and
    /// splits the segments there. Returns the refined segments and whether
    /// anything was split.
    fn split_pass(&mut self, segments: &[Segment]) -> (Vec<Segment>, bool) {
        let mut cuts: Vec<Vec<(Real, VertIdx)>> = vec![Vec::new(); segments.len()];

        // Segments run left to right, so sorting by origin lets the inner loop
        // stop at the first segment starting right of the current one.
        let mut order: Vec<usize> = (0..segments.len()).collect();
        order.sort_by(|&i, &j| {
            self.point(segments[i].org)
                .sweep_cmp(self.point(segments[j].org))
                .then(i.cmp(&j))
        });

        for (k, &i) in order.iter().enumerate() {
            let si = segments[i];
            let (a, b) = (self.point(si.org), self.point(si.dst));
            let t_min = a.t.min(b.t) - self.tolerance;
            let t_max = a.t.max(b.t) + self.tolerance;
            for &j in &order[k + 1..] {
                let sj = segments[j];
                let (c, d) = (self.point(sj.org), self.point(sj.dst));
                if c.s > b.s + self.tolerance {
                    break;
                }
                if c.t.max(d.t) < t_min || c.t.min(d.t) > t_max {
                    continue;
                }
                self.intersect_pair((i, si), (j, sj), &mut cuts);
            }
        }

        let mut changed = false;
        let mut refined = Vec::with_capacity(segments.len());
        for (seg, mut at) in segments.iter().zip(cuts) {
            if at.is_empty() {
                refined.push(*seg);
                continue;
            }
            changed = true;
            at.sort_by(|x, y| x.0.total_cmp(&y.0));
            let mut seen = HashSet::new();
            let mut prev = seg.org;
            for (_, v) in at {
                if v != seg.org && v != seg.dst && seen.insert(v) {
                    push_segment(&self.points, &mut refined, prev, v, seg.winding);
                    prev = v;
                }
            }
            push_segment(&self.points, &mut refined, prev, seg.dst, seg.winding);
        }
        (refined, changed)
    }

    fn intersect_pair(
        &mut self,
        (i, si): (usize, Segment),
        (j, sj): (usize, Segment),
        cuts: &mut [Vec<(Real, VertIdx)>],
    ) {
        // Touching: an endpoint of one segment lies on the other one. This
        // covers T-junctions and collinear overlaps; neither is a crossing.
        let mut touching = false;
        for (v, on, other) in [(sj.org, i, si), (sj.dst, i, si), (si.org, j, sj), (si.dst, j, sj)] {
            if v == other.org || v == other.dst {
                continue;
            }
            let p = self.point(v);
            if let Some(u) =
                point_on_segment(p, self.point(other.org), self.point(other.dst), self.tolerance)
            {
                cuts[on].push((u, v));
                touching = true;
            }
        }
        if touching {
            return;
        }

        let crossing = segment_crossing(
            self.point(si.org),
            self.point(si.dst),
            self.point(sj.org),
            self.point(sj.dst),
        );
        if let Some((x, u, v)) = crossing {
            let at = self.vertex_at(x, si, u, sj, v);
            if at != si.org && at != si.dst {
                cuts[i].push((u, at));
            }
            if at != sj.org && at != sj.dst {
                cuts[j].push((v, at));
            }
        }
    }

    /// Returns the vertex at crossing point `x`, reusing an endpoint or any
    /// other vertex within tolerance before synthesizing one.
    fn vertex_at(&mut self, x: Point, si: Segment, u: Real, sj: Segment, v: Real) -> VertIdx {
        for e in [si.org, si.dst, sj.org, sj.dst] {
            if self.point(e).l1_dist(x) <= self.tolerance {
                return e;
            }
        }
        if let Some(existing) = self.grid.find(&self.points, x, self.tolerance) {
            return existing;
        }

        let index = self.points.len() as VertIdx;
        let sources = [
            (si.org, 0.5 * (1.0 - u)),
            (si.dst, 0.5 * u),
            (sj.org, 0.5 * (1.0 - v)),
            (sj.dst, 0.5 * v),
        ];
        log::trace!(
            "combined vertex {} at ({}, {}) from {:?}",
            index,
            x.s,
            x.t,
            sources
        );
        self.points.push(x);
        self.grid.insert(x, index);
        self.combines.push(Combine {
            index,
            point: x,
            sources,
        });
        index
    }
}

fn snap_tolerance(points: &[Point]) -> Real {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return 0.0;
    };
    let (mut min, mut max) = (*first, *first);
    for p in iter {
        min.s = min.s.min(p.s);
        min.t = min.t.min(p.t);
        max.s = max.s.max(p.s);
        max.t = max.t.max(p.t);
    }
    (max.s - min.s).max(max.t - min.t) * SNAP_EPSILON
}

/// Hash grid over vertex positions, one cell per snapping tolerance.
#[derive(Clone, Debug, Default)]
struct SnapGrid {
    origin: Point,
    cell: Real,
    cells: HashMap<(i64, i64), Vec<VertIdx>>,
}

impl SnapGrid {
    fn new(points: &[Point], cell: Real) -> SnapGrid {
        let origin = points.iter().fold(Point::new(Real::MAX, Real::MAX), |m, p| {
            Point::new(m.s.min(p.s), m.t.min(p.t))
        });
        SnapGrid {
            origin,
            cell,
            cells: HashMap::with_capacity(points.len()),
        }
    }

    fn key(&self, p: Point) -> (i64, i64) {
        if self.cell <= 0.0 {
            return (0, 0);
        }
        // Float to int casts saturate, so far-off points cannot overflow.
        (
            ((p.s - self.origin.s) / self.cell).floor() as i64,
            ((p.t - self.origin.t) / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, p: Point, v: VertIdx) {
        self.cells.entry(self.key(p)).or_default().push(v);
    }

    /// The lowest-indexed vertex within `tolerance` (L1) of `p`. Such a vertex
    /// is at most one cell away on each axis.
    fn find(&self, points: &[Point], p: Point, tolerance: Real) -> Option<VertIdx> {
        let (ks, kt) = self.key(p);
        let mut best: Option<VertIdx> = None;
        for ds in -1..=1i64 {
            for dt in -1..=1i64 {
                let key = (ks.saturating_add(ds), kt.saturating_add(dt));
                let Some(cell) = self.cells.get(&key) else {
                    continue;
                };
                for &v in cell {
                    if points[v as usize].l1_dist(p) <= tolerance && best.map_or(true, |b| v < b) {
                        best = Some(v);
                    }
                }
            }
        }
        best
    }
}

/// Maps every vertex to the earliest vertex with the same projected position.
fn collapse_duplicates(points: &[Point]) -> Vec<VertIdx> {
    let mut first: HashMap<(u64, u64), VertIdx> = HashMap::with_capacity(points.len());
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            // Adding zero folds -0.0 into +0.0 so both hash alike.
            let key = ((p.s + 0.0).to_bits(), (p.t + 0.0).to_bits());
            *first.entry(key).or_insert(i as VertIdx)
        })
        .collect()
}

/// Appends edge a->b as a left-to-right segment. Zero-length edges vanish,
/// whether their ends share an index or only a position.
fn push_segment(points: &[Point], out: &mut Vec<Segment>, a: VertIdx, b: VertIdx, winding: i32) {
    if a == b || points[a as usize] == points[b as usize] {
        return;
    }
    if points[a as usize].leq(points[b as usize]) {
        out.push(Segment {
            org: a,
            dst: b,
            winding,
        });
    } else {
        out.push(Segment {
            org: b,
            dst: a,
            winding: -winding,
        });
    }
}

/// Merges segments joining the same two vertices; cancelled ones are dropped.
fn merge_coincident(segments: Vec<Segment>) -> Vec<Segment> {
    let mut slot: HashMap<(VertIdx, VertIdx), usize> = HashMap::with_capacity(segments.len());
    let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        match slot.entry((seg.org, seg.dst)) {
            Entry::Occupied(e) => merged[*e.get()].winding += seg.winding,
            Entry::Vacant(e) => {
                e.insert(merged.len());
                merged.push(seg);
            }
        }
    }
    merged.retain(|s| s.winding != 0);
    merged
}
