// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep over the arrangement in (s, t) order.
//
// The active edges are the segments crossing the sweep line, kept bottom to
// top. Each active edge owns the region above it (up to the next active
// edge); the region below the lowest edge is the unbounded exterior. Regions
// carry a winding number, whether the winding rule puts them inside, and a
// helper vertex.
//
// While sweeping, diagonals are added wherever an inside region would stop
// being monotone:
//   - split: a vertex with no left edges lands inside an inside region; it is
//     connected to that region's helper,
//   - merge: two inside regions join at a vertex with no right edges; the next
//     vertex touching the joined region is connected back to it.
// Every inside face of the segments plus diagonals is then monotone in s.

use crate::arrangement::{Segment, VertIdx};
use crate::geom::{edge_eval, Point};
use crate::tess::WindingRule;

/// An active region: the area above one active edge, up to the next one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActiveRegion {
    /// Winding number of every point in the region.
    pub winding_number: i32,
    /// Is this region inside the polygon?
    pub inside: bool,
    /// Most recent vertex on the boundary of the region (or inside it).
    pub helper: VertIdx,
    /// The helper is a merge vertex still waiting for its diagonal.
    pub merge: bool,
}

impl ActiveRegion {
    fn exterior(helper: VertIdx) -> Self {
        ActiveRegion {
            winding_number: 0,
            inside: false,
            helper,
            merge: false,
        }
    }
}

/// Inside flags on both sides of a segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeSides {
    pub above: bool,
    pub below: bool,
}

impl EdgeSides {
    /// Separates the interior from the exterior.
    pub fn is_boundary(self) -> bool {
        self.above != self.below
    }

    /// Touches the interior on at least one side.
    pub fn touches_interior(self) -> bool {
        self.above || self.below
    }
}

#[derive(Clone, Debug, Default)]
pub struct SweepResult {
    /// Per segment, in the order of the arrangement's segments.
    pub sides: Vec<EdgeSides>,
    pub diagonals: Vec<(VertIdx, VertIdx)>,
}

#[derive(Copy, Clone, Debug)]
struct ActiveEdge {
    seg: usize,
    above: ActiveRegion,
}

struct Sweep<'a> {
    points: &'a [Point],
    segments: &'a [Segment],
    rule: WindingRule,
    active: Vec<ActiveEdge>,
    result: SweepResult,
}

/// Classifies every region of the arrangement under `rule` and computes the
/// diagonals that make the interior monotone.
pub fn compute_interior(points: &[Point], segments: &[Segment], rule: WindingRule) -> SweepResult {
    let mut ending: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    let mut starting: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for (i, seg) in segments.iter().enumerate() {
        starting[seg.org as usize].push(i);
        ending[seg.dst as usize].push(i);
    }

    let mut events: Vec<VertIdx> = (0..points.len())
        .filter(|&v| !starting[v].is_empty() || !ending[v].is_empty())
        .map(|v| v as VertIdx)
        .collect();
    events.sort_by(|&a, &b| {
        points[a as usize]
            .sweep_cmp(points[b as usize])
            .then(a.cmp(&b))
    });

    let mut sweep = Sweep {
        points,
        segments,
        rule,
        active: Vec::new(),
        result: SweepResult {
            sides: vec![EdgeSides::default(); segments.len()],
            diagonals: Vec::new(),
        },
    };
    for v in events {
        sweep.sweep_event(v, &ending[v as usize], &starting[v as usize]);
    }
    if !sweep.active.is_empty() {
        log::warn!("{} edges still active after the sweep", sweep.active.len());
    }
    sweep.result
}

impl<'a> Sweep<'a> {
    fn sweep_event(&mut self, v: VertIdx, ending: &[usize], starting: &[usize]) {
        let mut positions: Vec<usize> = ending
            .iter()
            .filter_map(|&seg| self.active.iter().position(|e| e.seg == seg))
            .collect();
        if positions.len() != ending.len() {
            log::warn!("vertex {}: an edge ending here was never activated", v);
        }
        positions.sort_unstable();

        let Some(&lo) = positions.first() else {
            // Only right edges: a start vertex, or a split vertex if it lands
            // inside the interior.
            let lo = self.insertion_point(v);
            let below = self.region_below(lo, v);
            if below.inside {
                self.result.diagonals.push((below.helper, v));
            }
            self.insert_right_edges(v, lo, below, starting);
            return;
        };

        if positions[positions.len() - 1] + 1 - lo != positions.len() {
            log::warn!("vertex {}: edges ending here are not adjacent", v);
        }

        // Regions above the ending edges, bottom to top. All but the last one
        // close here; the last one continues above the new right edges.
        let mut closing = Vec::with_capacity(positions.len());
        for &p in positions.iter().rev() {
            closing.push(self.active.remove(p).above);
        }
        closing.reverse();

        let below = self.region_below(lo, v);
        for r in std::iter::once(&below).chain(closing.iter()) {
            if r.inside && r.merge {
                self.result.diagonals.push((r.helper, v));
            }
        }

        if starting.is_empty() {
            // The regions below and above the vertex join. If they are inside
            // this is a merge vertex.
            if lo > 0 {
                let r = &mut self.active[lo - 1].above;
                r.helper = v;
                r.merge = r.inside;
            }
        } else {
            self.insert_right_edges(v, lo, below, starting);
        }
    }

    /// Position at which a vertex with no left edges enters the active list:
    /// the number of active edges passing below it.
    fn insertion_point(&self, v: VertIdx) -> usize {
        let p = self.points[v as usize];
        self.active
            .iter()
            .position(|e| {
                let seg = self.segments[e.seg];
                let org = self.points[seg.org as usize];
                let dst = self.points[seg.dst as usize];
                edge_eval(org, p, dst) < 0.0
            })
            .unwrap_or(self.active.len())
    }

    fn region_below(&self, lo: usize, v: VertIdx) -> ActiveRegion {
        match lo {
            0 => ActiveRegion::exterior(v),
            _ => self.active[lo - 1].above,
        }
    }

    /// Inserts the edges leaving `v` at position `lo`, bottom to top, and
    /// makes `v` the helper of every region it touches.
    fn insert_right_edges(&mut self, v: VertIdx, lo: usize, below: ActiveRegion, starting: &[usize]) {
        let origin = self.points[v as usize];
        let mut order: Vec<(f64, usize)> = starting
            .iter()
            .map(|&seg| {
                let d = self.points[self.segments[seg].dst as usize];
                ((d.t - origin.t).atan2(d.s - origin.s), seg)
            })
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        if lo > 0 {
            let r = &mut self.active[lo - 1].above;
            r.helper = v;
            r.merge = false;
        }

        let mut winding = below.winding_number;
        let mut inside_below = below.inside;
        for (k, &(_, seg)) in order.iter().enumerate() {
            winding += self.segments[seg].winding;
            let inside = self.rule.is_inside(winding);
            self.result.sides[seg] = EdgeSides {
                above: inside,
                below: inside_below,
            };
            self.active.insert(
                lo + k,
                ActiveEdge {
                    seg,
                    above: ActiveRegion {
                        winding_number: winding,
                        inside,
                        helper: v,
                        merge: false,
                    },
                },
            );
            inside_below = inside;
        }
    }
}
