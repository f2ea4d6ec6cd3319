// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Boolean operations on 2D polygons, computed as boundary-only
//! tessellations under different winding rules.
//!
//! Results are simple, non-intersecting loops: outer boundaries are
//! counter-clockwise and holes are clockwise.

use crate::error::TessError;
use crate::geom::Real;
use crate::tess::{TessOption, Tessellator, WindingRule};

/// A closed loop of 2D points; the last point connects back to the first.
pub type Polygon2 = Vec<[Real; 2]>;

/// Signed area of a polygon, positive when counter-clockwise.
pub fn signed_area(polygon: &[[Real; 2]]) -> Real {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        area += p[0] * q[1] - q[0] * p[1];
    }
    0.5 * area
}

pub fn is_clockwise(polygon: &[[Real; 2]]) -> bool {
    signed_area(polygon) < 0.0
}

fn oriented(polygon: &[[Real; 2]], clockwise: bool) -> Polygon2 {
    let mut p = polygon.to_vec();
    if is_clockwise(&p) != clockwise {
        p.reverse();
    }
    p
}

/// Resolves `polygons` under `rule` and returns the boundary of the result.
pub fn tessellate(polygons: &[Polygon2], rule: WindingRule) -> Result<Vec<Polygon2>, TessError> {
    let mut tess = Tessellator::new();
    tess.set_option(TessOption::BoundaryOnly, true);
    tess.set_winding_rule(rule);
    tess.begin_polygon([0.0, 0.0, 1.0])?;
    for polygon in polygons {
        tess.begin_contour()?;
        for &p in polygon {
            tess.add_vertex(p)?;
        }
        tess.end_contour()?;
    }
    tess.end_polygon()?;

    let vertices = tess.vertices();
    Ok(tess
        .contours()
        .iter()
        .map(|contour| {
            contour
                .iter()
                .map(|&v| {
                    let [x, y, _] = vertices[v as usize].position;
                    [x, y]
                })
                .collect()
        })
        .collect())
}

/// Area covered by any of `polygons`.
pub fn union_of(polygons: &[Polygon2]) -> Result<Vec<Polygon2>, TessError> {
    tessellate(polygons, WindingRule::NonZero)
}

/// Area covered by both `a` and `b`.
pub fn intersection_of(a: &[[Real; 2]], b: &[[Real; 2]]) -> Result<Vec<Polygon2>, TessError> {
    tessellate(&[oriented(a, false), oriented(b, false)], WindingRule::AbsGeqTwo)
}

/// Area covered by `a` but not by `b`.
pub fn difference_of(a: &[[Real; 2]], b: &[[Real; 2]]) -> Result<Vec<Polygon2>, TessError> {
    tessellate(&[oriented(a, false), oriented(b, true)], WindingRule::Positive)
}
