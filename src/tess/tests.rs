// Copyright 2025 Lars Brubaker
// Unit tests for the tessellator internals.

use super::*;
use crate::geom::{loop_area, orient, Point};
use approx::assert_relative_eq;

fn add_contour(tess: &mut Tessellator, coords: &[[Real; 2]]) {
    tess.begin_contour().unwrap();
    for &c in coords {
        tess.add_vertex(c).unwrap();
    }
    tess.end_contour().unwrap();
}

fn projected_area(tess: &Tessellator) -> Real {
    let points = tess.project_polygon();
    tess.triangles
        .iter()
        .map(|t| 0.5 * orient(points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]))
        .sum()
}

#[test]
fn winding_rule_table() {
    let cases = [-2, -1, 0, 1, 2, 3];
    let check = |rule: WindingRule, expected: [bool; 6]| {
        let got: Vec<bool> = cases.iter().map(|&w| rule.is_inside(w)).collect();
        assert_eq!(got, expected, "{:?}", rule);
    };
    check(WindingRule::Odd, [false, true, false, true, false, true]);
    check(WindingRule::NonZero, [true, true, false, true, true, true]);
    check(WindingRule::Positive, [false, false, false, true, true, true]);
    check(WindingRule::Negative, [true, true, false, false, false, false]);
    check(WindingRule::AbsGeqTwo, [true, false, false, false, true, true]);
    assert_eq!(WindingRule::default(), WindingRule::Odd);
}

#[test]
fn coordinate_limits() {
    assert!(is_valid_coord(0.0));
    assert!(is_valid_coord(-MAX_VALID_COORD));
    assert!(!is_valid_coord(Real::NAN));
    assert!(!is_valid_coord(Real::INFINITY));
    assert!(!is_valid_coord(2.0e100));
}

#[test]
fn phases_follow_the_session() {
    let mut tess = Tessellator::new();
    assert_eq!(tess.phase, Phase::Idle);
    tess.begin_polygon([0.0; 3]).unwrap();
    assert_eq!(tess.phase, Phase::Polygon);
    tess.begin_contour().unwrap();
    assert_eq!(tess.phase, Phase::Contour);
    tess.end_contour().unwrap();
    tess.end_polygon().unwrap();
    assert_eq!(tess.phase, Phase::Finished);
    tess.reset();
    assert_eq!(tess.phase, Phase::Idle);
}

#[test]
fn reversed_contours_capture_the_option_at_begin() {
    let mut tess = Tessellator::new();
    tess.begin_polygon([0.0, 0.0, 1.0]).unwrap();
    add_contour(&mut tess, &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]);
    tess.set_option(TessOption::ReverseContours, true);
    add_contour(&mut tess, &[[5.0, 0.0], [6.0, 0.0], [5.0, 1.0]]);
    assert_eq!(tess.contours[0].winding, 1);
    assert_eq!(tess.contours[1].winding, -1);
}

#[test]
fn estimated_normal_makes_contours_counter_clockwise() {
    // Clockwise square in the xy-plane with no normal given.
    let mut tess = Tessellator::new();
    tess.begin_polygon([0.0; 3]).unwrap();
    add_contour(&mut tess, &[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0], [2.0, 0.0]]);
    let points = tess.project_polygon();
    assert_relative_eq!(loop_area(points), 4.0);
}

#[test]
fn supplied_normal_is_trusted() {
    let mut tess = Tessellator::new();
    tess.begin_polygon([0.0, 0.0, -1.0]).unwrap();
    add_contour(&mut tess, &[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]);
    let points = tess.project_polygon();
    assert_relative_eq!(loop_area(points), -4.0);
}

#[test]
fn pipeline_triangulates_square_with_hole() {
    let mut tess = Tessellator::new();
    tess.begin_polygon([0.0, 0.0, 1.0]).unwrap();
    add_contour(&mut tess, &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
    add_contour(&mut tess, &[[3.0, 3.0], [3.0, 7.0], [7.0, 7.0], [7.0, 3.0]]);
    tess.end_polygon().unwrap();
    assert_eq!(tess.num_triangles(), 8);
    assert_relative_eq!(projected_area(&tess), 84.0, epsilon = 1e-9);
}

#[test]
fn combined_vertex_blends_attributes() {
    // Bowtie: the diagonals cross at (1, 1).
    let mut tess = Tessellator::new();
    tess.begin_polygon([0.0, 0.0, 1.0]).unwrap();
    tess.begin_contour().unwrap();
    tess.add_vertex_with_data([0.0, 0.0], &[0.0, 10.0]).unwrap();
    tess.add_vertex_with_data([2.0, 2.0], &[2.0, 10.0]).unwrap();
    tess.add_vertex_with_data([2.0, 0.0], &[2.0, 10.0]).unwrap();
    tess.add_vertex_with_data([0.0, 2.0], &[0.0, 10.0]).unwrap();
    tess.end_contour().unwrap();
    tess.end_polygon().unwrap();

    assert_eq!(tess.num_vertices(), 5);
    let combined = &tess.vertices()[4];
    assert!(combined.is_combined());
    assert_relative_eq!(combined.position[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(combined.position[1], 1.0, epsilon = 1e-12);
    assert_relative_eq!(combined.data[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(combined.data[1], 10.0, epsilon = 1e-12);
    assert_eq!(tess.num_triangles(), 2);
}

#[test]
fn projection_uses_every_vertex() {
    let mut tess = Tessellator::new();
    tess.begin_polygon([1.0, 0.0, 0.0]).unwrap();
    tess.begin_contour().unwrap();
    tess.add_vertex([3.0, 0.0, 0.0]).unwrap();
    tess.add_vertex([3.0, 1.0, 0.0]).unwrap();
    tess.add_vertex([3.0, 1.0, 1.0]).unwrap();
    tess.end_contour().unwrap();
    let points = tess.project_polygon();
    assert_eq!(
        points,
        vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0)]
    );
}
