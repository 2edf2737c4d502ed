use approx::assert_abs_diff_eq;
use cityscape::{polygon_area, split_with_line, Point, SplitError};

fn square() -> Vec<Point> {
    vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0), Point::new(0.0, 100.0)]
}

fn l_shape() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 40.0),
        Point::new(40.0, 40.0),
        Point::new(40.0, 100.0),
        Point::new(0.0, 100.0),
    ]
}

#[test]
fn horizontal_line_conserves_area() {
    let (a, b) = split_with_line(&square(), Point::new(-50.0, 50.0), Point::new(150.0, 50.0)).expect("split");
    assert!(a.len() >= 3 && b.len() >= 3);
    assert_abs_diff_eq!(polygon_area(&a) + polygon_area(&b), 10_000.0, epsilon = 1e-9);
}

#[test]
fn line_outside_polygon() {
    let r = split_with_line(&square(), Point::new(-50.0, 200.0), Point::new(150.0, 200.0));
    assert_eq!(r, Err(SplitError::NoIntersection));
}

#[test]
fn concave_cut_through_both_arms() {
    let (a, b) = split_with_line(&l_shape(), Point::new(20.0, -10.0), Point::new(20.0, 110.0)).expect("split");
    assert_abs_diff_eq!(polygon_area(&a), 4_400.0, epsilon = 1e-9);
    assert_abs_diff_eq!(polygon_area(&b), 2_000.0, epsilon = 1e-9);
    assert_eq!(b.len(), 4);
}

#[test]
fn concave_cut_through_one_arm() {
    let (a, b) = split_with_line(&l_shape(), Point::new(70.0, -10.0), Point::new(70.0, 50.0)).expect("split");
    let (small, large) = if polygon_area(&a) < polygon_area(&b) { (a, b) } else { (b, a) };
    assert_abs_diff_eq!(polygon_area(&small), 1_200.0, epsilon = 1e-9);
    assert_abs_diff_eq!(polygon_area(&large), 5_200.0, epsilon = 1e-9);
}

#[test]
fn error_codes_are_stable() {
    let err = split_with_line(&square(), Point::new(1.0, 1.0), Point::new(1.0, 1.0)).unwrap_err();
    assert_eq!(err, SplitError::DegenerateLine);
    assert_eq!(err.code(), "degenerate_line");
    assert_eq!(SplitError::MultipleCrossings(4).code(), "multiple_crossings");
    assert!(SplitError::MultipleCrossings(4).to_string().contains('4'));
}
