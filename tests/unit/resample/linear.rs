use super::*;

#[test]
fn interpolates_between_knots() {
    let xs = [0.0, 10.0];
    let ys = [10.0, 20.0];
    let f = LinearInterp::new(&xs, &ys).unwrap();
    assert_eq!(f.eval(0.0), 10.0);
    assert!((f.eval(5.0) - 15.0).abs() < 1e-12);
    assert_eq!(f.eval(10.0), 20.0);
}

#[test]
fn extrapolates_instead_of_clamping() {
    let xs = [2.0, 4.0, 6.0];
    let ys = [1.0, 3.0, 4.0];
    let f = LinearInterp::new(&xs, &ys).unwrap();
    // Left edge extends the first segment (slope 1).
    assert!((f.eval(0.0) - -1.0).abs() < 1e-12);
    // Right edge extends the last segment (slope 0.5).
    assert!((f.eval(10.0) - 6.0).abs() < 1e-12);
}

#[test]
fn repeated_edge_knots_keep_a_finite_slope() {
    let xs = [0.0, 0.0, 1.0, 2.0, 2.0];
    let ys = [5.0, 7.0, 9.0, 11.0, 13.0];
    let f = LinearInterp::new(&xs, &ys).unwrap();
    assert!(f.eval(-1.0).is_finite());
    assert!(f.eval(3.0).is_finite());
    assert!(f.eval(0.5).is_finite());
    assert!((f.eval(1.5) - 10.0).abs() < 1e-12);
}

#[test]
fn nan_values_propagate_without_panicking() {
    let xs = [0.0, 1.0, 2.0];
    let ys = [f64::NAN, f64::NAN, f64::NAN];
    let f = LinearInterp::new(&xs, &ys).unwrap();
    assert!(f.eval(0.5).is_nan());
    assert!(f.eval(5.0).is_nan());
}

#[test]
fn needs_two_distinct_knots() {
    assert!(matches!(
        LinearInterp::new(&[], &[]),
        Err(HudError::InsufficientSamples { distinct: 0 })
    ));
    assert!(matches!(
        LinearInterp::new(&[3.0, 3.0], &[1.0, 2.0]),
        Err(HudError::InsufficientSamples { distinct: 1 })
    ));
    assert!(LinearInterp::new(&[0.0, 1.0], &[1.0]).is_err());
}
