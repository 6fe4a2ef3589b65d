use super::*;

fn two_point_series() -> FilteredSeries {
    FilteredSeries {
        offsets: vec![0.0, 10.0],
        speed: vec![10.0, 20.0],
        power: vec![100.0, 201.0],
        heart_rate: vec![120.0, 160.0],
        cadence: vec![f64::NAN, f64::NAN],
    }
}

#[test]
fn grid_has_one_more_point_than_frames() {
    let fps = Fps::new(30).unwrap();
    let grid = time_grid(10.0, fps);
    assert_eq!(grid.len(), 301);
    assert_eq!(grid[0], 0.0);
    assert_eq!(grid[150], 5.0);
    assert_eq!(grid[300], 10.0);

    for (secs, fps) in [(1.0, 1), (2.5, 24), (61.7, 60), (0.2, 30)] {
        let fps = Fps::new(fps).unwrap();
        assert_eq!(time_grid(secs, fps).len(), fps.frames_in(secs) as usize + 1);
    }
}

#[test]
fn ten_second_window_at_30_fps() {
    let out = resample(&two_point_series(), 10.0, Fps::new(30).unwrap()).unwrap();
    assert_eq!(out.len(), 301);
    assert!((out.speed[150] - 15.0).abs() < 1e-9);
    assert_eq!(out.speed[300], 20.0);
}

#[test]
fn integer_channels_truncate_toward_zero() {
    let out = resample(&two_point_series(), 10.0, Fps::new(30).unwrap()).unwrap();
    // power at t=5 is 150.5
    assert_eq!(out.power[150], Some(150));
    // heart rate at t=1/30 is 120.133..
    assert_eq!(out.heart_rate[1], Some(120));
}

#[test]
fn missing_channel_stays_missing_without_disturbing_others() {
    let out = resample(&two_point_series(), 10.0, Fps::new(30).unwrap()).unwrap();
    assert!(out.cadence.iter().all(Option::is_none));
    assert_eq!(out.power.len(), out.cadence.len());
    assert!(out.power.iter().all(Option::is_some));

    let m = out.metrics_at(FrameIndex(150)).unwrap();
    assert_eq!(m.heart_rate, Some(140));
    assert_eq!(m.cadence, None);
}

#[test]
fn window_longer_than_data_is_extrapolated() {
    let series = FilteredSeries {
        offsets: vec![2.0, 4.0],
        speed: vec![10.0, 12.0],
        power: vec![200.0, 200.0],
        heart_rate: vec![100.0, 104.0],
        cadence: vec![80.0, 80.0],
    };
    let out = resample(&series, 6.0, Fps::new(1).unwrap()).unwrap();
    assert_eq!(out.len(), 7);
    assert!((out.speed[0] - 8.0).abs() < 1e-9);
    assert!((out.speed[6] - 14.0).abs() < 1e-9);
    assert_eq!(out.heart_rate[6], Some(108));
}

#[test]
fn single_offset_cannot_be_resampled() {
    let series = FilteredSeries {
        offsets: vec![3.0, 3.0],
        speed: vec![1.0, 2.0],
        power: vec![1.0, 2.0],
        heart_rate: vec![1.0, 2.0],
        cadence: vec![1.0, 2.0],
    };
    let err = resample(&series, 10.0, Fps::new(30).unwrap()).unwrap_err();
    assert!(matches!(err, HudError::InsufficientSamples { distinct: 1 }));
}

#[test]
fn metrics_past_the_grid_are_none() {
    let out = resample(&two_point_series(), 1.0, Fps::new(2).unwrap()).unwrap();
    assert_eq!(out.len(), 3);
    assert!(out.metrics_at(FrameIndex(2)).is_some());
    assert!(out.metrics_at(FrameIndex(3)).is_none());
}

#[test]
fn sample_at_matches_grid_point() {
    let series = two_point_series();
    let grid = resample(&series, 10.0, Fps::new(30).unwrap()).unwrap();
    let m = sample_at(&series, 5.0).unwrap();
    assert_eq!(Some(m), grid.metrics_at(FrameIndex(150)));
    assert_eq!(m.power, Some(150));
    assert_eq!(m.cadence, None);

    assert!(sample_at(&series, f64::NAN).is_err());
}
