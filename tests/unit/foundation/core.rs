use super::*;

use chrono::TimeZone as _;

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 9, h, m, s).unwrap()
}

#[test]
fn window_bounds_are_inclusive() {
    let w = TimeWindow::new(at(11, 29, 45), at(11, 29, 55)).unwrap();
    assert!(w.contains(at(11, 29, 45)));
    assert!(w.contains(at(11, 29, 55)));
    assert!(!w.contains(at(11, 29, 44)));
    assert!(!w.contains(at(11, 29, 56)));
    assert_eq!(w.duration_secs(), 10.0);
    assert_eq!(w.offset_secs(at(11, 29, 50)), 5.0);
    assert_eq!(w.offset_secs(at(11, 29, 40)), -5.0);
}

#[test]
fn window_rejects_reversed_bounds() {
    assert!(TimeWindow::new(at(12, 0, 0), at(11, 0, 0)).is_err());
    assert!(TimeWindow::new(at(12, 0, 0), at(12, 0, 0)).is_ok());
}

#[test]
fn fps_frame_and_grid_counts() {
    let fps = Fps::new(30).unwrap();
    assert_eq!(fps.frames_in(10.0), 300);
    assert_eq!(fps.grid_len(10.0), 301);
    assert_eq!(fps.frames_in(2170.0), 65_100);
    assert_eq!(fps.frames_in(0.5), 15);
    assert_eq!(fps.frames_in(0.01), 0);
    assert!(Fps::new(0).is_err());
}

#[test]
fn parse_utc_accepts_rfc3339_and_naive() {
    let expected = at(11, 29, 45);
    assert_eq!(parse_utc("2025-12-09T11:29:45Z").unwrap(), expected);
    assert_eq!(parse_utc("2025-12-09T12:29:45+01:00").unwrap(), expected);
    assert_eq!(parse_utc("2025-12-09 11:29:45").unwrap(), expected);
    assert_eq!(parse_utc("2025-12-09T11:29:45").unwrap(), expected);
    assert!(parse_utc("yesterday").is_err());
}

#[test]
fn window_deserializes_from_strings() {
    let w: TimeWindow = serde_json::from_str(
        r#"{"start": "2025-12-09 11:29:45", "end": "2025-12-09T12:05:55Z"}"#,
    )
    .unwrap();
    assert_eq!(w.start, at(11, 29, 45));
    assert_eq!(w.end, at(12, 5, 55));
    assert_eq!(w.duration_secs(), 2170.0);
}
