use chrono::{FixedOffset, TimeZone, Utc};

use super::*;
use crate::foundation::core::Fps;

#[test]
fn video_name_uses_generation_timestamp() {
    let at = Utc.with_ymd_and_hms(2025, 12, 9, 19, 1, 2).unwrap();
    assert_eq!(video_file_name(&at), "hud_overlay_alpha_20251209_190102.mov");

    // Local wall-clock fields are used as-is, whatever the offset.
    let tz = FixedOffset::east_opt(8 * 3600).unwrap();
    let at = tz.with_ymd_and_hms(2025, 12, 10, 3, 1, 2).unwrap();
    assert_eq!(video_file_name(&at), "hud_overlay_alpha_20251210_030102.mov");
}

#[test]
fn parent_dir_is_created_only_when_named() {
    let root = PathBuf::from("target").join("unit_encoder_parent");
    let _ = std::fs::remove_dir_all(&root);

    ensure_parent_dir(Path::new("bare.mov")).unwrap();
    ensure_parent_dir(&root.join("a").join("b").join("out.mov")).unwrap();
    assert!(root.join("a").join("b").is_dir());
}

#[test]
fn recording_encoder_captures_calls() {
    let root = PathBuf::from("target").join("unit_encoder_recording");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("frame_000000.png"), b"x").unwrap();

    let frames = FrameSet {
        dir: root.clone(),
        count: 1,
        elapsed: Duration::ZERO,
    };
    let params = EncodeParams {
        fps: Fps::new(30).unwrap(),
        resolution: Resolution {
            width: 480,
            height: 270,
        },
        out_path: root.join("out").join("hud.mov"),
        overwrite: true,
    };

    let enc = RecordingEncoder::new();
    let artifact = enc.encode(&frames, &params).unwrap();
    assert_eq!(artifact.frames, 1);
    assert!(artifact.path.exists());

    let calls = enc.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].files_on_disk, 1);
    assert_eq!(calls[0].params, params);

    let err = RecordingEncoder::failing("boom")
        .encode(&frames, &params)
        .unwrap_err();
    assert!(matches!(err, HudError::Encode(ref m) if m == "boom"));
}
