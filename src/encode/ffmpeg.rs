use std::{
    ffi::{OsStr, OsString},
    process::{Command, Stdio},
    time::Instant,
};

use crate::{
    encode::encoder::{EncodeParams, VideoArtifact, VideoEncoder, ensure_parent_dir},
    foundation::error::{HudError, HudResult},
    render::frames::{FRAME_PATTERN, FrameSet},
};

/// Codec settings that keep the alpha channel through compositing tools.
pub const CODEC: &str = "prores_ks";
pub const PROFILE: &str = "4444";
pub const PIX_FMT: &str = "yuva444p10le";

pub fn is_ffmpeg_on_path() -> bool {
    program_on_path(OsStr::new("ffmpeg"))
}

fn program_on_path(program: &OsStr) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Encodes a numbered PNG sequence into a ProRes 4444 `.mov` with the system `ffmpeg`.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    program: OsString,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use a specific binary, e.g. a static build outside PATH.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Full argument list for one encode, program name excluded.
    pub fn args(frames: &FrameSet, params: &EncodeParams) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(20);
        args.push(if params.overwrite { "-y" } else { "-n" }.into());
        args.push("-framerate".into());
        args.push(params.fps.get().to_string().into());
        args.push("-start_number".into());
        args.push("0".into());
        args.push("-i".into());
        args.push(frames.dir.join(FRAME_PATTERN).into_os_string());
        args.push("-vf".into());
        args.push(
            format!(
                "scale={}:{},setsar=1",
                params.resolution.width, params.resolution.height
            )
            .into(),
        );
        args.extend(
            ["-c:v", CODEC, "-profile:v", PROFILE, "-pix_fmt", PIX_FMT, "-frames:v"]
                .into_iter()
                .map(OsString::from),
        );
        args.push(frames.count.to_string().into());
        args.push(params.out_path.clone().into_os_string());
        args
    }
}

impl VideoEncoder for FfmpegEncoder {
    #[tracing::instrument(skip(self, frames, params), fields(out = %params.out_path.display()))]
    fn encode(&self, frames: &FrameSet, params: &EncodeParams) -> HudResult<VideoArtifact> {
        params.validate()?;
        if frames.count == 0 {
            return Err(HudError::encode("no frames to encode"));
        }
        if !program_on_path(&self.program) {
            return Err(HudError::encode(format!(
                "'{}' not found on PATH",
                self.program.to_string_lossy()
            )));
        }
        ensure_parent_dir(&params.out_path)?;

        if !params.overwrite && params.out_path.exists() {
            return Err(HudError::encode(format!(
                "output file '{}' already exists",
                params.out_path.display()
            )));
        }

        let args = Self::args(frames, params);
        tracing::info!(
            "ffmpeg command: {} {}",
            self.program.to_string_lossy(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let started = Instant::now();
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                HudError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;
        let encode_time = started.elapsed();
        tracing::info!("ffmpeg finished in {:.1}s", encode_time.as_secs_f64());

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HudError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr_tail(&stderr, 20)
            )));
        }

        Ok(VideoArtifact {
            path: params.out_path.clone(),
            frames: frames.count,
            encode_time,
        })
    }
}

/// Last `lines` non-empty lines of ffmpeg's log; the banner at the top is noise.
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    kept[kept.len().saturating_sub(lines)..].join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
