//! Episode download, transcoding, and duration probing.
//!
//! Transcoding and probing shell out to `ffmpeg`/`ffprobe`; both are located
//! on `PATH` up front so a missing tool fails before any work starts.
use anyhow::{anyhow, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;

/// Encoder settings matching the format of vanilla records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioSettings {
    /// Vorbis `-qscale:a` value.
    pub quality: u8,
    pub sample_rate: u32,
    pub channels: u8,
    /// Apply ffmpeg's `loudnorm` filter.
    pub normalize: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quality: 2,
            sample_rate: 44_100,
            channels: 1,
            normalize: false,
        }
    }
}

/// Stream `url` to `dest`, replacing it only once the download completes.
pub fn download(agent: &ureq::Agent, user_agent: &str, url: &str, dest: &Path) -> Result<PathBuf> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let start = Instant::now();
    let response = agent
        .get(url)
        .header("User-Agent", user_agent)
        .call()
        .with_context(|| format!("GET {url}"))?;
    let mut reader = response.into_body().into_reader();
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    let bytes = io::copy(&mut reader, &mut tmp).with_context(|| format!("download {url}"))?;
    tmp.persist(dest)
        .with_context(|| format!("write {}", dest.display()))?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis(),
        bytes,
        path = %dest.display(),
        "episode downloaded"
    );
    Ok(dest.to_path_buf())
}

/// Build the ffmpeg argument list for an mp3 -> ogg vorbis re-encode.
pub fn ffmpeg_args(input: &Path, output: &Path, settings: &AudioSettings) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into(), "-vn".into()];
    for (flag, value) in [
        ("-codec:a", "libvorbis".to_string()),
        ("-qscale:a", settings.quality.to_string()),
        ("-ar", settings.sample_rate.to_string()),
        ("-ac", settings.channels.to_string()),
    ] {
        args.push(flag.into());
        args.push(value.into());
    }
    if settings.normalize {
        args.push("-af".into());
        args.push("loudnorm".into());
    }
    args.push(output.into());
    args
}

/// Re-encode `input` into `output` with ffmpeg.
pub fn transcode(input: &Path, output: &Path, settings: &AudioSettings) -> Result<PathBuf> {
    let ffmpeg = which::which("ffmpeg").context("locate ffmpeg on PATH")?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        quality = settings.quality,
        sample_rate = settings.sample_rate,
        normalize = settings.normalize,
        "transcoding episode"
    );
    let start = Instant::now();
    let result = Command::new(ffmpeg)
        .args(ffmpeg_args(input, output, settings))
        .output()
        .context("run ffmpeg")?;
    if !result.status.success() {
        return Err(anyhow!("ffmpeg failed: {}", stderr_tail(&result)));
    }
    tracing::info!(elapsed_ms = start.elapsed().as_millis(), "transcode complete");
    Ok(output.to_path_buf())
}

/// Return the duration of `path` in whole seconds, rounded up.
pub fn probe_duration(path: &Path) -> Result<u64> {
    let ffprobe = which::which("ffprobe").context("locate ffprobe on PATH")?;
    let result = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .context("run ffprobe")?;
    if !result.status.success() {
        return Err(anyhow!("ffprobe failed: {}", stderr_tail(&result)));
    }
    let text = String::from_utf8_lossy(&result.stdout);
    parse_duration_secs(&text).with_context(|| format!("duration of {}", path.display()))
}

/// Parse an ffprobe duration and round it up to whole seconds.
pub fn parse_duration_secs(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let seconds: f64 = trimmed
        .parse()
        .map_err(|_| anyhow!("unparseable duration {trimmed:?}"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(anyhow!("invalid duration {trimmed:?}"));
    }
    Ok(seconds.ceil() as u64)
}

fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr.trim().lines().last().unwrap_or_default().to_string();
    if line.is_empty() {
        format!("status {}", output.status)
    } else {
        line
    }
}
