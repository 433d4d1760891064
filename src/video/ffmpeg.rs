use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use super::{FrameSource, RgbImage, VideoError, VideoInfo};
use crate::model::config::VideoConfig;

/// Frame source backed by the `ffprobe` and `ffmpeg` executables.
///
/// Metadata is probed once on open. Each frame is decoded by a separate
/// `ffmpeg` run that seeks to the frame's timestamp and writes one raw
/// RGB24 picture, scaled to the preview size, to stdout.
pub struct FfmpegSource {
    path: PathBuf,
    ffmpeg: String,
    info: VideoInfo,
    preview_width: u32,
    preview_height: u32,
}

// ---------------------------------------------------------------------------
// Probe output
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    nb_frames: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

/// Parse an ffprobe rational like "30000/1001". "0/0" means unknown.
fn parse_rate(rate: &str) -> Option<f64> {
    let (num, den) = match rate.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (rate.trim().parse::<f64>().ok()?, 1.0),
    };
    let fps = num / den;
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Turn `ffprobe -show_streams -show_format -of json` output into video info.
pub(crate) fn parse_probe(json: &[u8], path: &Path) -> Result<VideoInfo, VideoError> {
    let probe_error = |message: String| VideoError::Probe {
        path: path.to_path_buf(),
        message,
    };
    let probe: ProbeOutput =
        serde_json::from_slice(json).map_err(|e| probe_error(format!("bad ffprobe output: {e}")))?;
    let stream = probe
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| probe_error("no video stream".into()))?;

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate))
        .ok_or_else(|| probe_error("unknown frame rate".into()))?;
    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(probe_error("unknown frame size".into())),
    };

    let duration = stream
        .duration
        .as_deref()
        .or(probe.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|d| d.parse::<f64>().ok());
    let frame_count = stream
        .nb_frames
        .as_deref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .or_else(|| duration.map(|d| (d * fps).round() as u64))
        .unwrap_or(0);
    if frame_count == 0 {
        return Err(VideoError::NoFrames(path.to_path_buf()));
    }

    Ok(VideoInfo {
        fps,
        frame_count,
        width,
        height,
    })
}

/// Preview size keeping the aspect ratio; height is rounded to an even
/// number since each terminal cell shows two pixel rows.
pub(crate) fn preview_size(info: &VideoInfo, max_width: u32) -> (u32, u32) {
    let width = max_width.min(info.width).max(2);
    let height = (width as f64 * info.height as f64 / info.width as f64).round() as u32;
    let height = (height + 1) / 2 * 2;
    (width, height.max(2))
}

/// Seek position for `index`. Half a frame early so that rounding never
/// lands on the following frame.
fn seek_seconds(index: u64, fps: f64) -> f64 {
    ((index as f64 - 0.5) / fps).max(0.0)
}

impl FfmpegSource {
    /// Probe `path` and prepare to decode previews of at most
    /// `config.preview_width` pixels wide.
    pub fn open(path: &Path, config: &VideoConfig) -> Result<Self, VideoError> {
        if !path.is_file() {
            return Err(VideoError::NotFound(path.to_path_buf()));
        }
        let output = Command::new(&config.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_streams",
                "-show_format",
                "-of",
                "json",
            ])
            .arg(path)
            .output()
            .map_err(|e| VideoError::Spawn {
                program: config.ffprobe.clone(),
                source: e,
            })?;
        if !output.status.success() {
            return Err(VideoError::Probe {
                path: path.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let info = parse_probe(&output.stdout, path)?;
        let (preview_width, preview_height) = preview_size(&info, config.preview_width);
        tracing::info!(
            video = %path.display(),
            fps = info.fps,
            frames = info.frame_count,
            width = info.width,
            height = info.height,
            "video opened"
        );

        Ok(FfmpegSource {
            path: path.to_path_buf(),
            ffmpeg: config.ffmpeg.clone(),
            info,
            preview_width,
            preview_height,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn frame(&mut self, index: u64) -> Result<RgbImage, VideoError> {
        let seek = format!("{:.6}", seek_seconds(index, self.info.fps));
        let scale = format!("scale={}:{}", self.preview_width, self.preview_height);
        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-nostdin", "-ss", &seek, "-i"])
            .arg(&self.path)
            .args([
                "-frames:v",
                "1",
                "-vf",
                &scale,
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "-",
            ])
            .output()
            .map_err(|e| VideoError::Spawn {
                program: self.ffmpeg.clone(),
                source: e,
            })?;

        let expected = self.preview_width as usize * self.preview_height as usize * 3;
        if !output.status.success() || output.stdout.len() < expected {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VideoError::Decode {
                index,
                message: if stderr.is_empty() {
                    format!("got {} of {} bytes", output.stdout.len(), expected)
                } else {
                    stderr
                },
            });
        }

        let mut pixels = output.stdout;
        pixels.truncate(expected);
        Ok(RgbImage::new(
            self.preview_width,
            self.preview_height,
            pixels,
        ))
    }
}
