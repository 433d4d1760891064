pub mod cache;
pub mod ffmpeg;

use std::path::PathBuf;

pub use cache::CachedSource;
pub use ffmpeg::FfmpegSource;

/// Error type for frame sources
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("video file '{}' not found", .0.display())]
    NotFound(PathBuf),
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("could not probe {}: {message}", .path.display())]
    Probe { path: PathBuf, message: String },
    #[error("{} has no decodable frames", .0.display())]
    NoFrames(PathBuf),
    #[error("could not decode frame {index}: {message}")]
    Decode { index: u64, message: String },
}

/// Static properties of an opened video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub fps: f64,
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
}

impl VideoInfo {
    pub fn last_frame(&self) -> u64 {
        self.frame_count.saturating_sub(1)
    }
}

/// A decoded frame, packed RGB, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 3);
        RgbImage {
            width,
            height,
            pixels,
        }
    }

    /// A single-colour image
    pub fn filled(width: u32, height: u32, rgb: (u8, u8, u8)) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for _ in 0..width as usize * height as usize {
            pixels.extend_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        RgbImage::new(width, height, pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        (self.pixels[i], self.pixels[i + 1], self.pixels[i + 2])
    }
}

/// Random-access frame decoding.
///
/// Reads block the calling thread; the annotation loops only ask for a
/// frame after the operator moved the cursor.
pub trait FrameSource {
    fn info(&self) -> &VideoInfo;

    fn frame(&mut self, index: u64) -> Result<RgbImage, VideoError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_image_pixels() {
        let img = RgbImage::filled(3, 2, (1, 2, 3));
        assert_eq!(img.pixels.len(), 18);
        assert_eq!(img.pixel(2, 1), (1, 2, 3));
    }

    #[test]
    fn last_frame_of_empty_video_is_zero() {
        let info = VideoInfo {
            fps: 30.0,
            frame_count: 0,
            width: 1,
            height: 1,
        };
        assert_eq!(info.last_frame(), 0);
    }
}
