use std::num::NonZeroUsize;

use lru::LruCache;

use super::{FrameSource, RgbImage, VideoError, VideoInfo};

/// Keeps the most recently decoded frames of an inner source.
///
/// Scrubbing back and forth over a few frames is the common case while
/// marking a boundary, and each decode spawns a process.
pub struct CachedSource<S> {
    inner: S,
    frames: LruCache<u64, RgbImage>,
}

impl<S: FrameSource> CachedSource<S> {
    pub fn new(inner: S, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        CachedSource {
            inner,
            frames: LruCache::new(cap),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: FrameSource> FrameSource for CachedSource<S> {
    fn info(&self) -> &VideoInfo {
        self.inner.info()
    }

    fn frame(&mut self, index: u64) -> Result<RgbImage, VideoError> {
        if let Some(image) = self.frames.get(&index) {
            return Ok(image.clone());
        }
        let image = self.inner.frame(index)?;
        self.frames.put(index, image.clone());
        Ok(image)
    }
}
