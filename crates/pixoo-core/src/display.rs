//! The display sink abstraction and an in-memory frame buffer.
//!
//! Simulations draw into a [`DisplaySink`] and then `push` the finished
//! frame. Pixel `(x, y)` lives at byte offset `(x + y * size) * 3` in
//! `[r, g, b]` order, which is the layout the device expects.

use std::future::Future;

use pixoo_types::Rgb;

/// Errors raised while delivering a frame.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// The request could not be sent or the connection failed.
    #[error("display transport failed: {message}")]
    Transport {
        /// What went wrong.
        message: String,
    },

    /// The display answered with something other than success.
    #[error("display rejected {command}: {message}")]
    Protocol {
        /// The command that was rejected.
        command: String,
        /// The reported problem.
        message: String,
    },

    /// The configured address is not usable for this target.
    #[error("invalid display address: {address}")]
    InvalidAddress {
        /// The offending address.
        address: String,
    },
}

/// A 64x64-style pixel target.
pub trait DisplaySink {
    /// Fill the whole frame with `color`.
    fn clear(&mut self, color: Rgb);

    /// Set one pixel. Coordinates outside the frame are ignored.
    fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb);

    /// Deliver the current frame.
    fn push(&mut self) -> impl Future<Output = Result<(), DisplayError>> + Send;
}

/// A square RGB frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    size: usize,
    bytes: Vec<u8>,
}

impl FrameBuffer {
    /// An all-black frame of edge length `size`.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            bytes: vec![0; size.saturating_mul(size).saturating_mul(3)],
        }
    }

    /// Edge length.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Raw `[r, g, b, r, g, b, ...]` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgb) {
        for pixel in self.bytes.chunks_exact_mut(3) {
            pixel.copy_from_slice(&color.to_array());
        }
    }

    /// Set the pixel at `(x, y)`; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i64, y: i64, color: Rgb) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        if let Some(pixel) = self.bytes.get_mut(offset..offset.saturating_add(3)) {
            pixel.copy_from_slice(&color.to_array());
        }
    }

    /// The pixel at `(x, y)`, if in range.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgb> {
        let offset = self.offset(x, y)?;
        match self.bytes.get(offset..offset.saturating_add(3))? {
            &[r, g, b] => Some(Rgb(r, g, b)),
            _ => None,
        }
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.size || y >= self.size {
            return None;
        }
        y.checked_mul(self.size)?.checked_add(x)?.checked_mul(3)
    }
}

/// A sink that keeps frames in memory.
///
/// Used for the headless target and in tests. It can be told to fail after
/// a number of successful pushes.
#[derive(Debug, Clone)]
pub struct MemorySink {
    frame: FrameBuffer,
    pushed: Vec<FrameBuffer>,
    keep_history: bool,
    pushes: u64,
    fail_after: Option<u64>,
}

impl MemorySink {
    /// A sink that only counts pushes.
    pub fn new(size: usize) -> Self {
        Self {
            frame: FrameBuffer::new(size),
            pushed: Vec::new(),
            keep_history: false,
            pushes: 0,
            fail_after: None,
        }
    }

    /// Also keep a copy of every pushed frame.
    #[must_use]
    pub const fn with_history(mut self) -> Self {
        self.keep_history = true;
        self
    }

    /// Fail every push after the first `successes`.
    #[must_use]
    pub const fn failing_after(mut self, successes: u64) -> Self {
        self.fail_after = Some(successes);
        self
    }

    /// The frame being drawn.
    pub const fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Frames pushed so far, if history is kept.
    pub fn history(&self) -> &[FrameBuffer] {
        &self.pushed
    }

    /// Successful pushes so far.
    pub const fn pushes(&self) -> u64 {
        self.pushes
    }
}

impl DisplaySink for MemorySink {
    fn clear(&mut self, color: Rgb) {
        self.frame.clear(color);
    }

    fn draw_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        self.frame.set(x, y, color);
    }

    fn push(&mut self) -> impl Future<Output = Result<(), DisplayError>> + Send {
        let result = if self.fail_after.is_some_and(|limit| self.pushes >= limit) {
            Err(DisplayError::Transport {
                message: String::from("memory sink configured to fail"),
            })
        } else {
            self.pushes = self.pushes.saturating_add(1);
            if self.keep_history {
                self.pushed.push(self.frame.clone());
            }
            Ok(())
        };
        std::future::ready(result)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;

    #[test]
    fn pixel_layout_is_x_plus_y_times_size() {
        let mut frame = FrameBuffer::new(4);
        frame.set(1, 2, Rgb(10, 20, 30));
        let offset = (1 + 2 * 4) * 3;
        assert_eq!(&frame.as_bytes()[offset..offset + 3], &[10, 20, 30]);
        assert_eq!(frame.get(1, 2), Some(Rgb(10, 20, 30)));
    }

    #[test]
    fn out_of_range_pixels_are_ignored() {
        let mut frame = FrameBuffer::new(4);
        frame.set(-1, 0, Rgb(1, 1, 1));
        frame.set(0, 4, Rgb(1, 1, 1));
        frame.set(64, 64, Rgb(1, 1, 1));
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(frame.get(4, 0), None);
        assert_eq!(frame.get(i64::MAX, i64::MAX), None);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut frame = FrameBuffer::new(3);
        frame.clear(Rgb(5, 6, 7));
        assert_eq!(frame.as_bytes().len(), 27);
        assert!(frame.as_bytes().chunks(3).all(|p| p == [5, 6, 7]));
    }

    #[tokio::test]
    async fn memory_sink_records_and_fails_on_demand() {
        let mut sink = MemorySink::new(2).with_history().failing_after(1);
        sink.draw_pixel(1, 1, Rgb(9, 9, 9));
        sink.push().await.unwrap();
        assert!(sink.push().await.is_err());
        assert_eq!(sink.pushes(), 1);
        assert_eq!(sink.history().len(), 1);
        assert_eq!(sink.history()[0].get(1, 1), Some(Rgb(9, 9, 9)));
    }
}
