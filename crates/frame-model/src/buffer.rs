//! Frame buffers: ordered sequences of same-shaped scalar grids.
//!
//! Images are stored as `frames x height x width x channels`, masks as
//! `frames x height x width` (one channel). Values are row-major `f32`.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Shape of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl FrameShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Single-channel shape used for masks.
    pub fn mask(height: usize, width: usize) -> Self {
        Self::new(height, width, 1)
    }

    /// Scalars per frame.
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(height, width)`.
    pub fn resolution(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// `WxH`, matching how resolutions are usually written.
    pub fn resolution_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    /// Same resolution with a different channel count.
    pub fn with_channels(&self, channels: usize) -> Self {
        Self::new(self.height, self.width, channels)
    }
}

impl fmt::Display for FrameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Errors raised while constructing a buffer from raw data.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Buffer data has {actual} values, expected {expected} ({frames} frames of {shape})")]
    DataLength {
        frames: usize,
        shape: FrameShape,
        expected: usize,
        actual: usize,
    },
}

/// An owned sequence of frames sharing one [`FrameShape`].
///
/// Cloning deep-copies the storage, so edits on a clone are never observed
/// through the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameBuffer {
    shape: FrameShape,
    frames: usize,
    data: Vec<f32>,
}

impl FrameBuffer {
    /// Wrap raw row-major data.
    pub fn from_vec(frames: usize, shape: FrameShape, data: Vec<f32>) -> Result<Self, BufferError> {
        let expected = frames * shape.len();
        if data.len() != expected {
            return Err(BufferError::DataLength {
                frames,
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape,
            frames,
            data,
        })
    }

    /// A buffer with every scalar set to `value`.
    pub fn filled(frames: usize, shape: FrameShape, value: f32) -> Self {
        Self {
            shape,
            frames,
            data: vec![value; frames * shape.len()],
        }
    }

    pub fn zeros(frames: usize, shape: FrameShape) -> Self {
        Self::filled(frames, shape, 0.0)
    }

    pub fn ones(frames: usize, shape: FrameShape) -> Self {
        Self::filled(frames, shape, 1.0)
    }

    /// Build a buffer frame-by-frame from a generator.
    pub fn from_fn(frames: usize, shape: FrameShape, mut f: impl FnMut(usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(frames * shape.len());
        for frame in 0..frames {
            let value = f(frame);
            data.extend(std::iter::repeat(value).take(shape.len()));
        }
        Self {
            shape,
            frames,
            data,
        }
    }

    /// Number of frames along the frame axis.
    pub fn len(&self) -> usize {
        self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    pub fn shape(&self) -> FrameShape {
        self.shape
    }

    /// Whether this is a single-channel (mask) buffer.
    pub fn is_mask(&self) -> bool {
        self.shape.channels == 1
    }

    /// Raw row-major data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn frame_span(&self, index: usize) -> Range<usize> {
        let len = self.shape.len();
        index * len..(index + 1) * len
    }

    /// Borrow one frame's payload.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        (index < self.frames).then(|| &self.data[self.frame_span(index)])
    }

    /// Iterate over frame payloads in order. Always yields [`len`](Self::len)
    /// items, empty ones for a zero-sized shape.
    pub fn frames(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.frames).map(move |i| &self.data[self.frame_span(i)])
    }

    /// Set every scalar of frame `index` to `value`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn fill_frame(&mut self, index: usize, value: f32) {
        assert!(index < self.frames, "frame {index} out of bounds");
        let span = self.frame_span(index);
        self.data[span].fill(value);
    }

    /// Overwrite frame `index` with `payload`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds or `payload` has the wrong length.
    pub fn write_frame(&mut self, index: usize, payload: &[f32]) {
        assert!(index < self.frames, "frame {index} out of bounds");
        let span = self.frame_span(index);
        self.data[span].copy_from_slice(payload);
    }

    /// Overwrite frames `[start, start + source.len())` with `source`.
    ///
    /// # Panics
    /// Panics if the shapes differ or the range runs past the end.
    pub fn write_range(&mut self, start: usize, source: &FrameBuffer) {
        assert_eq!(self.shape, source.shape, "write_range shape mismatch");
        assert!(
            start + source.frames <= self.frames,
            "write_range {start}+{} past end {}",
            source.frames,
            self.frames
        );
        let len = self.shape.len();
        self.data[start * len..(start + source.frames) * len].copy_from_slice(&source.data);
    }

    /// Append `count` frames filled with `value`.
    pub fn extend_filled(&mut self, count: usize, value: f32) {
        self.data
            .extend(std::iter::repeat(value).take(count * self.shape.len()));
        self.frames += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, shape: FrameShape) -> FrameBuffer {
        FrameBuffer::from_fn(frames, shape, |i| i as f32)
    }

    #[test]
    fn test_from_vec_checks_length() {
        let shape = FrameShape::new(2, 2, 3);
        assert!(FrameBuffer::from_vec(2, shape, vec![0.0; 24]).is_ok());
        let err = FrameBuffer::from_vec(2, shape, vec![0.0; 23]).unwrap_err();
        assert!(matches!(
            err,
            BufferError::DataLength {
                expected: 24,
                actual: 23,
                ..
            }
        ));
    }

    #[test]
    fn test_frame_access() {
        let buf = ramp(3, FrameShape::mask(2, 2));
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.frame(1), Some(&[1.0, 1.0, 1.0, 1.0][..]));
        assert_eq!(buf.frame(3), None);
        assert_eq!(buf.frames().count(), 3);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = ramp(2, FrameShape::mask(1, 2));
        let mut copy = original.clone();
        copy.fill_frame(0, 9.0);
        assert_eq!(original.frame(0), Some(&[0.0, 0.0][..]));
        assert_eq!(copy.frame(0), Some(&[9.0, 9.0][..]));
    }

    #[test]
    fn test_write_range() {
        let shape = FrameShape::mask(1, 1);
        let mut base = FrameBuffer::zeros(5, shape);
        let overlay = ramp(2, shape);
        base.write_range(3, &overlay);
        assert_eq!(base.as_slice(), &[0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_sized_frames_still_count() {
        let buf = FrameBuffer::zeros(4, FrameShape::new(0, 3, 3));
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.frames().count(), 4);
        assert!(buf.frames().all(|f| f.is_empty()));
        assert_eq!(buf.frame(3), Some(&[][..]));
    }

    #[test]
    fn test_extend_filled() {
        let shape = FrameShape::new(1, 1, 3);
        let mut buf = FrameBuffer::ones(1, shape);
        buf.extend_filled(2, 0.5);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.frame(2), Some(&[0.5, 0.5, 0.5][..]));
    }

    #[test]
    fn test_shape_labels() {
        let shape = FrameShape::new(480, 640, 3);
        assert_eq!(shape.resolution_label(), "640x480");
        assert_eq!(shape.to_string(), "640x480x3");
        assert_eq!(shape.with_channels(1), FrameShape::mask(480, 640));
    }

    #[test]
    fn test_shape_serialization() {
        let json = serde_json::to_string(&FrameShape::mask(4, 8)).unwrap();
        assert_eq!(json, r#"{"height":4,"width":8,"channels":1}"#);
    }
}
