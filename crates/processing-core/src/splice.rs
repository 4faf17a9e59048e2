//! Video splicing: overlay one sequence onto another at a frame offset.
//!
//! ```text
//! primary: [A0, A1, A2, A3, A4]
//! overlay: [B0, B1, B2, B3] at offset 3
//! result:  [A0, A1, A2, B0, B1, B2, B3]   (7 frames)
//! ```
//!
//! Frames past the end of the primary sequence that the overlay does not
//! cover are neutral grey. Masks use presence semantics: a gap frame is 1.0,
//! a frame with content takes the matching input mask, or 0.0 when that
//! sequence came without one.

use std::ops::Range;

use vace_common::{EditError, EditResult, ShapeAspect, MAX_FRAME_OFFSET};
use vace_frame_model::{FrameBuffer, FrameShape};

use crate::fill::{GREY_VALUE, MASK_BLACK, MASK_WHITE};

/// Splice parameters.
#[derive(Debug, Clone)]
pub struct VideoSplice {
    /// First output frame covered by the overlay sequence.
    pub frame_offset: i64,
    /// Largest accepted offset, at most [`MAX_FRAME_OFFSET`].
    pub max_offset: usize,
    /// Value written to every channel of a gap frame.
    pub gap_value: f32,
}

impl Default for VideoSplice {
    fn default() -> Self {
        Self {
            frame_offset: 0,
            max_offset: MAX_FRAME_OFFSET,
            gap_value: GREY_VALUE,
        }
    }
}

/// Result of a splice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpliceOutput {
    pub images: FrameBuffer,
    pub masks: FrameBuffer,
    pub frame_count: usize,
}

/// How the two sequences map onto the output timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceTimeline {
    pub primary_len: usize,
    pub overlay_len: usize,
    pub offset: usize,
}

impl SpliceTimeline {
    pub fn new(primary_len: usize, overlay_len: usize, offset: usize) -> Self {
        Self {
            primary_len,
            overlay_len,
            offset,
        }
    }

    /// Output length: `max(primary, offset + overlay)`.
    pub fn total(&self) -> usize {
        self.primary_len.max(self.offset + self.overlay_len)
    }

    /// Output frames taken from the overlay.
    pub fn overlay_range(&self) -> Range<usize> {
        self.offset..self.offset + self.overlay_len
    }

    /// Output frames covered by neither sequence.
    pub fn gap_frames(&self) -> Vec<usize> {
        let overlay = self.overlay_range();
        (self.primary_len..self.total())
            .filter(|i| !overlay.contains(i))
            .collect()
    }
}

impl VideoSplice {
    pub fn new(frame_offset: i64) -> Self {
        Self {
            frame_offset,
            ..Default::default()
        }
    }

    /// Splice `overlay` onto `primary`.
    pub fn apply(
        &self,
        primary: &FrameBuffer,
        overlay: &FrameBuffer,
        primary_mask: Option<&FrameBuffer>,
        overlay_mask: Option<&FrameBuffer>,
    ) -> EditResult<SpliceOutput> {
        let offset = self.validate_offset()?;
        validate_sequences(primary, overlay)?;

        let shape = primary.shape();
        if let Some(mask) = primary_mask {
            validate_mask(mask, primary, "mask1", "imagesequence1")?;
        }
        if let Some(mask) = overlay_mask {
            validate_mask(mask, overlay, "mask2", "imagesequence2")?;
        }

        let timeline = SpliceTimeline::new(primary.len(), overlay.len(), offset);
        let total = timeline.total();
        tracing::debug!(
            primary = timeline.primary_len,
            overlay = timeline.overlay_len,
            offset,
            total,
            gaps = timeline.gap_frames().len(),
            "Splicing sequences"
        );

        let images = build_images(primary, overlay, &timeline, self.gap_value);
        let masks = build_masks(
            shape.with_channels(1),
            primary_mask,
            overlay_mask,
            &timeline,
        );

        Ok(SpliceOutput {
            images,
            masks,
            frame_count: total,
        })
    }

    fn validate_offset(&self) -> EditResult<usize> {
        let max = self.max_offset.min(MAX_FRAME_OFFSET);
        if self.frame_offset < 0 || self.frame_offset > max as i64 {
            return Err(EditError::OffsetRange {
                offset: self.frame_offset,
                max,
            });
        }
        Ok(self.frame_offset as usize)
    }
}

fn validate_sequences(primary: &FrameBuffer, overlay: &FrameBuffer) -> EditResult<()> {
    let (a, b) = (primary.shape(), overlay.shape());
    if a.resolution() != b.resolution() {
        return Err(EditError::shape_mismatch(
            "imagesequence2",
            "imagesequence1",
            ShapeAspect::Resolution,
            a.resolution_label(),
            b.resolution_label(),
        ));
    }
    if a.channels != b.channels {
        return Err(EditError::shape_mismatch(
            "imagesequence2",
            "imagesequence1",
            ShapeAspect::Channels,
            a.channels,
            b.channels,
        ));
    }
    Ok(())
}

fn validate_mask(
    mask: &FrameBuffer,
    sequence: &FrameBuffer,
    mask_name: &str,
    sequence_name: &str,
) -> EditResult<()> {
    let (expected, actual) = (sequence.shape(), mask.shape());
    if !mask.is_mask() {
        return Err(EditError::shape_mismatch(
            mask_name,
            "single-channel mask",
            ShapeAspect::Channels,
            1,
            actual.channels,
        ));
    }
    if mask.len() != sequence.len() {
        return Err(EditError::count_mismatch(
            format!("{mask_name} frame"),
            format!("{sequence_name} frame count"),
            sequence.len(),
            mask.len(),
        ));
    }
    if actual.resolution() != expected.resolution() {
        return Err(EditError::shape_mismatch(
            mask_name,
            sequence_name,
            ShapeAspect::Resolution,
            expected.resolution_label(),
            actual.resolution_label(),
        ));
    }
    Ok(())
}

/// Primary extended with gap frames, then the overlay written over its range.
fn build_images(
    primary: &FrameBuffer,
    overlay: &FrameBuffer,
    timeline: &SpliceTimeline,
    gap_value: f32,
) -> FrameBuffer {
    let mut images = primary.clone();
    images.extend_filled(timeline.total() - timeline.primary_len, gap_value);
    images.write_range(timeline.offset, overlay);
    images
}

/// White canvas, primary content, then overlay content.
fn build_masks(
    shape: FrameShape,
    primary_mask: Option<&FrameBuffer>,
    overlay_mask: Option<&FrameBuffer>,
    timeline: &SpliceTimeline,
) -> FrameBuffer {
    let mut masks = FrameBuffer::filled(timeline.total(), shape, MASK_WHITE);

    match primary_mask {
        Some(mask) => masks.write_range(0, mask),
        None => (0..timeline.primary_len).for_each(|i| masks.fill_frame(i, MASK_BLACK)),
    }
    match overlay_mask {
        Some(mask) => masks.write_range(timeline.offset, mask),
        None => timeline
            .overlay_range()
            .for_each(|i| masks.fill_frame(i, MASK_BLACK)),
    }

    masks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: FrameShape = FrameShape {
        height: 2,
        width: 3,
        channels: 3,
    };

    fn seq(frames: usize, base: f32) -> FrameBuffer {
        FrameBuffer::from_fn(frames, SHAPE, |i| base + i as f32 / 100.0)
    }

    fn mask_values(masks: &FrameBuffer) -> Vec<f32> {
        masks.frames().map(|f| f[0]).collect()
    }

    #[test]
    fn test_overlay_replaces_tail_of_primary() {
        let primary = seq(5, 0.1);
        let overlay = seq(4, 0.5);
        let out = VideoSplice::new(3)
            .apply(&primary, &overlay, None, None)
            .unwrap();

        assert_eq!(out.frame_count, 7);
        assert_eq!(out.images.len(), 7);
        for i in 0..3 {
            assert_eq!(out.images.frame(i), primary.frame(i));
        }
        for i in 0..4 {
            assert_eq!(out.images.frame(3 + i), overlay.frame(i));
        }
        assert_eq!(mask_values(&out.masks), vec![0.0; 7]);
    }

    #[test]
    fn test_gap_frames_are_grey_and_white() {
        let primary = seq(2, 0.1);
        let overlay = seq(2, 0.5);
        let out = VideoSplice::new(5)
            .apply(&primary, &overlay, None, None)
            .unwrap();

        assert_eq!(out.frame_count, 7);
        for i in 2..5 {
            assert!(out.images.frame(i).unwrap().iter().all(|&v| v == GREY_VALUE));
        }
        assert_eq!(
            mask_values(&out.masks),
            vec![0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_short_overlay_keeps_primary_tail() {
        let primary = seq(6, 0.1);
        let overlay = seq(2, 0.5);
        let out = VideoSplice::new(1)
            .apply(&primary, &overlay, None, None)
            .unwrap();
        assert_eq!(out.frame_count, 6);
        assert_eq!(out.images.frame(5), primary.frame(5));
        assert_eq!(out.images.frame(2), overlay.frame(1));
    }

    #[test]
    fn test_supplied_masks_are_composed() {
        let primary = seq(3, 0.1);
        let overlay = seq(2, 0.5);
        let mask1 = FrameBuffer::filled(3, SHAPE.with_channels(1), 0.25);
        let mask2 = FrameBuffer::filled(2, SHAPE.with_channels(1), 0.75);
        let out = VideoSplice::new(2)
            .apply(&primary, &overlay, Some(&mask1), Some(&mask2))
            .unwrap();
        assert_eq!(mask_values(&out.masks), vec![0.25, 0.25, 0.75, 0.75]);
    }

    #[test]
    fn test_timeline_gap_frames() {
        let timeline = SpliceTimeline::new(2, 2, 5);
        assert_eq!(timeline.total(), 7);
        assert_eq!(timeline.overlay_range(), 5..7);
        assert_eq!(timeline.gap_frames(), vec![2, 3, 4]);
        assert!(SpliceTimeline::new(5, 4, 3).gap_frames().is_empty());
    }

    #[test]
    fn test_offset_bounds() {
        let a = seq(1, 0.1);
        let err = VideoSplice::new(2001).apply(&a, &a, None, None).unwrap_err();
        assert_eq!(
            err,
            EditError::OffsetRange {
                offset: 2001,
                max: 2000
            }
        );
        let err = VideoSplice::new(-1).apply(&a, &a, None, None).unwrap_err();
        assert!(matches!(err, EditError::OffsetRange { offset: -1, .. }));
        assert!(VideoSplice::new(2000).apply(&a, &a, None, None).is_ok());
    }

    #[test]
    fn test_configured_offset_cap() {
        let a = seq(1, 0.1);
        let splice = VideoSplice {
            frame_offset: 20,
            max_offset: 10,
            ..Default::default()
        };
        let err = splice.apply(&a, &a, None, None).unwrap_err();
        assert!(matches!(err, EditError::OffsetRange { max: 10, .. }));
    }

    #[test]
    fn test_resolution_and_channel_mismatch() {
        let a = seq(2, 0.1);
        let wide = FrameBuffer::ones(2, FrameShape::new(2, 4, 3));
        let err = VideoSplice::new(0).apply(&a, &wide, None, None).unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Resolution,
                ..
            }
        ));

        let rgba = FrameBuffer::ones(2, SHAPE.with_channels(4));
        let err = VideoSplice::new(0).apply(&a, &rgba, None, None).unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Channels,
                ..
            }
        ));
    }

    #[test]
    fn test_mask_validation() {
        let a = seq(3, 0.1);
        let b = seq(2, 0.5);
        let short = FrameBuffer::ones(2, SHAPE.with_channels(1));
        let err = VideoSplice::new(0)
            .apply(&a, &b, Some(&short), None)
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::CountMismatch { ref subject, expected: 3, actual: 2, .. } if subject == "mask1 frame"
        ));

        let wrong = FrameBuffer::ones(2, FrameShape::mask(5, 5));
        let err = VideoSplice::new(0)
            .apply(&a, &b, None, Some(&wrong))
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch { ref subject, aspect: ShapeAspect::Resolution, .. } if subject == "mask2"
        ));
    }

    #[test]
    fn test_inputs_untouched() {
        let primary = seq(3, 0.1);
        let overlay = seq(3, 0.5);
        let (p, o) = (primary.clone(), overlay.clone());
        let _ = VideoSplice::new(1).apply(&primary, &overlay, None, None).unwrap();
        assert_eq!(primary, p);
        assert_eq!(overlay, o);
    }
}
