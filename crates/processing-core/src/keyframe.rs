//! Keyframe replacement.
//!
//! Replaces frames of a sequence with single-frame keyframes, keeping the
//! frame count, and marks the replaced frames in the mask.
//!
//! ```text
//! images:    [F0, F1, F2, F3, F4, F5, F6, F7]
//! keyframes: [K1, K2] at "3,7"
//! result:    [F0, F1, F2, K1, F4, F5, F6, K2]
//! masks:     [1,  1,  1,  v,  1,  1,  1,  v]   (v = mask value, no mask given)
//! ```
//!
//! Two ways in: [`KeyframePlan::from_pairs`] binds each keyframe to its
//! position explicitly; [`KeyframeInsert`] takes a position expression plus an
//! ordered keyframe list and binds the Nth keyframe to the Nth *smallest*
//! position.

use std::collections::BTreeMap;

use vace_common::{EditError, EditResult, ShapeAspect};
use vace_frame_model::{expand_indices, FrameBuffer};

use crate::fill::MASK_WHITE;

/// Most keyframes a single node accepts.
pub const MAX_KEYFRAMES: usize = 5;

const POSITIONS_FIELD: &str = "keyframe_positions";

/// Positional keyframe insertion, as exposed to the host.
#[derive(Debug, Clone)]
pub struct KeyframeInsert {
    /// Position expression, e.g. `"3,7,12"`. Must name at least one frame.
    pub positions: String,
    /// Mask value written at every replaced frame, within `[0.0, 1.0]`.
    pub mask_value: f32,
}

impl Default for KeyframeInsert {
    fn default() -> Self {
        Self {
            positions: "0".to_string(),
            mask_value: 0.0,
        }
    }
}

impl KeyframeInsert {
    pub fn new(positions: impl Into<String>, mask_value: f32) -> Self {
        Self {
            positions: positions.into(),
            mask_value,
        }
    }

    /// Replace frames of `images` with `keyframes`.
    ///
    /// `keyframes` are bound to the positions in ascending position order,
    /// regardless of the order the positions were written in.
    pub fn apply(
        &self,
        images: &FrameBuffer,
        masks: Option<&FrameBuffer>,
        keyframes: &[FrameBuffer],
    ) -> EditResult<(FrameBuffer, FrameBuffer)> {
        validate_mask_value(self.mask_value)?;

        let written = expand_indices(&self.positions, images.len(), POSITIONS_FIELD)?;
        if written.is_empty() {
            return Err(EditError::format(
                POSITIONS_FIELD,
                self.positions.trim(),
                "Specify at least one position (e.g., '0' or '3,7,12')",
                images.len(),
            ));
        }
        check_unique(&written)?;

        if keyframes.is_empty() {
            return Err(EditError::missing_input(
                "No keyframes provided. Connect at least one keyframe image (keyframe_1, keyframe_2, ...)",
            ));
        }
        check_keyframe_count(keyframes.len(), written.len())?;

        let mut sorted = written.clone();
        sorted.sort_unstable();
        if sorted != written {
            tracing::warn!(
                written = ?written,
                applied = ?sorted,
                "Keyframe positions were not ascending; keyframes are bound to sorted positions"
            );
        }

        let plan = KeyframePlan {
            entries: sorted.into_iter().zip(keyframes.iter().cloned()).collect(),
        };
        plan.apply(images, masks, self.mask_value)
    }
}

/// An explicit position → keyframe binding, ordered by position.
#[derive(Debug, Clone)]
pub struct KeyframePlan {
    entries: Vec<(usize, FrameBuffer)>,
}

impl KeyframePlan {
    /// Build a plan from explicit `(position, keyframe)` pairs.
    ///
    /// Positions must be unique; between one and [`MAX_KEYFRAMES`] pairs are
    /// accepted. Bounds and shapes are checked against the target sequence
    /// in [`KeyframePlan::apply`].
    pub fn from_pairs(pairs: Vec<(usize, FrameBuffer)>) -> EditResult<Self> {
        if pairs.is_empty() {
            return Err(EditError::missing_input(
                "A keyframe plan needs at least one position/keyframe pair",
            ));
        }
        let positions: Vec<usize> = pairs.iter().map(|(p, _)| *p).collect();
        check_unique(&positions)?;
        check_keyframe_count(pairs.len(), pairs.len())?;

        let mut entries = pairs;
        entries.sort_by_key(|(position, _)| *position);
        Ok(Self { entries })
    }

    /// Target positions, ascending.
    pub fn positions(&self) -> Vec<usize> {
        self.entries.iter().map(|(p, _)| *p).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the plan into copies of `images` and `masks`.
    ///
    /// Without `masks`, an all-white mask sequence matching the images is
    /// synthesized first. Each replaced frame's mask is filled with
    /// `mask_value`.
    pub fn apply(
        &self,
        images: &FrameBuffer,
        masks: Option<&FrameBuffer>,
        mask_value: f32,
    ) -> EditResult<(FrameBuffer, FrameBuffer)> {
        validate_mask_value(mask_value)?;
        let shape = images.shape();

        for &(position, _) in &self.entries {
            if position >= images.len() {
                return Err(EditError::OutOfBounds {
                    field: POSITIONS_FIELD.to_string(),
                    literal: position.to_string(),
                    value: position as i64,
                    length: images.len(),
                });
            }
        }

        for (idx, (_, keyframe)) in self.entries.iter().enumerate() {
            validate_keyframe(idx, keyframe, images)?;
        }

        if let Some(masks) = masks {
            validate_masks(masks, images)?;
        }

        tracing::debug!(
            frames = images.len(),
            positions = ?self.positions(),
            mask_value,
            "Replacing keyframes"
        );

        let mut out_images = images.clone();
        let mut out_masks = match masks {
            Some(masks) => masks.clone(),
            None => FrameBuffer::filled(images.len(), shape.with_channels(1), MASK_WHITE),
        };

        for (position, keyframe) in &self.entries {
            out_images.write_range(*position, keyframe);
            out_masks.fill_frame(*position, mask_value);
        }

        Ok((out_images, out_masks))
    }
}

fn validate_mask_value(value: f32) -> EditResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EditError::InvalidParameter {
            name: "keyframe_mask_value".to_string(),
            value: value.to_string(),
            constraint: "0.0-1.0".to_string(),
        })
    }
}

fn check_unique(positions: &[usize]) -> EditResult<()> {
    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &p in positions {
        *counts.entry(p).or_default() += 1;
    }
    let duplicates: Vec<i64> = counts
        .into_iter()
        .filter(|&(_, n)| n > 1)
        .map(|(p, _)| p as i64)
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(EditError::Duplicate {
            field: POSITIONS_FIELD.to_string(),
            values: duplicates,
        })
    }
}

fn check_keyframe_count(keyframes: usize, positions: usize) -> EditResult<()> {
    if keyframes > MAX_KEYFRAMES {
        return Err(EditError::count_mismatch(
            "Keyframe",
            "maximum keyframes per node",
            MAX_KEYFRAMES,
            keyframes,
        ));
    }
    if keyframes != positions {
        return Err(EditError::count_mismatch(
            "Keyframe",
            "position count",
            positions,
            keyframes,
        ));
    }
    Ok(())
}

fn validate_keyframe(idx: usize, keyframe: &FrameBuffer, images: &FrameBuffer) -> EditResult<()> {
    let subject = format!("Keyframe {}", idx + 1);
    let (expected, actual) = (images.shape(), keyframe.shape());

    if keyframe.len() != 1 {
        return Err(EditError::shape_mismatch(
            subject,
            "single image",
            ShapeAspect::Batch,
            1,
            keyframe.len(),
        ));
    }
    if actual.resolution() != expected.resolution() {
        return Err(EditError::shape_mismatch(
            subject,
            "video",
            ShapeAspect::Resolution,
            expected.resolution_label(),
            actual.resolution_label(),
        ));
    }
    if actual.channels != expected.channels {
        return Err(EditError::shape_mismatch(
            subject,
            "video",
            ShapeAspect::Channels,
            expected.channels,
            actual.channels,
        ));
    }
    Ok(())
}

fn validate_masks(masks: &FrameBuffer, images: &FrameBuffer) -> EditResult<()> {
    let (expected, actual) = (images.shape(), masks.shape());
    if !masks.is_mask() {
        return Err(EditError::shape_mismatch(
            "Mask",
            "single-channel mask",
            ShapeAspect::Channels,
            1,
            actual.channels,
        ));
    }
    if masks.len() != images.len() {
        return Err(EditError::count_mismatch(
            "Mask frame",
            "video frame count",
            images.len(),
            masks.len(),
        ));
    }
    if actual.resolution() != expected.resolution() {
        return Err(EditError::shape_mismatch(
            "Mask",
            "video",
            ShapeAspect::Resolution,
            expected.resolution_label(),
            actual.resolution_label(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vace_frame_model::FrameShape;

    const SHAPE: FrameShape = FrameShape {
        height: 4,
        width: 6,
        channels: 3,
    };

    fn video(frames: usize) -> FrameBuffer {
        FrameBuffer::from_fn(frames, SHAPE, |i| i as f32 / 100.0)
    }

    fn keyframe(value: f32) -> FrameBuffer {
        FrameBuffer::filled(1, SHAPE, value)
    }

    #[test]
    fn test_replaces_frames_and_marks_masks() {
        let images = video(8);
        let (out, masks) = KeyframeInsert::new("3,7", 0.0)
            .apply(&images, None, &[keyframe(0.9), keyframe(0.8)])
            .unwrap();

        assert_eq!(out.len(), 8);
        assert_eq!(masks.len(), 8);
        assert_eq!(masks.shape(), FrameShape::mask(4, 6));
        for frame in 0..8 {
            let image = out.frame(frame).unwrap();
            let mask = masks.frame(frame).unwrap();
            match frame {
                3 => assert!(image.iter().all(|&v| v == 0.9)),
                7 => assert!(image.iter().all(|&v| v == 0.8)),
                _ => assert_eq!(Some(image), images.frame(frame)),
            }
            let expected = if frame == 3 || frame == 7 { 0.0 } else { 1.0 };
            assert!(mask.iter().all(|&v| v == expected), "mask {frame}");
        }
    }

    #[test]
    fn test_unsorted_positions_bind_to_sorted_order() {
        let images = video(8);
        let (out, _) = KeyframeInsert::new("7,3", 0.0)
            .apply(&images, None, &[keyframe(0.9), keyframe(0.8)])
            .unwrap();
        assert!(out.frame(3).unwrap().iter().all(|&v| v == 0.9));
        assert!(out.frame(7).unwrap().iter().all(|&v| v == 0.8));
    }

    #[test]
    fn test_existing_masks_are_preserved() {
        let images = video(4);
        let masks = FrameBuffer::filled(4, FrameShape::mask(4, 6), 0.3);
        let (_, out_masks) = KeyframeInsert::new("2", 0.75)
            .apply(&images, Some(&masks), &[keyframe(0.5)])
            .unwrap();
        assert!(out_masks.frame(1).unwrap().iter().all(|&v| v == 0.3));
        assert!(out_masks.frame(2).unwrap().iter().all(|&v| v == 0.75));
        assert!(masks.frame(2).unwrap().iter().all(|&v| v == 0.3));
    }

    #[test]
    fn test_span_positions_are_accepted() {
        let images = video(6);
        let kfs = [keyframe(0.1), keyframe(0.2), keyframe(0.3)];
        let (out, _) = KeyframeInsert::new("2-4", 0.0)
            .apply(&images, None, &kfs)
            .unwrap();
        assert!(out.frame(4).unwrap().iter().all(|&v| v == 0.3));
    }

    #[test]
    fn test_empty_positions_rejected() {
        let err = KeyframeInsert::new("  ", 0.0)
            .apply(&video(4), None, &[keyframe(0.5)])
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::Format { ref field, length: 4, .. } if field == POSITIONS_FIELD
        ));
    }

    #[test]
    fn test_duplicate_positions_listed() {
        let err = KeyframeInsert::new("1,4,1,4,2", 0.0)
            .apply(&video(6), None, &[keyframe(0.5)])
            .unwrap_err();
        assert_eq!(
            err,
            EditError::Duplicate {
                field: POSITIONS_FIELD.into(),
                values: vec![1, 4],
            }
        );
    }

    #[test]
    fn test_out_of_range_position() {
        let err = KeyframeInsert::new("8", 0.0)
            .apply(&video(8), None, &[keyframe(0.5)])
            .unwrap_err();
        assert!(matches!(err, EditError::OutOfBounds { value: 8, length: 8, .. }));
    }

    #[test]
    fn test_keyframe_count_must_match_positions() {
        let err = KeyframeInsert::new("1,2,3", 0.0)
            .apply(&video(8), None, &[keyframe(0.5), keyframe(0.6)])
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::CountMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_and_excess_keyframes() {
        let err = KeyframeInsert::default().apply(&video(8), None, &[]).unwrap_err();
        assert!(matches!(err, EditError::MissingInput { .. }));

        let six: Vec<FrameBuffer> = (0..6).map(|i| keyframe(i as f32 / 10.0)).collect();
        let err = KeyframeInsert::new("0-5", 0.0)
            .apply(&video(8), None, &six)
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::CountMismatch {
                expected: MAX_KEYFRAMES,
                actual: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_keyframe_shape_checks() {
        let images = video(4);
        let insert = KeyframeInsert::new("0", 0.0);

        let batch = FrameBuffer::filled(2, SHAPE, 0.5);
        let err = insert.apply(&images, None, &[batch]).unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Batch,
                ..
            }
        ));

        let small = FrameBuffer::filled(1, FrameShape::new(4, 5, 3), 0.5);
        let err = insert.apply(&images, None, &[small]).unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Resolution,
                ref expected,
                ref actual,
                ..
            } if expected == "6x4" && actual == "5x4"
        ));

        let rgba = FrameBuffer::filled(1, SHAPE.with_channels(4), 0.5);
        let err = insert.apply(&images, None, &[rgba]).unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Channels,
                ..
            }
        ));
    }

    #[test]
    fn test_mask_checks() {
        let images = video(4);
        let insert = KeyframeInsert::new("0", 0.0);

        let short = FrameBuffer::ones(3, FrameShape::mask(4, 6));
        let err = insert.apply(&images, Some(&short), &[keyframe(0.5)]).unwrap_err();
        assert!(matches!(err, EditError::CountMismatch { expected: 4, actual: 3, .. }));

        let wrong_res = FrameBuffer::ones(4, FrameShape::mask(8, 6));
        let err = insert
            .apply(&images, Some(&wrong_res), &[keyframe(0.5)])
            .unwrap_err();
        assert!(matches!(
            err,
            EditError::ShapeMismatch {
                aspect: ShapeAspect::Resolution,
                ..
            }
        ));
    }

    #[test]
    fn test_mask_value_must_be_unit_interval() {
        let err = KeyframeInsert::new("0", 1.5)
            .apply(&video(2), None, &[keyframe(0.5)])
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidParameter { .. }));
    }

    #[test]
    fn test_explicit_pairs_plan() {
        let plan = KeyframePlan::from_pairs(vec![(5, keyframe(0.2)), (1, keyframe(0.7))]).unwrap();
        assert_eq!(plan.positions(), vec![1, 5]);

        let (out, masks) = plan.apply(&video(6), None, 0.0).unwrap();
        assert!(out.frame(1).unwrap().iter().all(|&v| v == 0.7));
        assert!(out.frame(5).unwrap().iter().all(|&v| v == 0.2));
        assert!(masks.frame(1).unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_explicit_pairs_reject_duplicates_and_bounds() {
        let err = KeyframePlan::from_pairs(vec![(2, keyframe(0.1)), (2, keyframe(0.2))]).unwrap_err();
        assert!(matches!(err, EditError::Duplicate { ref values, .. } if values == &[2]));

        let plan = KeyframePlan::from_pairs(vec![(9, keyframe(0.1))]).unwrap();
        let err = plan.apply(&video(4), None, 0.0).unwrap_err();
        assert!(matches!(err, EditError::OutOfBounds { value: 9, length: 4, .. }));
    }
}
