//! Mask range editing: paint whole mask frames white or black.
//!
//! ```text
//! 120 frames, white "3,5,10-15", black "20,25-30"
//!   -> frames 3,5,10..=15 set to 1.0, frames 20,25..=30 set to 0.0
//! ```

use vace_common::EditResult;
use vace_frame_model::{FrameBuffer, FrameIndexSet};

use crate::fill::{fill_in_place, MASK_BLACK, MASK_WHITE};
use crate::overlap::check_disjoint;

/// Parameters for a mask range edit. Empty ranges skip that colour.
#[derive(Debug, Clone, Default)]
pub struct MaskRangeEdit {
    /// Frames to set to 1.0.
    pub white_range: String,
    /// Frames to set to 0.0.
    pub black_range: String,
}

impl MaskRangeEdit {
    pub fn new(white_range: impl Into<String>, black_range: impl Into<String>) -> Self {
        Self {
            white_range: white_range.into(),
            black_range: black_range.into(),
        }
    }

    /// Apply the edit to a copy of `masks`.
    ///
    /// Fails without touching anything if a range is malformed, out of
    /// bounds, or if a frame is listed as both white and black.
    pub fn apply(&self, masks: &FrameBuffer) -> EditResult<FrameBuffer> {
        let total = masks.len();
        let white = FrameIndexSet::parse(&self.white_range, total, "white_range")?;
        let black = FrameIndexSet::parse(&self.black_range, total, "black_range")?;
        check_disjoint(&[("white_range", &white), ("black_range", &black)])?;

        tracing::debug!(
            frames = total,
            white = %white,
            black = %black,
            "Editing mask ranges"
        );

        let mut output = masks.clone();
        fill_in_place(&mut output, &white, MASK_WHITE);
        fill_in_place(&mut output, &black, MASK_BLACK);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vace_common::EditError;
    use vace_frame_model::FrameShape;

    fn half_masks(frames: usize) -> FrameBuffer {
        FrameBuffer::filled(frames, FrameShape::mask(2, 3), 0.5)
    }

    #[test]
    fn test_white_and_black_ranges() {
        let masks = half_masks(12);
        let out = MaskRangeEdit::new("3,5,7-8", "0,10-11").apply(&masks).unwrap();

        for frame in 0..12 {
            let expected = match frame {
                3 | 5 | 7 | 8 => 1.0,
                0 | 10 | 11 => 0.0,
                _ => 0.5,
            };
            assert!(
                out.frame(frame).unwrap().iter().all(|&v| v == expected),
                "frame {frame}"
            );
        }
        assert_eq!(out.shape(), masks.shape());
    }

    #[test]
    fn test_default_edit_is_identity() {
        let masks = half_masks(4);
        assert_eq!(MaskRangeEdit::default().apply(&masks).unwrap(), masks);
    }

    #[test]
    fn test_overlap_is_rejected() {
        let err = MaskRangeEdit::new("3,5", "5,8")
            .apply(&half_masks(10))
            .unwrap_err();
        assert!(matches!(err, EditError::Overlap { ref frames, .. } if frames == &[5]));
    }

    #[test]
    fn test_black_range_errors_name_black_field() {
        let err = MaskRangeEdit::new("", "9-12").apply(&half_masks(10)).unwrap_err();
        assert!(matches!(
            err,
            EditError::OutOfBounds { ref field, value: 12, length: 10, .. } if field == "black_range"
        ));
    }
}
