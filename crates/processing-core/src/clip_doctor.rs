//! Combined image + mask editing.
//!
//! Grey frames are painted into the images; white and black frames into the
//! masks. Only the two mask colours exclude each other, a frame can be grey
//! and white (or black) at once.
//!
//! ```text
//! 6 frames, grey "1,5", white "1,4-5", black "0"
//!   images: [a0, grey, a2, a3, a4, grey]
//!   masks:  [black, white, m2, m3, white, white]
//! ```

use vace_common::{EditError, EditResult};
use vace_frame_model::{FrameBuffer, FrameIndexSet};

use crate::fill::{fill_in_place, GREY_VALUE, MASK_BLACK, MASK_WHITE};
use crate::overlap::check_disjoint;

/// Parameters for a combined clip edit.
#[derive(Debug, Clone)]
pub struct ClipEdit {
    /// Image frames to paint grey.
    pub grey_range: String,
    /// Mask frames to set to 1.0.
    pub white_range: String,
    /// Mask frames to set to 0.0.
    pub black_range: String,
    /// Value written to every channel of a grey frame.
    pub grey_value: f32,
}

impl Default for ClipEdit {
    fn default() -> Self {
        Self {
            grey_range: String::new(),
            white_range: String::new(),
            black_range: String::new(),
            grey_value: GREY_VALUE,
        }
    }
}

impl ClipEdit {
    /// Apply the edit to copies of `images` and `masks`.
    pub fn apply(
        &self,
        images: &FrameBuffer,
        masks: &FrameBuffer,
    ) -> EditResult<(FrameBuffer, FrameBuffer)> {
        if images.len() != masks.len() {
            return Err(EditError::count_mismatch(
                "Mask frame",
                "image frame count",
                images.len(),
                masks.len(),
            ));
        }

        let total = images.len();
        let grey = FrameIndexSet::parse(&self.grey_range, total, "grey_range")?;
        let white = FrameIndexSet::parse(&self.white_range, total, "white_range")?;
        let black = FrameIndexSet::parse(&self.black_range, total, "black_range")?;
        check_disjoint(&[("white_range", &white), ("black_range", &black)])?;

        tracing::debug!(
            frames = total,
            grey = %grey,
            white = %white,
            black = %black,
            "Editing clip"
        );

        let mut out_images = images.clone();
        fill_in_place(&mut out_images, &grey, self.grey_value);

        let mut out_masks = masks.clone();
        fill_in_place(&mut out_masks, &white, MASK_WHITE);
        fill_in_place(&mut out_masks, &black, MASK_BLACK);

        Ok((out_images, out_masks))
    }
}
