//! Scalar fills over selected frames.

use vace_frame_model::{FrameBuffer, FrameIndexSet};

/// Mask value for "white" (regenerate) frames.
pub const MASK_WHITE: f32 = 1.0;

/// Mask value for "black" (keep) frames.
pub const MASK_BLACK: f32 = 0.0;

/// Neutral grey, RGB(127, 127, 127) normalized.
pub const GREY_VALUE: f32 = 127.0 / 255.0;

/// Return a copy of `buffer` with every scalar of each frame in `indices`
/// set to `value`. The input is left untouched.
///
/// `indices` must have been parsed against a buffer of the same length.
pub fn apply_fill(buffer: &FrameBuffer, indices: &FrameIndexSet, value: f32) -> FrameBuffer {
    let mut output = buffer.clone();
    fill_in_place(&mut output, indices, value);
    output
}

/// Fill the frames in `indices` of a buffer the caller already owns.
pub(crate) fn fill_in_place(buffer: &mut FrameBuffer, indices: &FrameIndexSet, value: f32) {
    for index in indices {
        buffer.fill_frame(index, value);
    }
}
