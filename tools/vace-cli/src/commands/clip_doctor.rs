//! Grey out image frames and paint mask frames in one pass.

use std::path::PathBuf;

use vace_common::EditingDefaults;
use vace_processing_core::ClipEdit;

use crate::frames_io;

pub fn run(
    images: PathBuf,
    masks: PathBuf,
    grey: String,
    white: String,
    black: String,
    defaults: &EditingDefaults,
    output: PathBuf,
) -> anyhow::Result<()> {
    let image_seq = frames_io::load_images(&images)?;
    let mask_seq = frames_io::load_masks(&masks)?;
    println!(
        "Editing clip: {} image frame(s), {} mask frame(s)",
        image_seq.len(),
        mask_seq.len()
    );

    let edit = ClipEdit {
        grey_range: grey,
        white_range: white,
        black_range: black,
        grey_value: defaults.gap_grey_value(),
    };
    let (edited_images, edited_masks) = edit.apply(&image_seq, &mask_seq)?;
    super::write_outputs(&output, Some(&edited_images), &edited_masks)
}
