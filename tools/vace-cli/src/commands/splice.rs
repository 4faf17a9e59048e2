//! Overlay one image sequence onto another.

use std::path::PathBuf;

use vace_common::EditingDefaults;
use vace_processing_core::VideoSplice;

use crate::frames_io;

pub fn run(
    primary: PathBuf,
    overlay: PathBuf,
    offset: i64,
    mask1: Option<PathBuf>,
    mask2: Option<PathBuf>,
    defaults: &EditingDefaults,
    output: PathBuf,
) -> anyhow::Result<()> {
    let primary_seq = frames_io::load_images(&primary)?;
    let overlay_seq = frames_io::load_images(&overlay)?;
    let primary_mask = mask1.as_deref().map(frames_io::load_masks).transpose()?;
    let overlay_mask = mask2.as_deref().map(frames_io::load_masks).transpose()?;

    let splice = VideoSplice {
        frame_offset: offset,
        max_offset: defaults.max_frame_offset,
        gap_value: defaults.gap_grey_value(),
    };
    let result = splice.apply(
        &primary_seq,
        &overlay_seq,
        primary_mask.as_ref(),
        overlay_mask.as_ref(),
    )?;

    println!(
        "Spliced {} + {} frame(s) at offset {offset}: {} frame(s)",
        primary_seq.len(),
        overlay_seq.len(),
        result.frame_count
    );
    super::write_outputs(&output, Some(&result.images), &result.masks)
}
