//! Replace frames of a sequence with keyframe images.

use std::path::PathBuf;

use anyhow::Context;
use vace_processing_core::KeyframeInsert;

use crate::frames_io;

pub fn run(
    images: PathBuf,
    positions: String,
    keyframes: Vec<PathBuf>,
    masks: Option<PathBuf>,
    mask_value: f32,
    output: PathBuf,
) -> anyhow::Result<()> {
    let image_seq = frames_io::load_images(&images)?;
    let mask_seq = masks.as_deref().map(frames_io::load_masks).transpose()?;

    let keyframe_frames = keyframes
        .iter()
        .map(|path| {
            frames_io::load_images(path)
                .with_context(|| format!("Failed to load keyframe {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    println!(
        "Inserting {} keyframe(s) at '{}' into {} frame(s)",
        keyframe_frames.len(),
        positions,
        image_seq.len()
    );

    let insert = KeyframeInsert::new(positions, mask_value);
    let (edited_images, edited_masks) =
        insert.apply(&image_seq, mask_seq.as_ref(), &keyframe_frames)?;
    super::write_outputs(&output, Some(&edited_images), &edited_masks)
}
