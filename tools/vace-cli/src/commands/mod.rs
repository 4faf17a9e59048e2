pub mod clip_doctor;
pub mod config;
pub mod keyframe;
pub mod mask_range;
pub mod nodes;
pub mod splice;

use std::path::Path;

use vace_frame_model::FrameBuffer;

use crate::frames_io;

/// Write an image/mask pair under `<out>/images` and `<out>/masks`.
pub(crate) fn write_outputs(
    out: &Path,
    images: Option<&FrameBuffer>,
    masks: &FrameBuffer,
) -> anyhow::Result<()> {
    if let Some(images) = images {
        let dir = out.join("images");
        let n = frames_io::write_sequence(&dir, images)?;
        println!("  Images: {n} frame(s) -> {}", dir.display());
    }
    let dir = out.join("masks");
    let n = frames_io::write_sequence(&dir, masks)?;
    println!("  Masks: {n} frame(s) -> {}", dir.display());
    Ok(())
}
