//! Paint mask frames white or black.

use std::path::PathBuf;

use vace_processing_core::MaskRangeEdit;

use crate::frames_io;

pub fn run(masks: PathBuf, white: String, black: String, output: PathBuf) -> anyhow::Result<()> {
    let input = frames_io::load_masks(&masks)?;
    println!(
        "Editing {} mask frame(s) from {}",
        input.len(),
        masks.display()
    );

    let edited = MaskRangeEdit::new(white, black).apply(&input)?;
    super::write_outputs(&output, None, &edited)
}
