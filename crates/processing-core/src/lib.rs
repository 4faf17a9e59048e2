//! VACE Processing Core: the frame-editing nodes
//!
//! Implements the four host-visible operations on frame buffers:
//! - **Mask Range Edit:** Paint mask frames white or black by range
//! - **Clip Edit:** Grey image frames plus white/black mask frames in one pass
//! - **Keyframe Insert:** Replace frames with keyframes and mark them in the mask
//! - **Video Splice:** Overlay one sequence onto another at a frame offset
//!
//! This crate is pure computation with no I/O and no host dependencies.
//! Every operation validates all of its inputs before editing, works on
//! copies, and never mutates the buffers it is given.

pub mod clip_doctor;
pub mod fill;
pub mod keyframe;
pub mod mask_range;
pub mod overlap;
pub mod splice;

pub use clip_doctor::ClipEdit;
pub use fill::{apply_fill, GREY_VALUE, MASK_BLACK, MASK_WHITE};
pub use keyframe::{KeyframeInsert, KeyframePlan, MAX_KEYFRAMES};
pub use mask_range::MaskRangeEdit;
pub use overlap::check_disjoint;
pub use splice::{SpliceOutput, SpliceTimeline, VideoSplice};
