//! VACE Node Registry
//!
//! Declarative description of how the frame-editing operations appear to a
//! node-graph host: node ids, display names, typed inputs with defaults and
//! widget hints, and outputs. Each input also names its [`OptionEffect`], the
//! part it plays in the operation.
//!
//! Nothing here executes an edit; the operations live in
//! `vace-processing-core` and take plain values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use vace_common::MAX_FRAME_OFFSET;
use vace_processing_core::{
    ClipEdit, KeyframeInsert, VideoSplice, MASK_BLACK, MASK_WHITE, MAX_KEYFRAMES,
};

/// Menu category all nodes are filed under.
pub const CATEGORY: &str = "Vace/VFX";

/// Data type carried by a socket or widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Image,
    Mask,
    String,
    Int,
    Float,
}

/// How the host should present an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum Widget {
    /// Connected from another node, no inline widget.
    Socket,
    Text {
        multiline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    Number { min: f64, max: f64, step: f64 },
    Slider { min: f64, max: f64, step: f64 },
}

/// What an input does to the operation's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum OptionEffect {
    /// The sequence being edited.
    Source,
    /// Frames listed are filled with `value` in the mask output.
    PaintMask { value: f32 },
    /// Frames listed are filled with `value` in the image output.
    PaintImage { value: f32 },
    /// Frames listed are replaced by keyframes, in ascending order.
    ReplaceFrames,
    /// Keyframe bound to the `slot`-th smallest replacement position.
    Keyframe { slot: usize },
    /// Mask value written at replaced frames.
    ReplacedMaskValue,
    /// Sequence written over the primary at the offset.
    Overlay,
    /// First output frame covered by the overlay.
    OverlayOffset { limit: usize },
    /// Presence mask for the `sequence`-th input (1 = primary, 2 = overlay).
    SequenceMask { sequence: u8 },
}

/// One node input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub name: String,
    pub kind: ValueKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(flatten)]
    pub widget: Widget,
    #[serde(flatten)]
    pub effect: OptionEffect,
}

/// One node output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    pub kind: ValueKind,
}

/// Everything the host needs to register one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    pub display_name: String,
    pub category: String,
    pub function: String,
    pub inputs: Vec<InputSpec>,
    pub outputs: Vec<OutputSpec>,
}

impl NodeDescriptor {
    fn new(id: &str, display_name: &str, function: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            category: CATEGORY.to_string(),
            function: function.to_string(),
            inputs: vec![],
            outputs: vec![],
        }
    }

    fn input(
        mut self,
        name: &str,
        kind: ValueKind,
        required: bool,
        default: Option<Value>,
        widget: Widget,
        effect: OptionEffect,
    ) -> Self {
        self.inputs.push(InputSpec {
            name: name.to_string(),
            kind,
            required,
            default,
            widget,
            effect,
        });
        self
    }

    fn socket(self, name: &str, kind: ValueKind, required: bool, effect: OptionEffect) -> Self {
        self.input(name, kind, required, None, Widget::Socket, effect)
    }

    fn range_text(self, name: &str, placeholder: &str, effect: OptionEffect) -> Self {
        self.input(
            name,
            ValueKind::String,
            false,
            Some(json!("")),
            Widget::Text {
                multiline: false,
                placeholder: Some(placeholder.to_string()),
            },
            effect,
        )
    }

    fn output(mut self, name: &str, kind: ValueKind) -> Self {
        self.outputs.push(OutputSpec {
            name: name.to_string(),
            kind,
        });
        self
    }

    /// Look up an input by name.
    pub fn input_named(&self, name: &str) -> Option<&InputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }

    /// Names of the inputs the host must connect.
    pub fn required_inputs(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|i| i.required)
            .map(|i| i.name.as_str())
            .collect()
    }
}

fn mask_range_node() -> NodeDescriptor {
    NodeDescriptor::new("MaskRangeDoctor", "Mask Range Doctor", "edit_mask_ranges")
        .socket("masks", ValueKind::Mask, true, OptionEffect::Source)
        .range_text(
            "white_range",
            "e.g., 3,5,10-15,20",
            OptionEffect::PaintMask { value: MASK_WHITE },
        )
        .range_text(
            "black_range",
            "e.g., 25,30-40,50",
            OptionEffect::PaintMask { value: MASK_BLACK },
        )
        .output("masks", ValueKind::Mask)
}

fn clip_doctor_node() -> NodeDescriptor {
    let grey = ClipEdit::default().grey_value;
    NodeDescriptor::new("VACEClipDoctor", "VACE Clip Doctor", "edit_sequences")
        .socket("images", ValueKind::Image, true, OptionEffect::Source)
        .socket("masks", ValueKind::Mask, true, OptionEffect::Source)
        .range_text(
            "grey_range",
            "e.g., 2,5,10-15",
            OptionEffect::PaintImage { value: grey },
        )
        .range_text(
            "white_range",
            "e.g., 3,5,10-15,20",
            OptionEffect::PaintMask { value: MASK_WHITE },
        )
        .range_text(
            "black_range",
            "e.g., 25,30-40,50",
            OptionEffect::PaintMask { value: MASK_BLACK },
        )
        .output("images", ValueKind::Image)
        .output("masks", ValueKind::Mask)
}

fn keyframe_insert_node() -> NodeDescriptor {
    let defaults = KeyframeInsert::default();
    let mut node = NodeDescriptor::new(
        "VACEInpaintKeyframeInsert",
        "VACE Inpaint Keyframe Insert",
        "replace_keyframes",
    )
    .socket("images", ValueKind::Image, true, OptionEffect::Source)
    .input(
        "keyframe_positions",
        ValueKind::String,
        true,
        Some(json!(defaults.positions)),
        Widget::Text {
            multiline: false,
            placeholder: None,
        },
        OptionEffect::ReplaceFrames,
    )
    .socket("masks", ValueKind::Mask, false, OptionEffect::Source);

    for slot in 1..=MAX_KEYFRAMES {
        node = node.socket(
            &format!("keyframe_{slot}"),
            ValueKind::Image,
            false,
            OptionEffect::Keyframe { slot },
        );
    }

    node.input(
        "keyframe_mask_value",
        ValueKind::Float,
        false,
        Some(json!(defaults.mask_value)),
        Widget::Slider {
            min: 0.0,
            max: 1.0,
            step: 0.01,
        },
        OptionEffect::ReplacedMaskValue,
    )
    .output("images", ValueKind::Image)
    .output("masks", ValueKind::Mask)
}

fn video_splice_node() -> NodeDescriptor {
    let defaults = VideoSplice::default();
    NodeDescriptor::new("VACEVideoSplice", "VACE Video Splice", "splice_video")
        .socket("imagesequence1", ValueKind::Image, true, OptionEffect::Source)
        .socket("imagesequence2", ValueKind::Image, true, OptionEffect::Overlay)
        .input(
            "frame_offset",
            ValueKind::Int,
            true,
            Some(json!(defaults.frame_offset)),
            Widget::Number {
                min: 0.0,
                max: MAX_FRAME_OFFSET as f64,
                step: 1.0,
            },
            OptionEffect::OverlayOffset {
                limit: defaults.max_offset,
            },
        )
        .socket(
            "mask1",
            ValueKind::Mask,
            false,
            OptionEffect::SequenceMask { sequence: 1 },
        )
        .socket(
            "mask2",
            ValueKind::Mask,
            false,
            OptionEffect::SequenceMask { sequence: 2 },
        )
        .output("images", ValueKind::Image)
        .output("masks", ValueKind::Mask)
        .output("frame_count", ValueKind::Int)
}

/// All nodes, in registration order.
pub fn registry() -> Vec<NodeDescriptor> {
    vec![
        keyframe_insert_node(),
        mask_range_node(),
        clip_doctor_node(),
        video_splice_node(),
    ]
}

/// Look up a node by id.
pub fn find(id: &str) -> Option<NodeDescriptor> {
    registry().into_iter().find(|n| n.id == id)
}

/// Node id → display name, as hosts expect it.
pub fn display_names() -> BTreeMap<String, String> {
    registry()
        .into_iter()
        .map(|n| (n.id, n.display_name))
        .collect()
}

/// The whole registry as pretty-printed JSON.
pub fn registry_json() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&registry())
}
