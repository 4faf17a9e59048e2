//! Error types shared across VACE crates.

use std::fmt;
use std::path::PathBuf;

/// Number of conflicting frames spelled out in an overlap message before
/// the remainder is summarized as a total.
const OVERLAP_PREVIEW_LIMIT: usize = 10;

/// Which dimension of two buffers failed to line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeAspect {
    /// Height and width.
    Resolution,
    /// Channel count.
    Channels,
    /// Batch dimension of a single-frame payload.
    Batch,
}

impl fmt::Display for ShapeAspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeAspect::Resolution => f.write_str("resolution"),
            ShapeAspect::Channels => f.write_str("channel count"),
            ShapeAspect::Batch => f.write_str("batch size"),
        }
    }
}

/// Validation failures raised by frame-editing operations.
///
/// Every variant carries the offending value(s) and the expected domain so
/// callers (and tests) can inspect the failure without parsing the message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("Invalid format in {field}: '{literal}'. {expected}. {}", describe_domain(.length))]
    Format {
        field: String,
        literal: String,
        expected: String,
        length: usize,
    },

    #[error(
        "Invalid range in {field}: '{literal}'. Start frame ({start}) must be <= end frame ({end}). {}",
        describe_domain(.length)
    )]
    RangeOrder {
        field: String,
        literal: String,
        start: i64,
        end: i64,
        length: usize,
    },

    #[error("Frame {value} in {field} ('{literal}') is out of range. {}", describe_domain(.length))]
    OutOfBounds {
        field: String,
        literal: String,
        value: i64,
        length: usize,
    },

    #[error(
        "Overlapping frames detected between {first} and {second}: [{}]. Each frame can only be assigned to one of them",
        preview_frames(.frames)
    )]
    Overlap {
        first: String,
        second: String,
        frames: Vec<usize>,
    },

    #[error("{subject} count ({actual}) does not match {reference} ({expected})")]
    CountMismatch {
        subject: String,
        reference: String,
        expected: usize,
        actual: usize,
    },

    #[error("{subject} {aspect} ({actual}) does not match {reference} {aspect} ({expected})")]
    ShapeMismatch {
        subject: String,
        reference: String,
        aspect: ShapeAspect,
        expected: String,
        actual: String,
    },

    #[error("Duplicate values found in {field}: {values:?}. Each position must be unique")]
    Duplicate { field: String, values: Vec<i64> },

    #[error("frame_offset ({offset}) is outside the allowed range 0-{max}")]
    OffsetRange { offset: i64, max: usize },

    #[error("{name} ({value}) is outside the allowed range {constraint}")]
    InvalidParameter {
        name: String,
        value: String,
        constraint: String,
    },

    #[error("Missing input: {message}")]
    MissingInput { message: String },
}

impl EditError {
    pub fn format(
        field: impl Into<String>,
        literal: impl Into<String>,
        expected: impl Into<String>,
        length: usize,
    ) -> Self {
        Self::Format {
            field: field.into(),
            literal: literal.into(),
            expected: expected.into(),
            length,
        }
    }

    pub fn count_mismatch(
        subject: impl Into<String>,
        reference: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::CountMismatch {
            subject: subject.into(),
            reference: reference.into(),
            expected,
            actual,
        }
    }

    pub fn shape_mismatch(
        subject: impl Into<String>,
        reference: impl Into<String>,
        aspect: ShapeAspect,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::ShapeMismatch {
            subject: subject.into(),
            reference: reference.into(),
            aspect,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput {
            message: msg.into(),
        }
    }
}

fn describe_domain(length: &usize) -> String {
    match *length {
        0 => "Sequence is empty (no valid frames)".to_string(),
        n => format!("Sequence has {n} frames (valid range: 0-{})", n - 1),
    }
}

fn preview_frames(frames: &[usize]) -> String {
    let shown = frames
        .iter()
        .take(OVERLAP_PREVIEW_LIMIT)
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if frames.len() > OVERLAP_PREVIEW_LIMIT {
        format!("{shown}... ({} total)", frames.len())
    } else {
        shown
    }
}

/// Top-level error type for VACE operations.
#[derive(Debug, thiserror::Error)]
pub enum VaceError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Image error at {path}: {message}")]
    Image { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for frame-editing validation.
pub type EditResult<T> = Result<T, EditError>;

/// Result type alias using VaceError.
pub type VaceResult<T> = Result<T, VaceError>;

impl VaceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn image(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Image {
            path: path.into(),
            message: msg.into(),
        }
    }
}
