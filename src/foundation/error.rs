use std::path::Path;

/// Convenience result type used across newsreel.
pub type NewsreelResult<T> = Result<T, NewsreelError>;

/// Error taxonomy for a render. Every variant is fatal to the render that produced it.
#[derive(thiserror::Error, Debug)]
pub enum NewsreelError {
    /// An asset could not be opened or decoded.
    #[error("asset unreadable{}: '{asset}': {reason}", segment_suffix(.segment))]
    AssetUnreadable {
        /// 1-based segment index, when known.
        segment: Option<u32>,
        /// Asset path as supplied by the caller.
        asset: String,
        /// Underlying decoder or IO message.
        reason: String,
    },

    /// An asset decoded but carries no content (zero duration or zero-sized image).
    #[error("asset empty{}: '{asset}'", segment_suffix(.segment))]
    AssetEmpty {
        /// 1-based segment index, when known.
        segment: Option<u32>,
        /// Asset path as supplied by the caller.
        asset: String,
    },

    /// Script segment count and supplied asset counts disagree.
    #[error(
        "asset count mismatch: {segments} segments, {images} images, {audios} audio clips"
    )]
    AssetCountMismatch {
        /// Segments in the script.
        segments: usize,
        /// Image assets supplied.
        images: usize,
        /// Audio assets supplied.
        audios: usize,
    },

    /// A segment clip violated its timing or geometry invariant.
    #[error("segment {segment} build failed: {reason}")]
    SegmentBuildFailed {
        /// 1-based segment index.
        segment: u32,
        /// Violated invariant.
        reason: String,
    },

    /// Final serialization failed; the output file must be treated as absent.
    #[error("encode failed: {0}")]
    EncodeFailed(String),

    /// Invalid script, configuration or timeline data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Segment preparation was cancelled before the render started.
    #[error("render cancelled")]
    Cancelled,

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn segment_suffix(segment: &Option<u32>) -> String {
    match segment {
        Some(i) => format!(" (segment {i})"),
        None => String::new(),
    }
}

impl NewsreelError {
    /// Build a [`NewsreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NewsreelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`NewsreelError::EncodeFailed`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailed(msg.into())
    }

    /// Build an [`NewsreelError::AssetUnreadable`] value without segment context.
    pub fn unreadable(asset: &Path, reason: impl std::fmt::Display) -> Self {
        Self::AssetUnreadable {
            segment: None,
            asset: asset.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`NewsreelError::AssetEmpty`] value without segment context.
    pub fn empty(asset: &Path) -> Self {
        Self::AssetEmpty {
            segment: None,
            asset: asset.display().to_string(),
        }
    }

    /// Build a [`NewsreelError::SegmentBuildFailed`] value.
    pub fn segment_build(segment: u32, reason: impl Into<String>) -> Self {
        Self::SegmentBuildFailed {
            segment,
            reason: reason.into(),
        }
    }

    /// Attach a segment index to asset errors that do not carry one yet.
    pub fn with_segment(self, index: u32) -> Self {
        match self {
            Self::AssetUnreadable {
                segment: None,
                asset,
                reason,
            } => Self::AssetUnreadable {
                segment: Some(index),
                asset,
                reason,
            },
            Self::AssetEmpty {
                segment: None,
                asset,
            } => Self::AssetEmpty {
                segment: Some(index),
                asset,
            },
            other => other,
        }
    }

    /// Segment index carried by this error, if any.
    pub fn segment(&self) -> Option<u32> {
        match self {
            Self::AssetUnreadable { segment, .. } | Self::AssetEmpty { segment, .. } => *segment,
            Self::SegmentBuildFailed { segment, .. } => Some(*segment),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
