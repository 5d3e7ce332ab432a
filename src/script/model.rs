use std::path::{Path, PathBuf};

use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::script::schema::ScriptDocument;

/// Opaque handle to one pre-generated asset on disk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetRef(PathBuf);

impl AssetRef {
    /// Wrap a filesystem path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Filesystem path of the asset.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Image and audio assets aligned 1:1 with script segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssetSet {
    /// Image assets in segment order.
    pub images: Vec<AssetRef>,
    /// Audio assets in segment order.
    pub audios: Vec<AssetRef>,
}

impl AssetSet {
    /// Build a set from explicit, already ordered lists.
    pub fn new(images: Vec<AssetRef>, audios: Vec<AssetRef>) -> Self {
        Self { images, audios }
    }

    /// Locate `image{i}.png` / `audio{i}.wav` for `i` in `1..=count` under `dir`.
    ///
    /// Paths are produced whether or not the files exist; missing files surface later as
    /// `AssetUnreadable` with the segment index attached.
    pub fn numbered(dir: &Path, count: usize) -> Self {
        let images = (1..=count)
            .map(|i| AssetRef::new(dir.join(format!("image{i}.png"))))
            .collect();
        let audios = (1..=count)
            .map(|i| AssetRef::new(dir.join(format!("audio{i}.wav"))))
            .collect();
        Self { images, audios }
    }
}

/// One sentence with its paired voice clip and illustration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Segment {
    /// 1-based position; matches the asset file numbering.
    pub index: u32,
    /// Narrated sentence and caption text.
    pub sentence: String,
    /// Prompt the illustration was generated from.
    pub image_prompt: String,
    /// Voice clip for this sentence.
    pub audio: AssetRef,
    /// Illustration for this sentence.
    pub image: AssetRef,
}

/// Validated title plus a non-empty, contiguously indexed segment list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Script {
    title: String,
    segments: Vec<Segment>,
}

impl Script {
    /// Bind a parsed document to its assets.
    ///
    /// Fails with `AssetCountMismatch` when the image or audio list length differs from the
    /// number of sentences. No asset is opened here.
    pub fn bind(doc: ScriptDocument, assets: AssetSet) -> NewsreelResult<Self> {
        doc.validate()?;
        let n = doc.len();
        if assets.images.len() != n || assets.audios.len() != n {
            return Err(NewsreelError::AssetCountMismatch {
                segments: n,
                images: assets.images.len(),
                audios: assets.audios.len(),
            });
        }

        let segments = doc
            .summary_and_images
            .into_iter()
            .zip(assets.images)
            .zip(assets.audios)
            .enumerate()
            .map(|(i, ((entry, image), audio))| Segment {
                index: (i + 1) as u32,
                sentence: entry.sentence,
                image_prompt: entry.image_prompt,
                audio,
                image,
            })
            .collect();

        Self::from_segments(doc.title, segments)
    }

    /// Build from already constructed segments, checking the `1..=N` index invariant.
    pub fn from_segments(title: String, segments: Vec<Segment>) -> NewsreelResult<Self> {
        if segments.is_empty() {
            return Err(NewsreelError::validation(
                "script must contain at least one segment",
            ));
        }
        for (pos, seg) in segments.iter().enumerate() {
            let expected = pos as u64 + 1;
            if u64::from(seg.index) != expected {
                return Err(NewsreelError::validation(format!(
                    "segment indices must be contiguous from 1: position {expected} has index {}",
                    seg.index
                )));
            }
        }
        Ok(Self { title, segments })
    }

    /// Video title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Segments in timeline order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments (always >= 1).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
