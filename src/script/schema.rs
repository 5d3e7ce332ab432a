use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Wire form of a script as produced by the upstream summarizer.
///
/// ```json
/// { "title": "...", "summary_and_images": [ { "sentence": "...", "image_prompt": "..." } ] }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptDocument {
    /// Video title, drawn as the title label.
    pub title: String,
    /// Ordered sentences; entry `i` pairs with asset number `i + 1`.
    pub summary_and_images: Vec<ScriptEntry>,
}

/// One sentence of the script and the prompt its illustration was generated from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptEntry {
    /// Narrated sentence, also used as the caption.
    pub sentence: String,
    /// Prompt the image asset was generated from; required, may be empty.
    pub image_prompt: String,
}

impl ScriptDocument {
    /// Parse and validate a script from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> NewsreelResult<Self> {
        let doc: Self = serde_json::from_slice(bytes)
            .map_err(|e| NewsreelError::serde(format!("invalid script json: {e}")))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Read, parse and validate a script file.
    pub fn from_path(path: &Path) -> NewsreelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read script '{}'", path.display()))?;
        Self::from_json_slice(&bytes)
    }

    /// Number of segments in the script.
    pub fn len(&self) -> usize {
        self.summary_and_images.len()
    }

    /// `true` when the script has no segments.
    pub fn is_empty(&self) -> bool {
        self.summary_and_images.is_empty()
    }

    /// Structural checks shared by every entry point.
    pub fn validate(&self) -> NewsreelResult<()> {
        if self.title.trim().is_empty() {
            return Err(NewsreelError::validation("script title must be non-empty"));
        }
        if self.summary_and_images.is_empty() {
            return Err(NewsreelError::validation(
                "script must contain at least one segment",
            ));
        }
        if u32::try_from(self.summary_and_images.len()).is_err() {
            return Err(NewsreelError::validation("script has too many segments"));
        }
        for (i, entry) in self.summary_and_images.iter().enumerate() {
            if entry.sentence.trim().is_empty() {
                return Err(NewsreelError::validation(format!(
                    "segment {} sentence must be non-empty",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/schema.rs"]
mod tests;
