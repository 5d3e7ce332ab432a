use std::path::Path;

use crate::assets::decode::{PreparedImage, load_image_resized};
use crate::assets::media::{AudioPcm, ProbedAudio, decode_audio_file, probe_audio_file};
use crate::foundation::core::PixelSize;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::script::model::AssetRef;

/// Native pixel dimensions of an illustration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ImageDims {
    /// Width in pixels (> 0).
    pub width: u32,
    /// Height in pixels (> 0).
    pub height: u32,
}

impl ImageDims {
    /// Pixel size view.
    pub fn size(self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

/// Source of per-segment asset facts and pixels.
///
/// Probing reads headers only; decoding is requested once per segment after the fit is known.
/// Implementations must be callable from several preparation workers at once.
pub trait AssetProbe: Sync {
    /// Duration and format of a voice clip.
    fn probe_audio(&self, asset: &AssetRef) -> NewsreelResult<ProbedAudio>;
    /// Native dimensions of an illustration.
    fn probe_image(&self, asset: &AssetRef) -> NewsreelResult<ImageDims>;
    /// Decoded voice samples.
    fn decode_audio(&self, asset: &AssetRef) -> NewsreelResult<AudioPcm>;
    /// Decoded illustration resampled to `target`.
    fn decode_image(&self, asset: &AssetRef, target: PixelSize) -> NewsreelResult<PreparedImage>;
}

/// [`AssetProbe`] over local files.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsAssetProbe;

impl FsAssetProbe {
    /// Create a filesystem probe.
    pub fn new() -> Self {
        Self
    }
}

impl AssetProbe for FsAssetProbe {
    fn probe_audio(&self, asset: &AssetRef) -> NewsreelResult<ProbedAudio> {
        probe_audio_file(asset.path())
    }

    fn probe_image(&self, asset: &AssetRef) -> NewsreelResult<ImageDims> {
        probe_image_file(asset.path())
    }

    fn decode_audio(&self, asset: &AssetRef) -> NewsreelResult<AudioPcm> {
        decode_audio_file(asset.path())
    }

    fn decode_image(&self, asset: &AssetRef, target: PixelSize) -> NewsreelResult<PreparedImage> {
        load_image_resized(asset.path(), target.width, target.height)
    }
}

/// Read image dimensions from the file header.
pub fn probe_image_file(path: &Path) -> NewsreelResult<ImageDims> {
    let (width, height) = image::ImageReader::open(path)
        .map_err(|e| NewsreelError::unreadable(path, e))?
        .with_guessed_format()
        .map_err(|e| NewsreelError::unreadable(path, e))?
        .into_dimensions()
        .map_err(|e| NewsreelError::unreadable(path, e))?;
    if width == 0 || height == 0 {
        return Err(NewsreelError::empty(path));
    }
    Ok(ImageDims { width, height })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/probe.rs"]
mod tests;
