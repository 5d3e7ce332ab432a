use std::path::{Path, PathBuf};

use crate::assets::probe::AssetProbe;
use crate::assets::text::{FontSet, TextLayoutEngine};
use crate::caption::renderer::{CaptionRenderer, CaptionStyle};
use crate::composition::compositor::{CompositedTimeline, Compositor};
use crate::config::settings::RenderConfig;
use crate::foundation::core::PixelSize;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::layout::fit::{FitResult, fit_to_box};
use crate::render::pipeline::{RenderOutcome, RenderToFileOpts, Renderer};
use crate::script::model::{AssetSet, Script};
use crate::script::schema::ScriptDocument;
use crate::segment::prepare::{CancelToken, PrepareOpts, prepare_segments};
use crate::timeline::track::TrackAssembler;

/// Read a script file and bind it to the numbered assets in `assets_dir`.
pub fn load_script(script_path: &Path, assets_dir: &Path) -> NewsreelResult<Script> {
    let doc = ScriptDocument::from_path(script_path)?;
    let assets = AssetSet::numbered(assets_dir, doc.len());
    Script::bind(doc, assets)
}

/// One script-to-video run: fonts and configuration are fixed for the session's lifetime.
pub struct ProductionSession<'p> {
    config: RenderConfig,
    probe: &'p dyn AssetProbe,
    fonts: FontSet,
    engine: TextLayoutEngine,
    cancel: CancelToken,
}

impl<'p> ProductionSession<'p> {
    /// Validate `config`, load its fonts and read assets through `probe`.
    pub fn new(config: RenderConfig, probe: &'p dyn AssetProbe) -> NewsreelResult<Self> {
        config.validate()?;
        let fonts = FontSet::from_config(&config)?;
        Ok(Self {
            config,
            probe,
            fonts,
            engine: TextLayoutEngine::new(),
            cancel: CancelToken::new(),
        })
    }

    /// Token that cancels segment preparation of this session.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Session configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Prepare every segment and stack the result into a timeline.
    #[tracing::instrument(skip_all, fields(segments = script.len()))]
    pub fn compose(&mut self, script: &Script) -> NewsreelResult<CompositedTimeline> {
        let prepared = prepare_segments(
            script.segments(),
            self.probe,
            &PrepareOpts {
                content_box: self.config.content_box(),
                workers: self.config.workers,
            },
            &self.cancel,
        )?;

        let captions = CaptionRenderer::new(
            CaptionStyle::from_config(&self.config),
            self.fonts.caption.clone(),
        );
        let mut clips = Vec::with_capacity(prepared.len());
        let mut overlays = Vec::with_capacity(prepared.len());
        for p in prepared {
            overlays.push(captions.layout(p.cue, &mut self.engine)?);
            clips.push(p.clip);
        }

        let (content, caption_track) = TrackAssembler::assemble(script.len(), clips, overlays)?;
        Compositor::new(self.config.clone(), self.fonts.clone())?.compose(
            script.title(),
            content,
            caption_track,
            &mut self.engine,
        )
    }

    /// Compose `script` and encode it to `out_path`.
    #[tracing::instrument(skip(self, script), fields(out = %out_path.display()))]
    pub fn produce(
        &mut self,
        script: &Script,
        out_path: &Path,
        with_audio: bool,
    ) -> NewsreelResult<RenderOutcome> {
        let timeline = self.compose(script)?;
        Renderer::new(RenderToFileOpts {
            overwrite: self.config.overwrite,
            with_audio,
        })
        .render_to_file(&timeline, out_path)
    }
}

/// Probe results for one numbered asset pair.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct AssetReport {
    /// 1-based segment index.
    pub index: u32,
    /// Illustration path.
    pub image: PathBuf,
    /// Voice clip path.
    pub audio: PathBuf,
    /// Voice duration in seconds.
    pub duration_sec: f64,
    /// Native illustration size.
    pub native: PixelSize,
    /// Size after fitting into the content box.
    pub fit: FitResult,
}

/// Probe `count` numbered asset pairs in `dir` without decoding them.
#[tracing::instrument(skip(probe))]
pub fn probe_assets(
    dir: &Path,
    count: usize,
    probe: &dyn AssetProbe,
    content_box: PixelSize,
) -> NewsreelResult<Vec<AssetReport>> {
    if count == 0 {
        return Err(NewsreelError::validation("asset count must be >= 1"));
    }
    let set = AssetSet::numbered(dir, count);
    set.images
        .iter()
        .zip(&set.audios)
        .enumerate()
        .map(|(i, (image, audio))| {
            let index = (i + 1) as u32;
            let a = probe.probe_audio(audio).map_err(|e| e.with_segment(index))?;
            let dims = probe.probe_image(image).map_err(|e| e.with_segment(index))?;
            Ok(AssetReport {
                index,
                image: image.path().to_path_buf(),
                audio: audio.path().to_path_buf(),
                duration_sec: a.duration_sec,
                native: dims.size(),
                fit: fit_to_box(dims, content_box),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/session/produce.rs"]
mod tests;
