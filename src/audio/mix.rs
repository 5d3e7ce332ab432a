use std::path::Path;

use crate::assets::media::AudioPcm;
use crate::foundation::error::{NewsreelError, NewsreelResult};
use crate::segment::builder::SegmentClip;
use crate::timeline::track::Track;

/// Lay each clip's voice end to end as interleaved stereo PCM at `sample_rate`.
///
/// Clip `i` starts at sample `round(start_sec * sample_rate)` and fills exactly its slot up to the
/// next clip's start; short sources are padded with silence, long ones are cut.
pub fn concat_voice_track(track: &Track<SegmentClip>, sample_rate: u32) -> Vec<f32> {
    let to_sample = |secs: f64| (secs * f64::from(sample_rate)).round().max(0.0) as usize;
    let total = to_sample(track.total_duration_sec());
    let mut out = vec![0.0f32; total * 2];

    for clip in track.clips() {
        let start = to_sample(clip.start_sec);
        let end = to_sample(clip.end_sec()).min(total);
        place_resampled(&mut out[start * 2..end * 2], &clip.item.voice, sample_rate);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn place_resampled(dst: &mut [f32], src: &AudioPcm, sample_rate: u32) {
    let channels = usize::from(src.channels);
    let src_frames = src.frames();
    if src_frames == 0 || channels == 0 || src.sample_rate == 0 {
        return;
    }
    let ratio = f64::from(src.sample_rate) / f64::from(sample_rate);
    let samples = &src.interleaved_f32;

    for (i, out) in dst.chunks_exact_mut(2).enumerate() {
        let pos = i as f64 * ratio;
        let f0 = pos.floor() as usize;
        if f0 >= src_frames {
            break;
        }
        let f1 = (f0 + 1).min(src_frames - 1);
        let frac = (pos - f0 as f64) as f32;

        let at = |frame: usize, ch: usize| samples[frame * channels + ch.min(channels - 1)];
        let lerp = |ch: usize| at(f0, ch) + (at(f1, ch) - at(f0, ch)) * frac;
        out[0] = lerp(0);
        out[1] = lerp(1);
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> NewsreelResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            NewsreelError::encode(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        NewsreelError::encode(format!(
            "failed to write voice track '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
