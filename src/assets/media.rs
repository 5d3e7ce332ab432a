use std::path::Path;

use crate::foundation::error::{NewsreelError, NewsreelResult};

/// Sample rate of the concatenated voice track handed to the encoder.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count of the concatenated voice track handed to the encoder.
pub const MIX_CHANNELS: u16 = 2;

/// Header facts of one voice clip.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ProbedAudio {
    /// Playback length in seconds (> 0).
    pub duration_sec: f64,
    /// Native sample rate in Hz.
    pub sample_rate: u32,
    /// Native channel count.
    pub channels: u16,
}

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples in `[-1, 1]`.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.interleaved_f32.len() / usize::from(self.channels)
    }

    /// Length in seconds.
    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

pub(crate) fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

/// Read the WAV header and derive the clip duration without decoding samples.
pub fn probe_wav(path: &Path) -> NewsreelResult<ProbedAudio> {
    let reader = hound::WavReader::open(path).map_err(|e| NewsreelError::unreadable(path, e))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 || spec.channels == 0 {
        return Err(NewsreelError::unreadable(
            path,
            "wav header has zero sample rate or channel count",
        ));
    }
    // `duration` counts frames, i.e. samples per channel.
    let frames = reader.duration();
    if frames == 0 {
        return Err(NewsreelError::empty(path));
    }
    Ok(ProbedAudio {
        duration_sec: f64::from(frames) / f64::from(spec.sample_rate),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Decode a WAV file to interleaved `f32` PCM at its native rate and channel count.
pub fn decode_wav(path: &Path) -> NewsreelResult<AudioPcm> {
    let mut reader =
        hound::WavReader::open(path).map_err(|e| NewsreelError::unreadable(path, e))?;
    let spec = reader.spec();

    let interleaved_f32 = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| NewsreelError::unreadable(path, e))?,
        hound::SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(NewsreelError::unreadable(
                    path,
                    format!("unsupported bit depth {}", spec.bits_per_sample),
                ));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32 / scale).clamp(-1.0, 1.0)))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| NewsreelError::unreadable(path, e))?
        }
    };

    if interleaved_f32.is_empty() {
        return Err(NewsreelError::empty(path));
    }

    Ok(AudioPcm {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        interleaved_f32,
    })
}

/// Probe a non-WAV audio container through `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_audio_ffprobe(path: &Path) -> NewsreelResult<ProbedAudio> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        sample_rate: Option<String>,
        channels: Option<u16>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| NewsreelError::unreadable(path, format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(NewsreelError::unreadable(
            path,
            format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        ));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| NewsreelError::unreadable(path, format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"))
        .ok_or_else(|| NewsreelError::unreadable(path, "no audio stream found"))?;

    let sample_rate = stream
        .sample_rate
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| NewsreelError::unreadable(path, "missing audio sample rate"))?;
    let channels = stream
        .channels
        .ok_or_else(|| NewsreelError::unreadable(path, "missing audio channel count"))?;
    let duration_sec = stream
        .duration
        .as_deref()
        .or(parsed.format.as_ref().and_then(|f| f.duration.as_deref()))
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| NewsreelError::unreadable(path, "missing audio duration"))?;

    if !duration_sec.is_finite() || duration_sec <= 0.0 {
        return Err(NewsreelError::empty(path));
    }

    Ok(ProbedAudio {
        duration_sec,
        sample_rate,
        channels,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Probe a non-WAV audio container through `ffprobe`.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
pub fn probe_audio_ffprobe(path: &Path) -> NewsreelResult<ProbedAudio> {
    Err(NewsreelError::unreadable(
        path,
        "non-wav audio requires the 'media-ffmpeg' feature",
    ))
}

#[cfg(feature = "media-ffmpeg")]
/// Decode audio from any ffmpeg-readable container to stereo interleaved `f32` PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> NewsreelResult<AudioPcm> {
    let out = std::process::Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| {
            NewsreelError::unreadable(path, format!("failed to run ffmpeg for audio decode: {e}"))
        })?;

    if !out.status.success() {
        return Err(NewsreelError::unreadable(
            path,
            format!(
                "ffmpeg audio decode failed: {}",
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        ));
    }
    if !out.stdout.len().is_multiple_of(4) {
        return Err(NewsreelError::unreadable(
            path,
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    if out.stdout.is_empty() {
        return Err(NewsreelError::empty(path));
    }

    let interleaved_f32 = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
/// Decode audio from any ffmpeg-readable container to stereo interleaved `f32` PCM.
///
/// Returns an error when the `media-ffmpeg` feature is disabled.
pub fn decode_audio_f32_stereo(path: &Path, _sample_rate: u32) -> NewsreelResult<AudioPcm> {
    Err(NewsreelError::unreadable(
        path,
        "non-wav audio requires the 'media-ffmpeg' feature",
    ))
}

/// Probe any supported voice clip: WAV through `hound`, everything else through `ffprobe`.
pub fn probe_audio_file(path: &Path) -> NewsreelResult<ProbedAudio> {
    if is_wav(path) {
        probe_wav(path)
    } else {
        probe_audio_ffprobe(path)
    }
}

/// Decode any supported voice clip to interleaved PCM.
pub fn decode_audio_file(path: &Path) -> NewsreelResult<AudioPcm> {
    if is_wav(path) {
        decode_wav(path)
    } else {
        decode_audio_f32_stereo(path, MIX_SAMPLE_RATE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
