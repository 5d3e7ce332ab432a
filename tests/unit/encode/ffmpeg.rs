use super::*;
use crate::encode::sink::AudioInputConfig;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn flatten_rejects_length_mismatch() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &[0u8; 4], [0, 0, 0, 255]).is_err());
}

fn args_of(cmd: &Command) -> Vec<String> {
    cmd.get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn command_line_muxes_audio_when_configured() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out/video.partial.mp4"));
    let cfg = SinkConfig {
        width: 1080,
        height: 1920,
        fps: Fps::integer(24).unwrap(),
        audio: Some(AudioInputConfig {
            path: PathBuf::from("voice.f32le"),
            sample_rate: 48_000,
            channels: 2,
        }),
    };
    let args = args_of(&sink.build_command(&cfg).unwrap());
    let joined = args.join(" ");
    assert_eq!(args[0], "-y");
    assert!(joined.contains("-s 1080x1920"));
    assert!(joined.contains("-r 24/1 -i pipe:0"));
    assert!(joined.contains("-f f32le -ar 48000 -ac 2 -i voice.f32le"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -c:a aac -shortest"));
    assert_eq!(args.last().unwrap(), "out/video.partial.mp4");
}

#[test]
fn command_line_without_audio_disables_audio_stream() {
    let mut opts = FfmpegSinkOpts::new("v.mp4");
    opts.overwrite = false;
    let sink = FfmpegSink::new(opts);
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::integer(24).unwrap(),
        audio: None,
    };
    let args = args_of(&sink.build_command(&cfg).unwrap());
    assert_eq!(args[0], "-n");
    assert!(args.iter().any(|a| a == "-an"));
    assert!(!args.iter().any(|a| a == "aac"));
}

#[test]
fn command_line_forces_mp4_container_for_any_extension() {
    let cfg = SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::integer(24).unwrap(),
        audio: None,
    };
    for out in ["clip.mkv", "clip"] {
        let sink = FfmpegSink::new(FfmpegSinkOpts::new(out));
        let args = args_of(&sink.build_command(&cfg).unwrap());
        assert_eq!(&args[args.len() - 3..], ["-f", "mp4", out]);
    }
}

#[test]
fn begin_rejects_odd_dimensions() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/newsreel-unit/odd.mp4"));
    let err = sink
        .begin(SinkConfig {
            width: 3,
            height: 2,
            fps: Fps::integer(24).unwrap(),
            audio: None,
        })
        .unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}
