use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![v, v, v, 255],
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 1,
        height: 1,
        fps: Fps::integer(24).unwrap(),
        audio: None,
    }
}

#[test]
fn in_memory_sink_deduplicates_consecutive_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    for (i, v) in [1u8, 1, 2, 2, 2, 1].into_iter().enumerate() {
        sink.push_frame(FrameIndex(i as u64), &frame(v)).unwrap();
    }
    sink.end().unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.frame_count(), 6);
    assert_eq!(sink.distinct_frames(), 3);
    assert_eq!(sink.frame_at(4).unwrap().data[0], 2);
    assert_eq!(sink.frame_at(5).unwrap().data[0], 1);
    assert!(sink.frame_at(6).is_none());
    assert_eq!(sink.config().unwrap().fps.num, 24);
}

#[test]
fn in_memory_sink_rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    assert!(sink.push_frame(FrameIndex(0), &frame(0)).is_err());
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(0)).unwrap();
    assert!(sink.push_frame(FrameIndex(2), &frame(0)).is_err());
}
