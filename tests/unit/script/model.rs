use super::*;
use crate::script::schema::ScriptEntry;

fn doc(n: usize) -> ScriptDocument {
    ScriptDocument {
        title: "Headline".to_string(),
        summary_and_images: (1..=n)
            .map(|i| ScriptEntry {
                sentence: format!("sentence {i}"),
                image_prompt: format!("prompt {i}"),
            })
            .collect(),
    }
}

#[test]
fn bind_numbers_segments_from_one() {
    let script = Script::bind(doc(3), AssetSet::numbered(Path::new("assets"), 3)).unwrap();
    assert_eq!(script.len(), 3);
    assert_eq!(script.title(), "Headline");
    let idx: Vec<u32> = script.segments().iter().map(|s| s.index).collect();
    assert_eq!(idx, vec![1, 2, 3]);
    assert_eq!(
        script.segments()[1].image.path(),
        Path::new("assets/image2.png")
    );
    assert_eq!(
        script.segments()[2].audio.path(),
        Path::new("assets/audio3.wav")
    );
    assert_eq!(script.segments()[0].sentence, "sentence 1");
}

#[test]
fn bind_rejects_count_mismatch() {
    let mut assets = AssetSet::numbered(Path::new("assets"), 3);
    assets.images.pop();
    let err = Script::bind(doc(3), assets).unwrap_err();
    match err {
        NewsreelError::AssetCountMismatch {
            segments,
            images,
            audios,
        } => {
            assert_eq!((segments, images, audios), (3, 2, 3));
        }
        other => panic!("unexpected error: {other}"),
    }

    let assets = AssetSet::numbered(Path::new("assets"), 4);
    assert!(matches!(
        Script::bind(doc(3), assets),
        Err(NewsreelError::AssetCountMismatch { .. })
    ));
}

#[test]
fn bind_rejects_empty_script() {
    let err = Script::bind(doc(0), AssetSet::default()).unwrap_err();
    assert!(matches!(err, NewsreelError::Validation(_)));
}

#[test]
fn from_segments_requires_contiguous_indices() {
    let script = Script::bind(doc(2), AssetSet::numbered(Path::new("a"), 2)).unwrap();
    let mut segs = script.segments().to_vec();
    segs[1].index = 3;
    assert!(Script::from_segments("t".to_string(), segs).is_err());
}
