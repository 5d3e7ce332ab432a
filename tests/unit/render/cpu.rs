use super::*;
use crate::render::pipeline::frame_state;
use crate::test_support::fake_timeline;

const SMALL: Canvas = Canvas {
    width: 40,
    height: 60,
};

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn background_and_centered_image_are_drawn() {
    let tl = fake_timeline(&[1.0, 1.0], SMALL, 24);
    let mut raster = CpuRasterizer::new(SMALL).unwrap();

    let frame = raster.render(&tl, &frame_state(&tl, 0.0)).unwrap();
    assert_eq!((frame.width, frame.height), (40, 60));
    assert!(frame.premultiplied);
    // 1600x1200 fits a 40x60 box as 40x30, centered vertically at y = 15.
    assert!(close(frame.pixel(0, 5).unwrap(), [42, 195, 8, 255]));
    assert!(close(frame.pixel(20, 30).unwrap(), [0, 255, 128, 255]));
    assert!(close(frame.pixel(20, 50).unwrap(), [42, 195, 8, 255]));

    let second = raster.render(&tl, &frame_state(&tl, 1.5)).unwrap();
    assert!(close(second.pixel(20, 30).unwrap(), [40, 215, 128, 255]));
}

#[test]
fn transparent_layers_are_skipped() {
    let tl = fake_timeline(&[1.0], SMALL, 24);
    let mut raster = CpuRasterizer::new(SMALL).unwrap();
    let mut state = frame_state(&tl, 0.0);
    state.layer_alpha[1] = 0;
    let frame = raster.render(&tl, &state).unwrap();
    assert!(close(frame.pixel(20, 30).unwrap(), [42, 195, 8, 255]));
}

#[test]
fn state_must_match_layer_stack() {
    let tl = fake_timeline(&[1.0], SMALL, 24);
    let mut raster = CpuRasterizer::new(SMALL).unwrap();
    let mut state = frame_state(&tl, 0.0);
    state.layer_alpha.pop();
    assert!(raster.render(&tl, &state).is_err());

    let mut other = CpuRasterizer::new(Canvas {
        width: 20,
        height: 20,
    })
    .unwrap();
    assert!(other.render(&tl, &frame_state(&tl, 0.0)).is_err());
}

#[test]
fn oversized_canvas_is_rejected() {
    assert!(
        CpuRasterizer::new(Canvas {
            width: 70_000,
            height: 10
        })
        .is_err()
    );
}
