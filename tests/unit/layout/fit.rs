use super::*;

const BOX: PixelSize = PixelSize {
    width: 1000,
    height: 800,
};

fn dims(width: u32, height: u32) -> ImageDims {
    ImageDims { width, height }
}

#[test]
fn landscape_pins_width() {
    assert_eq!(
        fit_to_box(dims(1600, 1200), BOX),
        FitResult {
            width: 1000,
            height: 750
        }
    );
}

#[test]
fn portrait_pins_height() {
    assert_eq!(
        fit_to_box(dims(900, 1800), BOX),
        FitResult {
            width: 400,
            height: 800
        }
    );
}

#[test]
fn exact_box_is_unchanged_and_fit_is_idempotent() {
    assert_eq!(fit_to_box(dims(1000, 800), BOX).size(), BOX);

    for (w, h) in [(1600, 1200), (900, 1800), (1024, 1024), (333, 777), (5000, 10)] {
        let once = fit_to_box(dims(w, h), BOX);
        let twice = fit_to_box(dims(once.width, once.height), BOX);
        assert_eq!(once, twice, "fit not idempotent for {w}x{h}");
    }
}

#[test]
fn one_axis_matches_box_and_aspect_is_kept() {
    for (w, h) in [(1600, 1200), (900, 1800), (1024, 1024), (333, 777), (1920, 1080)] {
        let fit = fit_to_box(dims(w, h), BOX);
        assert!(fit.width == BOX.width || fit.height == BOX.height);
        let expected_h = f64::from(fit.width) * f64::from(h) / f64::from(w);
        assert!(
            (expected_h - f64::from(fit.height)).abs() <= 1.0,
            "aspect drift for {w}x{h}: {fit:?}"
        );
    }
}

#[test]
fn square_image_pins_height_and_ties_pin_width() {
    // 1024/800 > 1024/1000, so height is pinned.
    assert_eq!(
        fit_to_box(dims(1024, 1024), BOX),
        FitResult {
            width: 800,
            height: 800
        }
    );
    // Equal ratios fall through to the width branch.
    assert_eq!(
        fit_to_box(dims(500, 400), BOX),
        FitResult {
            width: 1000,
            height: 800
        }
    );
}

#[test]
fn extreme_aspect_never_collapses_to_zero() {
    let fit = fit_to_box(dims(100_000, 1), BOX);
    assert_eq!(fit.width, 1000);
    assert_eq!(fit.height, 1);
}
