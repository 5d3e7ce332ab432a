use super::*;

const CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

#[test]
fn center_places_content_box_in_the_middle() {
    let off = Placement::Center.resolve(CANVAS, 1000.0, 750.0);
    assert_eq!(off, Vec2::new(40.0, 585.0));
}

#[test]
fn bottom_center_anchors_to_bottom_edge() {
    let off = Placement::BottomCenter { margin: 0.0 }.resolve(CANVAS, 900.0, 400.0);
    assert_eq!(off, Vec2::new(90.0, 1520.0));

    let off = Placement::BottomCenter { margin: 20.0 }.resolve(CANVAS, 900.0, 400.0);
    assert_eq!(off.y, 1500.0);
}

#[test]
fn oversized_items_stay_on_canvas_origin() {
    let off = Placement::BottomCenter { margin: 0.0 }.resolve(CANVAS, 2000.0, 2500.0);
    assert_eq!(off, Vec2::ZERO);
}

#[test]
fn top_anchors_use_margins() {
    assert_eq!(
        Placement::TopCenter { margin: 80.0 }.resolve(CANVAS, 200.0, 40.0),
        Vec2::new(440.0, 80.0)
    );
    assert_eq!(
        Placement::TopLeft {
            margin_x: 60.0,
            margin_y: 180.0
        }
        .resolve(CANVAS, 500.0, 64.0),
        Vec2::new(60.0, 180.0)
    );
    assert_eq!(Placement::Fill.resolve(CANVAS, 1.0, 1.0), Vec2::ZERO);
}
