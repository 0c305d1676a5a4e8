//! Hit testing: screen click → connection lookup.
//!
//! Each curve carries an invisible 10 px band for click detection,
//! expressed analytically: a point hits a connection when its distance to
//! the curve is at most half the band width, computed with kurbo's
//! nearest-point query. A drawing backend plugged into this crate does not
//! need its own stroke-containment test.

use crate::curve::{HIT_WIDTH, visible_curves};
use kurbo::{ParamCurveNearest, Point};
use sf_core::{Camera, Diagram};

/// Accuracy for the nearest-point solve, in screen pixels. Far finer than
/// the band width, coarse enough to stay cheap per click.
const NEAREST_ACCURACY: f64 = 1e-3;

/// Resolve a screen click to a connection index.
///
/// Connections are tested in list order and the first hit wins; edges with
/// a playback-hidden endpoint are skipped entirely.
pub fn hit_test(point: Point, diagram: &Diagram, camera: &Camera) -> Option<usize> {
    let radius = HIT_WIDTH / 2.0;
    for (index, spec) in visible_curves(diagram, camera) {
        let nearest = spec.curve.nearest(point, NEAREST_ACCURACY);
        if nearest.distance_sq <= radius * radius {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{curve_for, point_at};
    use sf_core::BubbleKind;

    fn two_bubble_diagram() -> (Diagram, Camera) {
        let mut d = Diagram::new();
        let a = d.add_bubble("a", 0.0, 0.0, BubbleKind::Idea);
        let b = d.add_bubble("b", 600.0, 0.0, BubbleKind::Idea);
        d.connect(a, b, "");
        (d, Camera::default())
    }

    #[test]
    fn click_on_curve_hits() {
        let (d, camera) = two_bubble_diagram();
        let spec = curve_for(&d.connections()[0], &d, &camera).unwrap();
        let on_curve = point_at(&spec, 0.37);
        assert_eq!(hit_test(on_curve, &d, &camera), Some(0));
    }

    #[test]
    fn click_just_outside_band_misses() {
        let (d, camera) = two_bubble_diagram();
        let spec = curve_for(&d.connections()[0], &d, &camera).unwrap();
        let apex = point_at(&spec, 0.5);
        // 6 px above the apex is outside the 5 px band radius.
        let near_miss = Point::new(apex.x, apex.y - 6.0);
        assert_eq!(hit_test(near_miss, &d, &camera), None);

        let far = Point::new(apex.x, apex.y - 500.0);
        assert_eq!(hit_test(far, &d, &camera), None);
    }

    #[test]
    fn hidden_endpoint_not_hit_testable() {
        let (mut d, camera) = two_bubble_diagram();
        let spec = curve_for(&d.connections()[0], &d, &camera).unwrap();
        let on_curve = point_at(&spec, 0.5);

        let from = d.connections()[0].from;
        d.get_mut(from).unwrap().visible = false;
        assert_eq!(hit_test(on_curve, &d, &camera), None);
    }

    #[test]
    fn first_connection_in_order_wins() {
        // Two connections tracing the identical curve: the earlier index is
        // reported.
        let mut d = Diagram::new();
        let a = d.add_bubble("a", 0.0, 0.0, BubbleKind::Idea);
        let b = d.add_bubble("b", 600.0, 0.0, BubbleKind::Idea);
        d.connect(a, b, "first");
        d.connect(a, b, "second");
        let camera = Camera::default();

        let spec = curve_for(&d.connections()[1], &d, &camera).unwrap();
        let on_curve = point_at(&spec, 0.5);
        assert_eq!(hit_test(on_curve, &d, &camera), Some(0));
    }
}
