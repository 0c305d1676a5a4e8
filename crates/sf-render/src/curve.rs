//! Connection curve geometry.
//!
//! Every connection is drawn as a cubic Bezier between the screen-projected
//! centers of its bubbles. The control points sit 25% of the horizontal
//! span in from each endpoint and are lifted upward by a fixed amount scaled
//! with zoom, giving a shallow arc regardless of bubble separation.
//!
//! Two strokes share one curve: a thin visible stroke and a wide invisible
//! band used for click detection. The band width is fixed in screen pixels,
//! independent of zoom, so connections stay clickable when zoomed out.

use kurbo::{CubicBez, ParamCurve, Point};
use sf_core::{BUBBLE_HEIGHT, BUBBLE_WIDTH, Bubble, Camera, Connection, Diagram};

/// Width of the visible stroke, in screen pixels.
pub const STROKE_WIDTH: f64 = 3.0;
/// Width of the invisible hit band, in screen pixels. Not zoom-scaled.
pub const HIT_WIDTH: f64 = 10.0;
/// Upward control-point offset in screen pixels at zoom 1.
pub const ARC_LIFT: f32 = 50.0;
/// Upward label offset from the chord midpoint at zoom 1.
pub const LABEL_LIFT: f32 = 10.0;

/// A connection's renderable geometry, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSpec {
    pub curve: CubicBez,
    /// Where the label text is centered.
    pub label_pos: Point,
}

/// Screen-space center of a bubble. The half-extent offset is applied in
/// screen pixels, after the camera transform.
pub fn bubble_center(bubble: &Bubble, camera: &Camera) -> Point {
    let (sx, sy) = camera.to_screen(bubble.x, bubble.y);
    Point::new(
        sx as f64 + BUBBLE_WIDTH as f64 / 2.0,
        sy as f64 + BUBBLE_HEIGHT as f64 / 2.0,
    )
}

/// Curve between two screen points.
pub fn curve_between(from: Point, to: Point, zoom: f32) -> CurveSpec {
    let lift = (ARC_LIFT * zoom) as f64;
    let c1 = Point::new(from.x + (to.x - from.x) * 0.25, from.y - lift);
    let c2 = Point::new(to.x - (to.x - from.x) * 0.25, to.y - lift);
    let label_pos = Point::new(
        (from.x + to.x) / 2.0,
        (from.y + to.y) / 2.0 - (LABEL_LIFT * zoom) as f64,
    );
    CurveSpec {
        curve: CubicBez::new(from, c1, c2, to),
        label_pos,
    }
}

/// Geometry for one connection, or `None` when either endpoint is missing
/// or playback-hidden. Hidden connections are skipped from rendering and
/// hit testing alike.
pub fn curve_for(connection: &Connection, diagram: &Diagram, camera: &Camera) -> Option<CurveSpec> {
    let from = diagram.get(connection.from)?;
    let to = diagram.get(connection.to)?;
    if !from.visible || !to.visible {
        return None;
    }
    Some(curve_between(
        bubble_center(from, camera),
        bubble_center(to, camera),
        camera.zoom,
    ))
}

/// All drawable connections for this frame, in connection order, paired
/// with their index.
pub fn visible_curves<'a>(
    diagram: &'a Diagram,
    camera: &Camera,
) -> impl Iterator<Item = (usize, CurveSpec)> + 'a {
    let camera = *camera;
    diagram
        .connections()
        .iter()
        .enumerate()
        .filter_map(move |(i, c)| Some((i, curve_for(c, diagram, &camera)?)))
}

/// Point on a curve at parameter `t`. Convenience for backends that place
/// decorations (arrowheads, flow dots) along the stroke.
pub fn point_at(spec: &CurveSpec, t: f64) -> Point {
    spec.curve.eval(t)
}
