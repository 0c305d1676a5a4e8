//! SF render: screen-space connection geometry and hit testing.
//!
//! Backend-agnostic — produces kurbo curves and points for whatever canvas
//! or GPU layer the host plugs in.

pub mod curve;
pub mod hit;

pub use curve::{
    ARC_LIFT, CurveSpec, HIT_WIDTH, LABEL_LIFT, STROKE_WIDTH, bubble_center, curve_between,
    curve_for, visible_curves,
};
pub use hit::hit_test;
