//! Anchored placement: find a clear position for a new bubble near an anchor.
//!
//! Candidates are enumerated on concentric rings around the anchor — a full
//! turn of angles at one radius, then the next radius out — and scored by an
//! inverse-square repulsion from every existing bubble plus a bias toward the
//! current view center. The search is bounded (`max_attempts` candidates) and
//! fully deterministic; only the no-candidate fallback draws randomness.
//!
//! The fallback offsets far from the anchor (`[600, 900)` on both axes). In a
//! pathologically dense layout it can still land on another bubble; this is
//! inherited behavior, accepted in exchange for guaranteed forward progress.

use crate::model::{BUBBLE_WIDTH, Diagram};
use crate::viewport::Camera;
use rand::Rng;

/// Margin a candidate must beat the incumbent by. Swamps the sin/cos
/// rounding noise between geometrically tied candidates, far below any
/// genuine score difference at world scale.
const SCORE_TIE_EPS: f64 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct PlacementConfig {
    /// Radius of the innermost candidate ring, in world units.
    pub ideal_distance: f32,
    /// Extra clearance required beyond the bubble width.
    pub spacing_buffer: f32,
    /// Angular step between candidates on a ring, in degrees.
    pub angle_step_deg: f32,
    /// Radius increment between rings.
    pub radius_step: f32,
    /// Total candidate budget across all rings.
    pub max_attempts: u32,
    /// Assumed bubble width for the clearance test.
    pub bubble_width: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            ideal_distance: 250.0,
            spacing_buffer: 40.0,
            angle_step_deg: 15.0,
            radius_step: 50.0,
            max_attempts: 120,
            bubble_width: BUBBLE_WIDTH,
        }
    }
}

impl PlacementConfig {
    /// Minimum distance an accepted candidate keeps from every bubble.
    pub fn min_clearance(&self) -> f32 {
        self.bubble_width + self.spacing_buffer
    }
}

/// Find a position for a new bubble near `anchor`.
///
/// Returns the best-scoring clear candidate, or the randomized far-offset
/// fallback when the whole budget is rejected. Callers placing a bubble with
/// no anchor should use [`random_in_view`] instead.
pub fn find_position<R: Rng + ?Sized>(
    config: &PlacementConfig,
    anchor: (f32, f32),
    diagram: &Diagram,
    camera: &Camera,
    rng: &mut R,
) -> (f32, f32) {
    // Candidate math stays in f64 throughout. Same-ring candidates tie on
    // the bias term up to sin/cos rounding noise (one ulp of radius², e.g.
    // 62499.99999999999 vs 62500 at ring one), so a later candidate must
    // beat the incumbent by more than `SCORE_TIE_EPS` to replace it; exact
    // and near ties keep the earliest angle.
    let (bias_x, bias_y) = camera.visual_center();
    let (bias_x, bias_y) = (bias_x as f64, bias_y as f64);
    let clearance_sq = {
        let c = config.min_clearance() as f64;
        c * c
    };

    let mut best_score = f64::NEG_INFINITY;
    let mut best: Option<(f64, f64)> = None;

    let mut radius = config.ideal_distance as f64;
    let mut angle_deg = 0.0f64;

    for _ in 0..config.max_attempts {
        let rad = angle_deg.to_radians();
        let test_x = anchor.0 as f64 + rad.cos() * radius;
        let test_y = anchor.1 as f64 + rad.sin() * radius;

        let mut too_close = false;
        let mut repulsion = 0.0f64;

        for b in diagram.bubbles() {
            let dx = b.x as f64 - test_x;
            let dy = b.y as f64 - test_y;
            let dist_sq = dx * dx + dy * dy;

            if dist_sq < clearance_sq {
                too_close = true;
                break;
            }
            repulsion += 1.0 / dist_sq;
        }

        if !too_close {
            let bias_dx = bias_x - test_x;
            let bias_dy = bias_y - test_y;
            // Closer to the view center is better; crowded neighborhoods
            // are worse.
            let score = -repulsion - (bias_dx * bias_dx + bias_dy * bias_dy);
            if score > best_score + SCORE_TIE_EPS {
                best_score = score;
                best = Some((test_x, test_y));
            }
        }

        angle_deg += config.angle_step_deg as f64;
        if angle_deg >= 360.0 {
            angle_deg = 0.0;
            radius += config.radius_step as f64;
        }
    }

    if let Some((x, y)) = best {
        return (x as f32, y as f32);
    }

    // Degenerate fully-packed layout: jump far off so progress is never
    // blocked. Visually drifts from the cluster; accepted trade-off.
    log::debug!("placement budget exhausted near ({}, {})", anchor.0, anchor.1);
    (
        anchor.0 + rng.gen_range(600.0..900.0),
        anchor.1 + rng.gen_range(600.0..900.0),
    )
}

/// Anchorless fallback: a random position inside the current view, with a
/// margin so the bubble body stays on screen.
pub fn random_in_view<R: Rng + ?Sized>(camera: &Camera, rng: &mut R) -> (f32, f32) {
    let w = (camera.view_width - 100.0).max(1.0);
    let h = (camera.view_height - 100.0).max(1.0);
    (
        camera.cam_x + rng.gen_range(0.0..w),
        camera.cam_y + rng.gen_range(0.0..h),
    )
}
