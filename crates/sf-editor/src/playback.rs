//! Ordered playback: timed reveal of bubbles with narration and camera
//! follow.
//!
//! The scheduler is tick-driven: the host calls [`Playback::tick`] from its
//! frame loop with a monotonic `Instant`, and the scheduler fires the next
//! advance or pan step when its deadline passes. Cancellation is cooperative
//! — a cancelled pan or a stopped playback lets its pending step observe the
//! token once more and exit without effect; nothing is forcibly killed.

use crate::voice::Narrator;
use sf_core::{BubbleId, Camera, Diagram};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Delay between bubble reveals.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(3000);
/// Duration of the camera pan toward a revealed bubble.
pub const PAN_DURATION: Duration = Duration::from_millis(600);

// ─── Cancellation ────────────────────────────────────────────────────────

/// Shared cancellation token. Cloned into a task; `cancel()` from anywhere
/// makes every subsequent step of that task a no-op.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ─── Camera pan task ─────────────────────────────────────────────────────

/// Linear camera-origin animation toward a target, interruptible via its
/// token. Each step checks the token first and exits silently if cleared.
#[derive(Debug, Clone)]
pub struct PanTask {
    from: (f32, f32),
    to: (f32, f32),
    started: Instant,
    duration: Duration,
    token: CancelToken,
}

impl PanTask {
    pub fn new(camera: &Camera, target: (f32, f32), now: Instant) -> Self {
        Self {
            from: (camera.cam_x, camera.cam_y),
            to: target,
            started: now,
            duration: PAN_DURATION,
            token: CancelToken::default(),
        }
    }

    /// Handle for interrupting this pan (user drag, stop).
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advance the animation. Returns `false` when the pan is finished or
    /// cancelled and should be dropped.
    pub fn step(&self, now: Instant, camera: &mut Camera) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        camera.cam_x = self.from.0 + (self.to.0 - self.from.0) * t;
        camera.cam_y = self.from.1 + (self.to.1 - self.from.1) * t;
        t < 1.0
    }
}

// ─── Scheduler ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

/// Walks bubbles in replay order, revealing and narrating one every
/// [`ADVANCE_DELAY`], panning the camera to each.
pub struct Playback {
    state: PlaybackState,
    sequence: Vec<BubbleId>,
    cursor: usize,
    /// Deadline for the next reveal, with its cancellation handle.
    next_advance: Option<(Instant, CancelToken)>,
    pan: Option<PanTask>,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            sequence: Vec::new(),
            cursor: 0,
            next_advance: None,
            pan: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Replay order: explicit `order` when present, else the bubble's
    /// insertion index, ties broken by insertion index. The key is computed
    /// per bubble so the sort is stable by construction.
    pub fn ordered_sequence(diagram: &Diagram) -> Vec<BubbleId> {
        let mut keyed: Vec<(u64, usize, BubbleId)> = diagram
            .bubbles()
            .iter()
            .enumerate()
            .map(|(i, b)| (b.order.map_or(i as u64, u64::from), i, b.id))
            .collect();
        keyed.sort_by_key(|&(order, index, _)| (order, index));
        keyed.into_iter().map(|(_, _, id)| id).collect()
    }

    /// Begin playback from any state: hide every bubble, rebuild the
    /// ordered sequence, and reveal the first entry immediately.
    pub fn start(
        &mut self,
        now: Instant,
        diagram: &mut Diagram,
        camera: &mut Camera,
        narrator: Option<&mut (dyn Narrator + 'static)>,
    ) {
        for b in diagram.bubbles_mut() {
            b.visible = false;
        }
        self.sequence = Self::ordered_sequence(diagram);
        self.cursor = 0;
        self.state = PlaybackState::Playing;
        self.cancel_pending();
        self.advance(now, diagram, camera, narrator);
    }

    /// Playing → Paused. The revealed bubble stays visible; a pending
    /// advance is suppressed when its deadline elapses.
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Paused → Playing, advancing immediately to the next entry. The
    /// paused bubble is not re-revealed or re-narrated.
    pub fn resume(
        &mut self,
        now: Instant,
        diagram: &mut Diagram,
        camera: &mut Camera,
        narrator: Option<&mut (dyn Narrator + 'static)>,
    ) {
        if self.state != PlaybackState::Paused {
            return;
        }
        self.state = PlaybackState::Playing;
        self.cancel_pending();
        self.advance(now, diagram, camera, narrator);
    }

    /// Exit playback mode. Revealed bubbles remain visible — stop means
    /// "leave playback", not "rewind".
    pub fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.sequence.clear();
        self.cursor = 0;
        self.cancel_pending();
        self.interrupt_pan();
    }

    /// Cancel an in-flight camera pan (user-initiated pan/drag).
    pub fn interrupt_pan(&mut self) {
        if let Some(pan) = self.pan.take() {
            pan.token().cancel();
        }
    }

    /// Drive timers: the pan animation and the reveal deadline. Call once
    /// per frame.
    pub fn tick(
        &mut self,
        now: Instant,
        diagram: &mut Diagram,
        camera: &mut Camera,
        narrator: Option<&mut (dyn Narrator + 'static)>,
    ) {
        if let Some(pan) = self.pan.take()
            && pan.step(now, camera)
        {
            self.pan = Some(pan);
        }

        if let Some((deadline, token)) = self.next_advance.clone() {
            if token.is_cancelled() {
                self.next_advance = None;
            } else if self.state == PlaybackState::Playing && now >= deadline {
                self.next_advance = None;
                self.advance(now, diagram, camera, narrator);
            }
        }
    }

    /// Reveal the bubble at the cursor, narrate it, start the camera pan,
    /// and schedule the next advance.
    fn advance(
        &mut self,
        now: Instant,
        diagram: &mut Diagram,
        camera: &mut Camera,
        narrator: Option<&mut (dyn Narrator + 'static)>,
    ) {
        if self.state != PlaybackState::Playing || self.cursor >= self.sequence.len() {
            self.stop();
            return;
        }

        let id = self.sequence[self.cursor];
        if let Some(bubble) = diagram.get_mut(id) {
            bubble.visible = true;
            let text = bubble.text.clone();
            let target = camera.origin_centering(bubble.x, bubble.y);

            match narrator {
                Some(n) => n.speak(&text),
                None => log::warn!("narration unavailable, playing silently"),
            }

            self.interrupt_pan();
            self.pan = Some(PanTask::new(camera, target, now));
        }

        self.cursor += 1;
        self.next_advance = Some((now + ADVANCE_DELAY, CancelToken::default()));
    }

    fn cancel_pending(&mut self) {
        if let Some((_, token)) = self.next_advance.take() {
            token.cancel();
        }
    }
}
