//! Integration tests: playback scheduling through the editor.
//!
//! Drives the tick-based scheduler with synthetic `Instant`s, verifying
//! reveal order, narration, pause/resume/stop semantics, and pan
//! interruption by user input.

use sf_core::BubbleKind;
use sf_editor::commands::Editor;
use sf_editor::playback::{ADVANCE_DELAY, PAN_DURATION, PlaybackState};
use sf_editor::voice::Narrator;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Narrator that records what it was asked to speak.
#[derive(Clone, Default)]
struct Transcript(Rc<RefCell<Vec<String>>>);

impl Narrator for Transcript {
    fn speak(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

impl Transcript {
    fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

/// Editor with three bubbles: explicit orders 0 and 2, and an unordered
/// third whose insertion index slots it between storage and replay rules.
fn seeded_editor() -> (Editor, Transcript) {
    let mut ed = Editor::default();
    let transcript = Transcript::default();
    ed.set_narrator(Box::new(transcript.clone()));

    let a = ed.create_bubble_at("alpha", 0.0, 0.0, BubbleKind::Idea);
    let b = ed.create_bubble_at("beta", 400.0, 0.0, BubbleKind::Idea);
    ed.create_bubble_at("gamma", 800.0, 0.0, BubbleKind::Idea);
    ed.set_order(a, Some(0)).unwrap();
    ed.set_order(b, Some(2)).unwrap();
    (ed, transcript)
}

fn visible_texts(ed: &Editor) -> Vec<&str> {
    ed.diagram
        .bubbles()
        .iter()
        .filter(|b| b.visible)
        .map(|b| b.text.as_str())
        .collect()
}

// ─── Reveal order and narration ─────────────────────────────────────────

#[test]
fn reveals_in_order_one_per_delay() {
    let (mut ed, transcript) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    assert_eq!(visible_texts(&ed), ["alpha"]);
    assert_eq!(transcript.lines(), ["alpha"]);

    // Before the deadline nothing moves.
    ed.tick(t0 + ADVANCE_DELAY / 2);
    assert_eq!(visible_texts(&ed), ["alpha"]);

    ed.tick(t0 + ADVANCE_DELAY);
    assert_eq!(visible_texts(&ed), ["alpha", "beta"]);

    ed.tick(t0 + ADVANCE_DELAY * 2);
    assert_eq!(visible_texts(&ed), ["alpha", "beta", "gamma"]);
    assert_eq!(transcript.lines(), ["alpha", "beta", "gamma"]);
}

#[test]
fn unordered_bubble_plays_by_insertion_index() {
    // Orders 0 and 2 plus an unordered third inserted at index 2: the
    // third's key equals the second's explicit order, and insertion
    // breaks the tie.
    let (mut ed, transcript) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.tick(t0 + ADVANCE_DELAY);
    ed.tick(t0 + ADVANCE_DELAY * 2);
    assert_eq!(transcript.lines(), ["alpha", "beta", "gamma"]);
}

#[test]
fn playback_ends_after_last_bubble() {
    let (mut ed, _) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    for i in 1..=3u32 {
        ed.tick(t0 + ADVANCE_DELAY * i);
    }
    assert_eq!(ed.playback.state(), PlaybackState::Idle);
    assert_eq!(visible_texts(&ed).len(), 3, "bubbles stay revealed");
}

#[test]
fn restart_hides_everything_and_replays() {
    let (mut ed, transcript) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.tick(t0 + ADVANCE_DELAY);
    assert_eq!(visible_texts(&ed).len(), 2);

    let t1 = t0 + ADVANCE_DELAY * 10;
    ed.playback_start(t1);
    assert_eq!(visible_texts(&ed), ["alpha"], "restart hides prior reveals");
    assert_eq!(transcript.lines().last().map(String::as_str), Some("alpha"));
}

// ─── Pause / resume / stop ──────────────────────────────────────────────

#[test]
fn pause_suppresses_elapsed_deadline() {
    let (mut ed, _) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.playback_pause();
    assert_eq!(ed.playback.state(), PlaybackState::Paused);

    // The deadline passes while paused; nothing may fire.
    ed.tick(t0 + ADVANCE_DELAY * 3);
    assert_eq!(visible_texts(&ed), ["alpha"]);
}

#[test]
fn resume_advances_immediately_without_renarration() {
    let (mut ed, transcript) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.playback_pause();
    ed.playback_resume(t0 + ADVANCE_DELAY * 5);

    assert_eq!(ed.playback.state(), PlaybackState::Playing);
    assert_eq!(visible_texts(&ed), ["alpha", "beta"]);
    assert_eq!(
        transcript.lines(),
        ["alpha", "beta"],
        "the paused bubble is not narrated twice"
    );
}

#[test]
fn stop_keeps_revealed_bubbles_visible() {
    let (mut ed, _) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.tick(t0 + ADVANCE_DELAY);
    ed.playback_stop();

    assert_eq!(ed.playback.state(), PlaybackState::Idle);
    assert_eq!(visible_texts(&ed), ["alpha", "beta"]);

    // A deadline scheduled before the stop must never fire afterwards.
    ed.tick(t0 + ADVANCE_DELAY * 2);
    assert_eq!(visible_texts(&ed), ["alpha", "beta"]);
}

// ─── Camera pan ─────────────────────────────────────────────────────────

#[test]
fn playback_pans_camera_toward_revealed_bubble() {
    let (mut ed, _) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.tick(t0 + PAN_DURATION);

    // Pan target centers alpha (world 0,0) in the default 800x600 view.
    let (tx, ty) = {
        let b = &ed.diagram.bubbles()[0];
        ed.camera.origin_centering(b.x, b.y)
    };
    assert!((ed.camera.cam_x - tx).abs() < 0.01);
    assert!((ed.camera.cam_y - ty).abs() < 0.01);
}

#[test]
fn user_pan_interrupts_auto_pan() {
    let (mut ed, _) = seeded_editor();
    let t0 = Instant::now();

    ed.playback_start(t0);
    ed.tick(t0 + PAN_DURATION / 4);
    let grabbed = (ed.camera.cam_x, ed.camera.cam_y);

    ed.user_pan(30.0, 0.0);
    let after_drag = (ed.camera.cam_x, ed.camera.cam_y);
    assert_ne!(grabbed, after_drag);

    // The cancelled pan never writes to the camera again.
    ed.tick(t0 + PAN_DURATION * 2);
    assert_eq!((ed.camera.cam_x, ed.camera.cam_y), after_drag);
}
