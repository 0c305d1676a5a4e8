//! Editor composition root and command surface.
//!
//! `Editor` owns the diagram, camera, history, and playback scheduler, and
//! exposes the discrete commands UI collaborators invoke. Every mutating
//! command records a history snapshot after the mutation completes;
//! drag-in-progress is the one deliberate exception — only drag release
//! records, which bounds history growth under continuous pointer movement.
//!
//! Edit/type/order/label flows that need user input follow a
//! request/response protocol: the editor hands out an [`InputRequest`]
//! describing the expected value, and the UI answers with `Some(value)` or
//! `None` for cancellation. Cancellation is a true no-op, never an empty
//! string.

use crate::history::{History, MemoryStore, StateStore};
use crate::playback::Playback;
use crate::voice::{Narrator, Utterance, VoiceCommand, capitalize_first, interpret};
use kurbo::Point;
use rand::Rng;
use rand::seq::SliceRandom;
use sf_core::placement::{PlacementConfig, find_position, random_in_view};
use sf_core::{BubbleId, BubbleKind, Camera, Diagram, Snapshot, SnapshotError};
use std::time::Instant;
use thiserror::Error;

/// Ring radius for prompt-expansion children, in world units.
const PROMPT_RING_RADIUS: f32 = 220.0;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("unknown bubble")]
    UnknownBubble,
    #[error("invalid bubble type: {0:?}")]
    InvalidKind(String),
    #[error("no connection at index {0}")]
    UnknownConnection(usize),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// A request for user input, emitted by the editor and answered (or
/// cancelled) by the surrounding UI collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRequest {
    FreeText { prompt: String, initial: String },
    Choice { prompt: String, options: Vec<String> },
    Integer { prompt: String },
}

/// What handling a voice utterance did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceOutcome {
    CommandApplied(VoiceCommand),
    BubbleCreated(BubbleId),
}

/// The editor: single owner of all mutable state, wired together at the
/// composition root and passed to components explicitly.
pub struct Editor {
    pub diagram: Diagram,
    pub camera: Camera,
    pub history: History,
    pub playback: Playback,
    narrator: Option<Box<dyn Narrator>>,
    placement: PlacementConfig,
    active: Option<BubbleId>,
    connect_mode: bool,
    connect_source: Option<BubbleId>,
    pending_connection_from: Option<BubbleId>,
}

impl Editor {
    /// Fresh editor with an empty diagram.
    pub fn new(store: Box<dyn StateStore>) -> Self {
        let diagram = Diagram::new();
        let history = History::new(store, &diagram);
        Self::assemble(diagram, history)
    }

    /// Resume the previous session from the persisted history stack.
    pub fn resume(store: Box<dyn StateStore>) -> Self {
        let mut diagram = Diagram::new();
        let history = History::resume(store, &mut diagram);
        Self::assemble(diagram, history)
    }

    fn assemble(diagram: Diagram, history: History) -> Self {
        Self {
            diagram,
            camera: Camera::default(),
            history,
            playback: Playback::new(),
            narrator: None,
            placement: PlacementConfig::default(),
            active: None,
            connect_mode: false,
            connect_source: None,
            pending_connection_from: None,
        }
    }

    pub fn set_narrator(&mut self, narrator: Box<dyn Narrator>) {
        self.narrator = Some(narrator);
    }

    pub fn active(&self) -> Option<BubbleId> {
        self.active
    }

    pub fn connect_mode(&self) -> bool {
        self.connect_mode
    }

    // ─── Creation ────────────────────────────────────────────────────────

    /// Create a bubble at an explicit world position.
    pub fn create_bubble_at(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        kind: BubbleKind,
    ) -> BubbleId {
        let id = self.diagram.add_bubble(text, x, y, kind);
        self.finish_creation(id);
        id
    }

    /// Create a bubble placed automatically: near `anchor` via the
    /// placement engine, or at a random in-view position without one.
    pub fn create_bubble(
        &mut self,
        text: impl Into<String>,
        kind: BubbleKind,
        anchor: Option<BubbleId>,
    ) -> BubbleId {
        let mut rng = rand::thread_rng();
        self.create_bubble_with_rng(text, kind, anchor, &mut rng)
    }

    /// As [`create_bubble`], with the randomness injected for determinism.
    pub fn create_bubble_with_rng<R: Rng + ?Sized>(
        &mut self,
        text: impl Into<String>,
        kind: BubbleKind,
        anchor: Option<BubbleId>,
        rng: &mut R,
    ) -> BubbleId {
        let (x, y) = match anchor.and_then(|id| self.diagram.get(id)) {
            Some(parent) => find_position(
                &self.placement,
                (parent.x, parent.y),
                &self.diagram,
                &self.camera,
                rng,
            ),
            None => random_in_view(&self.camera, rng),
        };
        let id = self.diagram.add_bubble(text, x, y, kind);
        self.finish_creation(id);
        id
    }

    /// Auto-connect from a pending source, make the new bubble active,
    /// record.
    fn finish_creation(&mut self, id: BubbleId) {
        if let Some(from) = self.pending_connection_from.take() {
            self.diagram.connect(from, id, "");
        }
        self.active = Some(id);
        self.history.record(&self.diagram);
    }

    /// Mark the source for an automatic connection to the next created
    /// bubble (the voice flow's "expand from here").
    pub fn set_pending_connection(&mut self, from: BubbleId) -> Result<(), EditorError> {
        self.require(from)?;
        self.pending_connection_from = Some(from);
        Ok(())
    }

    /// Expand a seed prompt into a center bubble ringed by 3–5 connected
    /// question bubbles.
    pub fn generate_from_prompt(&mut self, prompt: &str) -> BubbleId {
        let mut rng = rand::thread_rng();
        self.generate_from_prompt_with_rng(prompt, &mut rng)
    }

    pub fn generate_from_prompt_with_rng<R: Rng + ?Sized>(
        &mut self,
        prompt: &str,
        rng: &mut R,
    ) -> BubbleId {
        let (cx, cy) = self.camera.visual_center();
        let center = self.diagram.add_bubble(prompt, cx, cy, BubbleKind::Idea);

        let mut related = vec![
            format!("Why is \"{prompt}\" important?"),
            format!("How does \"{prompt}\" affect others?"),
            format!("What comes after \"{prompt}\"?"),
            format!("Obstacles to \"{prompt}\""),
            format!("Steps to achieve \"{prompt}\""),
        ];
        related.shuffle(rng);
        let count: usize = rng.gen_range(3..=5);

        for (i, text) in related.into_iter().take(count).enumerate() {
            let angle = std::f32::consts::TAU / count as f32 * i as f32;
            let x = cx + angle.cos() * PROMPT_RING_RADIUS;
            let y = cy + angle.sin() * PROMPT_RING_RADIUS;
            let child = self.diagram.add_bubble(text, x, y, BubbleKind::Question);
            self.diagram.connect(center, child, "");
        }

        self.active = Some(center);
        self.history.record(&self.diagram);
        center
    }

    // ─── Bubble commands ─────────────────────────────────────────────────

    pub fn set_kind(&mut self, id: BubbleId, kind: BubbleKind) -> Result<(), EditorError> {
        self.require_mut(id)?.kind = kind;
        self.history.record(&self.diagram);
        Ok(())
    }

    /// Type change from a raw string (Choice response or typed input).
    /// An invalid tag leaves the bubble's prior type untouched.
    pub fn set_kind_input(&mut self, id: BubbleId, raw: &str) -> Result<(), EditorError> {
        self.require(id)?;
        let kind = BubbleKind::parse(raw).ok_or_else(|| EditorError::InvalidKind(raw.into()))?;
        self.set_kind(id, kind)
    }

    pub fn set_lock(&mut self, id: BubbleId, locked: bool) -> Result<(), EditorError> {
        self.require_mut(id)?.locked = locked;
        self.history.record(&self.diagram);
        Ok(())
    }

    pub fn toggle_lock(&mut self, id: BubbleId) -> Result<bool, EditorError> {
        let bubble = self.require_mut(id)?;
        bubble.locked = !bubble.locked;
        let locked = bubble.locked;
        self.history.record(&self.diagram);
        Ok(locked)
    }

    pub fn set_order(&mut self, id: BubbleId, order: Option<u32>) -> Result<(), EditorError> {
        self.require_mut(id)?.order = order;
        self.history.record(&self.diagram);
        Ok(())
    }

    /// Order change from raw text. Anything that does not parse as a
    /// non-negative integer means "unordered", not an error.
    pub fn set_order_input(&mut self, id: BubbleId, raw: &str) -> Result<(), EditorError> {
        self.set_order(id, raw.trim().parse::<u32>().ok())
    }

    pub fn delete(&mut self, id: BubbleId) -> Result<(), EditorError> {
        if !self.diagram.remove_bubble(id) {
            return Err(EditorError::UnknownBubble);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        if self.connect_source == Some(id) {
            self.connect_source = None;
        }
        if self.pending_connection_from == Some(id) {
            self.pending_connection_from = None;
        }
        self.history.record(&self.diagram);
        Ok(())
    }

    pub fn connect(&mut self, from: BubbleId, to: BubbleId) -> Result<(), EditorError> {
        self.require(from)?;
        self.require(to)?;
        if self.diagram.connect(from, to, "") {
            self.history.record(&self.diagram);
        }
        Ok(())
    }

    /// Connect the active bubble to a chosen quick-connect target.
    pub fn quick_connect(&mut self, to: BubbleId) -> Result<(), EditorError> {
        let from = self.active.ok_or(EditorError::UnknownBubble)?;
        self.connect(from, to)
    }

    /// Valid quick-connect targets for the active bubble.
    pub fn quick_connect_targets(&self) -> Vec<BubbleId> {
        self.active
            .map(|from| self.diagram.quick_connect_targets(from))
            .unwrap_or_default()
    }

    /// Move a bubble between sequence positions (sidebar drag-to-reorder).
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        let moved = self.diagram.reorder(from_index, to_index);
        if moved {
            self.history.record(&self.diagram);
        }
        moved
    }

    /// Wipe the whole diagram.
    pub fn clear(&mut self) {
        self.diagram.clear();
        self.active = None;
        self.connect_source = None;
        self.pending_connection_from = None;
        self.history.record(&self.diagram);
    }

    // ─── Input request/response protocol ─────────────────────────────────

    pub fn edit_request(&self, id: BubbleId) -> Result<InputRequest, EditorError> {
        let bubble = self.require(id)?;
        Ok(InputRequest::FreeText {
            prompt: "New text:".to_string(),
            initial: bubble.text.clone(),
        })
    }

    /// Apply an edit response. `None` (cancel) mutates nothing. Accepted
    /// text gets its first letter capitalized, same as every other path
    /// that sets bubble text.
    pub fn apply_edit(
        &mut self,
        id: BubbleId,
        response: Option<String>,
    ) -> Result<(), EditorError> {
        let Some(text) = response else {
            return Ok(());
        };
        self.require_mut(id)?.text = capitalize_first(&text);
        self.history.record(&self.diagram);
        Ok(())
    }

    pub fn kind_request(&self) -> InputRequest {
        InputRequest::Choice {
            prompt: "Enter type:".to_string(),
            options: BubbleKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
        }
    }

    pub fn order_request(&self) -> InputRequest {
        InputRequest::Integer {
            prompt: "Set playback order number:".to_string(),
        }
    }

    pub fn label_request(&self, index: usize) -> Result<InputRequest, EditorError> {
        let conn = self
            .diagram
            .connection(index)
            .ok_or(EditorError::UnknownConnection(index))?;
        Ok(InputRequest::FreeText {
            prompt: "Label this connection:".to_string(),
            initial: conn.label.clone(),
        })
    }

    /// Apply a label response. `None` (cancel) mutates nothing.
    pub fn apply_label(
        &mut self,
        index: usize,
        response: Option<String>,
    ) -> Result<(), EditorError> {
        let Some(label) = response else {
            return Ok(());
        };
        if !self.diagram.set_label(index, label) {
            return Err(EditorError::UnknownConnection(index));
        }
        self.history.record(&self.diagram);
        Ok(())
    }

    // ─── Selection and connect mode ──────────────────────────────────────

    /// Toggle connect mode. Entering or leaving always drops a half-made
    /// connection.
    pub fn toggle_connect_mode(&mut self) -> bool {
        self.connect_mode = !self.connect_mode;
        self.connect_source = None;
        self.connect_mode
    }

    /// A click on a bubble. In connect mode the first pick arms the source
    /// and the second creates the connection; otherwise the bubble becomes
    /// active.
    pub fn pick_bubble(&mut self, id: BubbleId) -> Result<(), EditorError> {
        self.require(id)?;
        if self.connect_mode {
            match self.connect_source.take() {
                Some(source) => self.connect(source, id)?,
                None => self.connect_source = Some(id),
            }
        } else {
            self.active = Some(id);
        }
        Ok(())
    }

    /// A click on the connection layer: resolve it to a connection, if any.
    pub fn click_connection(&self, screen_x: f32, screen_y: f32) -> Option<usize> {
        sf_render::hit_test(
            Point::new(screen_x as f64, screen_y as f64),
            &self.diagram,
            &self.camera,
        )
    }

    // ─── Camera ──────────────────────────────────────────────────────────

    /// Center on the active bubble, or reset to the origin without one.
    /// Camera state is not part of snapshots, so nothing is recorded.
    pub fn center_view(&mut self) {
        self.playback.interrupt_pan();
        match self.active.and_then(|id| self.diagram.get(id)) {
            Some(bubble) => self.camera.center_on(bubble.x, bubble.y),
            None => {
                self.camera.cam_x = 0.0;
                self.camera.cam_y = 0.0;
            }
        }
    }

    /// User-initiated pan. Cancels any auto-pan in flight.
    pub fn user_pan(&mut self, screen_dx: f32, screen_dy: f32) {
        self.playback.interrupt_pan();
        self.camera.pan_by(screen_dx, screen_dy);
    }

    /// Wheel zoom anchored at a screen point.
    pub fn user_zoom(&mut self, factor: f32, screen_x: f32, screen_y: f32) {
        self.camera.zoom_by(factor, screen_x, screen_y);
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    /// Start dragging a bubble. Locked bubbles refuse; a bubble already
    /// mid-drag refuses a second grab. Cancels any auto-pan in flight.
    pub fn begin_drag(&mut self, id: BubbleId) -> bool {
        self.playback.interrupt_pan();
        match self.diagram.get_mut(id) {
            Some(b) if !b.locked && !b.dragging => {
                b.dragging = true;
                true
            }
            _ => false,
        }
    }

    /// Move a bubble mid-drag. Deliberately does NOT record history —
    /// continuous pointer movement would flood the undo stack.
    pub fn drag_to(&mut self, id: BubbleId, world_x: f32, world_y: f32) {
        if let Some(b) = self.diagram.get_mut(id)
            && b.dragging
        {
            b.x = world_x;
            b.y = world_y;
        }
    }

    /// Release a drag. This is the point that records history.
    pub fn end_drag(&mut self, id: BubbleId) {
        if let Some(b) = self.diagram.get_mut(id)
            && b.dragging
        {
            b.dragging = false;
            self.history.record(&self.diagram);
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let changed = self.history.undo(&mut self.diagram);
        if changed {
            // Restore minted fresh ids; stale selections must not linger.
            self.drop_selection_state();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.history.redo(&mut self.diagram);
        if changed {
            self.drop_selection_state();
        }
        changed
    }

    fn drop_selection_state(&mut self) {
        self.active = None;
        self.connect_source = None;
        self.pending_connection_from = None;
    }

    // ─── Snapshot import/export ──────────────────────────────────────────

    pub fn export_snapshot(&self) -> Result<String, EditorError> {
        Ok(Snapshot::capture(&self.diagram).to_json()?)
    }

    /// Import a snapshot document. A parse or shape failure leaves the
    /// diagram and both history stacks untouched; success is recorded and
    /// therefore undoable.
    pub fn import_snapshot(&mut self, json: &str) -> Result<(), EditorError> {
        let snapshot = Snapshot::from_json(json)?;
        self.history.record_imported(snapshot, &mut self.diagram);
        self.drop_selection_state();
        Ok(())
    }

    // ─── Voice ───────────────────────────────────────────────────────────

    /// Handle a recognized utterance: triggers first, content second.
    pub fn handle_utterance(&mut self, raw: &str) -> UtteranceOutcome {
        match interpret(raw) {
            Utterance::Command(cmd) => {
                match cmd {
                    VoiceCommand::Clear => self.clear(),
                    VoiceCommand::ToggleConnectMode => {
                        self.toggle_connect_mode();
                    }
                }
                UtteranceOutcome::CommandApplied(cmd)
            }
            Utterance::Content { text, kind } => {
                let anchor = self.pending_connection_from;
                let id = self.create_bubble(text, kind, anchor);
                UtteranceOutcome::BubbleCreated(id)
            }
        }
    }

    // ─── Playback ────────────────────────────────────────────────────────

    pub fn playback_start(&mut self, now: Instant) {
        let narrator = self.narrator.as_deref_mut();
        self.playback
            .start(now, &mut self.diagram, &mut self.camera, narrator);
    }

    pub fn playback_pause(&mut self) {
        self.playback.pause();
    }

    pub fn playback_resume(&mut self, now: Instant) {
        let narrator = self.narrator.as_deref_mut();
        self.playback
            .resume(now, &mut self.diagram, &mut self.camera, narrator);
    }

    pub fn playback_stop(&mut self) {
        self.playback.stop();
    }

    /// Frame-loop hook: drives playback timers and the camera pan.
    pub fn tick(&mut self, now: Instant) {
        let narrator = self.narrator.as_deref_mut();
        self.playback
            .tick(now, &mut self.diagram, &mut self.camera, narrator);
    }

    // ─── Internal ────────────────────────────────────────────────────────

    fn require(&self, id: BubbleId) -> Result<&sf_core::Bubble, EditorError> {
        self.diagram.get(id).ok_or(EditorError::UnknownBubble)
    }

    fn require_mut(&mut self, id: BubbleId) -> Result<&mut sf_core::Bubble, EditorError> {
        self.diagram.get_mut(id).ok_or(EditorError::UnknownBubble)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }
}
