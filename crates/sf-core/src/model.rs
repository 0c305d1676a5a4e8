//! Core diagram data model.
//!
//! The diagram is a flat, ordered sequence of bubbles (nodes) plus a list of
//! directed, optionally labeled connections between them. Insertion order is
//! semantic: it drives playback ordering for bubbles without an explicit
//! `order`, and it defines the positional indices used by the snapshot file
//! format. Connections hold stable `BubbleId`s, so reordering the sequence
//! never changes which bubbles a connection joins.

use crate::id::BubbleId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default bubble extent in screen pixels, used for center math and as the
/// minimum clearance radius during placement.
pub const BUBBLE_WIDTH: f32 = 220.0;
pub const BUBBLE_HEIGHT: f32 = 100.0;

// ─── Bubble kind ─────────────────────────────────────────────────────────

/// The category tag of a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BubbleKind {
    #[default]
    Idea,
    Task,
    Question,
    Blocker,
    Note,
}

impl BubbleKind {
    pub const ALL: [BubbleKind; 5] = [
        BubbleKind::Idea,
        BubbleKind::Task,
        BubbleKind::Question,
        BubbleKind::Blocker,
        BubbleKind::Note,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BubbleKind::Idea => "idea",
            BubbleKind::Task => "task",
            BubbleKind::Question => "question",
            BubbleKind::Blocker => "blocker",
            BubbleKind::Note => "note",
        }
    }

    /// Parse a category tag. Returns `None` for anything outside the five
    /// known kinds — the caller decides how to surface the rejection.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idea" => Some(BubbleKind::Idea),
            "task" => Some(BubbleKind::Task),
            "question" => Some(BubbleKind::Question),
            "blocker" => Some(BubbleKind::Blocker),
            "note" => Some(BubbleKind::Note),
            _ => None,
        }
    }
}

// ─── Bubble ──────────────────────────────────────────────────────────────

/// A single idea/statement entity on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub id: BubbleId,
    pub text: String,
    /// World-space position (top-left corner, matching the render layer).
    pub x: f32,
    pub y: f32,
    pub kind: BubbleKind,
    /// Locked bubbles refuse drags.
    pub locked: bool,
    /// Explicit playback order. `None` means "use insertion position".
    pub order: Option<u32>,
    /// Only toggled during playback to hide/reveal bubbles.
    pub visible: bool,
    /// Per-bubble drag exclusivity guard.
    pub dragging: bool,
}

impl Bubble {
    fn new(id: BubbleId, text: String, x: f32, y: f32, kind: BubbleKind) -> Self {
        Self {
            id,
            text,
            x,
            y,
            kind,
            locked: false,
            order: None,
            visible: true,
            dragging: false,
        }
    }
}

// ─── Connection ──────────────────────────────────────────────────────────

/// A directed, optionally labeled relationship between two bubbles.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub from: BubbleId,
    pub to: BubbleId,
    pub label: String,
}

// ─── Diagram ─────────────────────────────────────────────────────────────

/// The single source of truth for the editor: an ordered bubble sequence
/// plus the connection list. Owned by the composition root and passed by
/// reference to every component that reads or mutates it.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    bubbles: Vec<Bubble>,
    connections: Vec<Connection>,
    next_id: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mint_id(&mut self) -> BubbleId {
        let id = BubbleId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new bubble at the end of the sequence. Returns its id.
    pub fn add_bubble(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        kind: BubbleKind,
    ) -> BubbleId {
        let id = self.mint_id();
        self.bubbles.push(Bubble::new(id, text.into(), x, y, kind));
        id
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BubbleId) -> Option<&mut Bubble> {
        self.bubbles.iter_mut().find(|b| b.id == id)
    }

    /// Current position of a bubble in the sequence.
    pub fn index_of(&self, id: BubbleId) -> Option<usize> {
        self.bubbles.iter().position(|b| b.id == id)
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubbles_mut(&mut self) -> impl Iterator<Item = &mut Bubble> {
        self.bubbles.iter_mut()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection(&self, index: usize) -> Option<&Connection> {
        self.connections.get(index)
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Remove a bubble and every connection touching it.
    /// Returns `false` if the id is unknown.
    pub fn remove_bubble(&mut self, id: BubbleId) -> bool {
        let Some(pos) = self.index_of(id) else {
            return false;
        };
        self.bubbles.remove(pos);
        self.connections.retain(|c| c.from != id && c.to != id);
        true
    }

    /// Create a connection. Self-connections and connections with a missing
    /// endpoint are rejected.
    pub fn connect(&mut self, from: BubbleId, to: BubbleId, label: impl Into<String>) -> bool {
        if from == to || self.get(from).is_none() || self.get(to).is_none() {
            return false;
        }
        self.connections.push(Connection {
            from,
            to,
            label: label.into(),
        });
        true
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.connections.get_mut(index) {
            Some(conn) => {
                conn.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Indices of all connections where `id` is either endpoint.
    pub fn connections_touching(&self, id: BubbleId) -> SmallVec<[usize; 4]> {
        self.connections
            .iter()
            .enumerate()
            .filter(|(_, c)| c.from == id || c.to == id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Valid quick-connect targets for `from`: every bubble except `from`
    /// itself and those already connected from it.
    pub fn quick_connect_targets(&self, from: BubbleId) -> Vec<BubbleId> {
        self.bubbles
            .iter()
            .filter(|b| b.id != from)
            .filter(|b| {
                !self
                    .connections
                    .iter()
                    .any(|c| c.from == from && c.to == b.id)
            })
            .map(|b| b.id)
            .collect()
    }

    /// Move the bubble at `from_index` to `to_index` in the sequence.
    /// Connection endpoints are ids, so this never retargets a connection.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        if from_index >= self.bubbles.len() || to_index >= self.bubbles.len() {
            return false;
        }
        let moving = self.bubbles.remove(from_index);
        self.bubbles.insert(to_index, moving);
        true
    }

    /// Remove every bubble and connection. Minted ids are not reused.
    pub fn clear(&mut self) {
        self.bubbles.clear();
        self.connections.clear();
    }

    /// Replace the entire contents. Used by snapshot restore; ids keep
    /// advancing so stale ids held by callers never alias new bubbles.
    pub(crate) fn replace(&mut self, bubbles: Vec<Bubble>, connections: Vec<Connection>) {
        self.bubbles = bubbles;
        self.connections = connections;
    }
}
