//! Full-state snapshots: the export/import file format and the history
//! entry format.
//!
//! A snapshot is an order-preserving capture of the bubble sequence plus
//! connections expressed as positional indices into that sequence:
//!
//! ```json
//! {
//!   "bubbles": [{ "text": "…", "x": 0.0, "y": 0.0,
//!                 "locked": false, "order": null, "type": "idea" }],
//!   "connections": [{ "from": 0, "to": 1, "label": "…" }]
//! }
//! ```
//!
//! Restore is a full replacement, never a merge: fresh ids are minted for
//! every bubble and each serialized index is resolved against the new
//! sequence exactly once. Connections with an out-of-range endpoint are
//! dropped with a warning.

use crate::id::BubbleId;
use crate::model::{Bubble, BubbleKind, Connection, Diagram};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized bubble. `x`/`y` and `text` are required; the rest default to
/// the values a freshly created bubble would have, so hand-edited or older
/// files still import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleState {
    pub text: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: BubbleKind,
}

/// Serialized connection: positional indices into `bubbles` at capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionState {
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
}

/// An immutable capture of the whole diagram. Once pushed onto a history
/// stack it is only ever cloned back out, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub bubbles: Vec<BubbleState>,
    pub connections: Vec<ConnectionState>,
}

impl Snapshot {
    pub fn capture(diagram: &Diagram) -> Snapshot {
        let bubbles = diagram
            .bubbles()
            .iter()
            .map(|b| BubbleState {
                text: b.text.clone(),
                x: b.x,
                y: b.y,
                locked: b.locked,
                order: b.order,
                kind: b.kind,
            })
            .collect();

        let connections = diagram
            .connections()
            .iter()
            .filter_map(|c| {
                Some(ConnectionState {
                    from: diagram.index_of(c.from)?,
                    to: diagram.index_of(c.to)?,
                    label: c.label.clone(),
                })
            })
            .collect();

        Snapshot {
            bubbles,
            connections,
        }
    }

    /// Replace the diagram's contents with this snapshot's.
    ///
    /// All bubbles come back visible; playback state does not survive a
    /// restore. Stale `BubbleId`s held by callers never alias the new
    /// bubbles because minted ids keep advancing.
    pub fn restore(&self, diagram: &mut Diagram) {
        let mut bubbles = Vec::with_capacity(self.bubbles.len());
        let mut ids: Vec<BubbleId> = Vec::with_capacity(self.bubbles.len());

        for bs in &self.bubbles {
            let id = diagram.mint_id();
            ids.push(id);
            bubbles.push(Bubble {
                id,
                text: bs.text.clone(),
                x: bs.x,
                y: bs.y,
                kind: bs.kind,
                locked: bs.locked,
                order: bs.order,
                visible: true,
                dragging: false,
            });
        }

        let mut connections = Vec::with_capacity(self.connections.len());
        for cs in &self.connections {
            match (ids.get(cs.from), ids.get(cs.to)) {
                (Some(&from), Some(&to)) if from != to => connections.push(Connection {
                    from,
                    to,
                    label: cs.label.clone(),
                }),
                _ => log::warn!(
                    "dropping connection with unresolvable endpoints {} -> {}",
                    cs.from,
                    cs.to
                ),
            }
        }

        diagram.replace(bubbles, connections);
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and shape-validate a snapshot document. Nothing is mutated on
    /// failure; the caller restores only on `Ok`.
    pub fn from_json(json: &str) -> Result<Snapshot, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}
