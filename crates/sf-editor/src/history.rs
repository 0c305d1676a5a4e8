//! Snapshot-based undo/redo history.
//!
//! Every mutating operation records a full-state snapshot after it
//! completes; undo/redo swap whole snapshots back in. This is deliberately
//! simpler than an operation log and adequate at this data scale — the
//! documented cost is that history memory grows linearly with edit count
//! times snapshot size.
//!
//! The bottom entry of the undo stack is the base state and is never popped
//! past: `undo` with one or fewer entries is a no-op. The undo stack is
//! persisted to the key-value store after every `record`, `undo`, and
//! `redo`, so a new session resumes from the top of the persisted stack.

use sf_core::{Diagram, Snapshot};
use std::collections::HashMap;

/// Store key holding the JSON array of undo snapshots.
pub const HISTORY_KEY: &str = "bubbleHistory";

/// External persistence collaborator: a get/set string key-value interface
/// (browser localStorage, a file, a test map — the engine does not care).
pub trait StateStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store. The default when no durable backend is wired up, and
/// the store used throughout the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Undo/redo stacks over immutable snapshots.
pub struct History {
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    store: Box<dyn StateStore>,
}

impl History {
    /// Fresh history seeded with the diagram's current state as the base
    /// entry.
    pub fn new(store: Box<dyn StateStore>, diagram: &Diagram) -> Self {
        let mut history = Self {
            undo: vec![Snapshot::capture(diagram)],
            redo: Vec::new(),
            store,
        };
        history.persist();
        history
    }

    /// Resume a previous session: load the persisted stack and restore its
    /// top into `diagram`. Falls back to a fresh history when the store is
    /// empty or the persisted payload does not parse.
    pub fn resume(store: Box<dyn StateStore>, diagram: &mut Diagram) -> Self {
        let undo: Vec<Snapshot> = match store.load(HISTORY_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(stack) => stack,
                Err(err) => {
                    log::warn!("persisted history unreadable, starting fresh: {err}");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if let Some(top) = undo.last() {
            top.restore(diagram);
            let mut history = Self {
                undo,
                redo: Vec::new(),
                store,
            };
            history.persist();
            history
        } else {
            Self::new(store, diagram)
        }
    }

    /// Record the diagram's state after a completed mutation. Clears the
    /// redo stack and persists.
    pub fn record(&mut self, diagram: &Diagram) {
        self.undo.push(Snapshot::capture(diagram));
        self.redo.clear();
        self.persist();
    }

    /// Push an externally produced snapshot (import) and restore it.
    pub fn record_imported(&mut self, snapshot: Snapshot, diagram: &mut Diagram) {
        snapshot.restore(diagram);
        self.undo.push(snapshot);
        self.redo.clear();
        self.persist();
    }

    /// Step back one state. No-op while only the base entry remains.
    /// Returns whether anything changed.
    pub fn undo(&mut self, diagram: &mut Diagram) -> bool {
        if self.undo.len() <= 1 {
            return false;
        }
        // The popped entry is the *current* state; what we restore is the
        // new top.
        let Some(current) = self.undo.pop() else {
            return false;
        };
        self.redo.push(current);
        if let Some(top) = self.undo.last() {
            top.restore(diagram);
        }
        self.persist();
        true
    }

    /// Step forward one previously undone state. No-op on an empty redo
    /// stack. Returns whether anything changed.
    pub fn redo(&mut self, diagram: &mut Diagram) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        snapshot.restore(diagram);
        self.undo.push(snapshot);
        self.persist();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.undo.len()
    }

    /// Best-effort persistence, mirroring the fire-and-forget semantics of
    /// the storage collaborator. A serialization failure is logged, never
    /// propagated to the mutating operation that triggered it.
    fn persist(&mut self) {
        match serde_json::to_string(&self.undo) {
            Ok(json) => self.store.save(HISTORY_KEY, &json),
            Err(err) => log::error!("failed to persist history: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::BubbleKind;

    #[test]
    fn undo_on_base_state_is_noop() {
        let mut diagram = Diagram::new();
        let mut history = History::new(Box::new(MemoryStore::new()), &diagram);
        assert!(!history.undo(&mut diagram));
        assert!(!history.can_undo());
    }

    #[test]
    fn undo_after_single_record_restores_base() {
        let mut diagram = Diagram::new();
        let mut history = History::new(Box::new(MemoryStore::new()), &diagram);

        diagram.add_bubble("One", 0.0, 0.0, BubbleKind::Idea);
        history.record(&diagram);

        assert!(history.undo(&mut diagram));
        assert!(diagram.is_empty());
        // Now at the base entry: further undo is a no-op.
        assert!(!history.undo(&mut diagram));
    }

    #[test]
    fn redo_after_undo_restores_and_new_record_clears_redo() {
        let mut diagram = Diagram::new();
        let mut history = History::new(Box::new(MemoryStore::new()), &diagram);

        diagram.add_bubble("A", 0.0, 0.0, BubbleKind::Idea);
        history.record(&diagram); // state A
        diagram.add_bubble("B", 10.0, 0.0, BubbleKind::Task);
        history.record(&diagram); // state B

        assert!(history.undo(&mut diagram)); // back to A
        assert_eq!(diagram.len(), 1);
        assert_eq!(diagram.bubbles()[0].text, "A");

        assert!(history.redo(&mut diagram)); // forward to B
        assert_eq!(diagram.len(), 2);

        history.undo(&mut diagram);
        diagram.add_bubble("C", 20.0, 0.0, BubbleKind::Note);
        history.record(&diagram);
        assert!(!history.can_redo());
        assert!(!history.redo(&mut diagram));
    }

    #[test]
    fn persisted_stack_resumes_last_state() {
        // A previous session's persisted stack: empty base plus one edit.
        let mut store = MemoryStore::new();
        let mut diagram = Diagram::new();
        let base = Snapshot::capture(&diagram);
        diagram.add_bubble("Kept", 5.0, 6.0, BubbleKind::Idea);
        let edited = Snapshot::capture(&diagram);
        let json = serde_json::to_string(&vec![base, edited]).unwrap();
        store.save(HISTORY_KEY, &json);

        let mut diagram = Diagram::new();
        let history = History::resume(Box::new(store), &mut diagram);
        assert_eq!(diagram.len(), 1);
        assert_eq!(diagram.bubbles()[0].text, "Kept");
        assert_eq!(history.depth(), 2);
        assert!(history.can_undo());
    }

    #[test]
    fn corrupt_persisted_history_starts_fresh() {
        let mut store = MemoryStore::new();
        store.save(HISTORY_KEY, "{definitely not json");

        let mut diagram = Diagram::new();
        diagram.add_bubble("Live", 0.0, 0.0, BubbleKind::Idea);
        let history = History::resume(Box::new(store), &mut diagram);

        // Live state untouched, fresh base entry captured from it.
        assert_eq!(diagram.len(), 1);
        assert_eq!(history.depth(), 1);
    }
}
