use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable, monotonically assigned identifier for a bubble.
///
/// Connections refer to bubbles by `BubbleId`, never by sequence position,
/// so reordering the bubble list or restoring a snapshot cannot silently
/// retarget a connection. Ids are minted by the owning `Diagram` and are
/// unique for that diagram's lifetime; the positional `from`/`to` indices in
/// the snapshot file format are resolved back to fresh ids exactly once, at
/// restore time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BubbleId(u64);

impl BubbleId {
    pub(crate) const fn from_raw(raw: u64) -> Self {
        BubbleId(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for BubbleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
