//! SF core: the diagram data model, camera math, anchored placement, and
//! full-state snapshots. No I/O and no rendering — everything here is plain
//! data and pure-ish functions, owned by a composition root upstream.

pub mod id;
pub mod model;
pub mod placement;
pub mod snapshot;
pub mod viewport;

pub use id::BubbleId;
pub use model::{BUBBLE_HEIGHT, BUBBLE_WIDTH, Bubble, BubbleKind, Connection, Diagram};
pub use placement::{PlacementConfig, find_position, random_in_view};
pub use snapshot::{Snapshot, SnapshotError};
pub use viewport::{Camera, MAX_ZOOM, MIN_ZOOM};
