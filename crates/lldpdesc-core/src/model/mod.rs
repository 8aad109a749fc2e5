// ── Domain model ──
//
// Neighbor tables, decoded description state, transition events, and the
// change set handed to the publisher.

pub mod change_set;
pub mod event;
pub mod neighbor;
pub mod recorded;

pub use change_set::DescriptionChangeSet;
pub use event::{ChangeEvent, ChangeKind};
pub use neighbor::{NeighborRecord, NeighborTable, RemoteIdentity};
pub use recorded::{DescriptionTable, RecordedState, RecordedTable};
