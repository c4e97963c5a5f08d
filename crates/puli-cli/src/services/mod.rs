// crates/puli-cli/src/services/mod.rs - Stand-ins for the external managers
pub mod resources;
pub mod snapshot;

pub use resources::{Resource, ResourceKind, ResourceRepository};
pub use snapshot::{ManagerSnapshot, SnapshotService, SnapshotSource};
