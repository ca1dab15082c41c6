mod engine;
mod propagate;
mod snapshot;
mod value_lists;

pub use engine::{CacheState, PatchOutcome, ProjectCache};
pub use propagate::propagate_value;
pub use snapshot::{PatchEffect, ProjectSnapshot, SnapshotPatch};
pub use value_lists::ValueListCache;

#[cfg(test)]
pub(crate) mod fixtures;
