use moka::{Entry, ops::compute::Op, sync::Cache};
use std::sync::Arc;
use swatchbook_schema::{EntityId, ProjectAggregate, Revision, Value, ValueKind};

use crate::snapshot::{PatchEffect, ProjectSnapshot, SnapshotPatch};

#[derive(Debug, Clone)]
enum Slot {
    Loading,
    Ready(Arc<ProjectSnapshot>),
}

/// Lifecycle of one project's cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Populated,
    /// Populated, then patched in place this many times.
    Patched(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The snapshot was patched. `stale` reports whether it still trails the server.
    Applied {
        revision: Revision,
        stale: bool,
        effect: PatchEffect,
    },
    /// No populated snapshot for this project; nothing was changed.
    Missing,
}

/// Keyed, versioned store of project snapshots.
///
/// Snapshots are immutable once shared: a patch clones the current snapshot,
/// edits the clone and swaps it in. Readers holding the previous `Arc` keep a
/// consistent view. Writes to one project are serialized per key, so clones
/// of a session may patch concurrently.
///
/// Entries never expire on their own; only capacity eviction and an explicit
/// `invalidate` (project switch) drop a snapshot.
#[derive(Clone)]
pub struct ProjectCache {
    entries: Cache<EntityId, Slot>,
}

impl ProjectCache {
    pub fn new(max_capacity: u64) -> Self {
        let entries = Cache::builder().max_capacity(max_capacity.max(1)).build();
        Self { entries }
    }

    pub fn state(&self, project_id: EntityId) -> CacheState {
        match self.entries.get(&project_id) {
            None => CacheState::Empty,
            Some(Slot::Loading) => CacheState::Loading,
            Some(Slot::Ready(snapshot)) if snapshot.patches == 0 => CacheState::Populated,
            Some(Slot::Ready(snapshot)) => CacheState::Patched(snapshot.patches),
        }
    }

    /// Marks a project as being fetched, dropping any previous snapshot.
    pub fn begin_loading(&self, project_id: EntityId) {
        self.entries.insert(project_id, Slot::Loading);
    }

    pub fn populate(&self, aggregate: ProjectAggregate) -> Arc<ProjectSnapshot> {
        let snapshot = Arc::new(ProjectSnapshot::from(aggregate));
        self.entries
            .insert(snapshot.project_id, Slot::Ready(snapshot.clone()));
        snapshot
    }

    pub fn get(&self, project_id: EntityId) -> Option<Arc<ProjectSnapshot>> {
        match self.entries.get(&project_id) {
            Some(Slot::Ready(snapshot)) => Some(snapshot),
            _ => None,
        }
    }

    pub fn invalidate(&self, project_id: EntityId) {
        self.entries.invalidate(&project_id);
    }

    /// Applies `patch` to the project's snapshot.
    ///
    /// `revision` is the server revision produced by the write, if known. The
    /// snapshot advances only when it is exactly one past the cached revision;
    /// any gap means another writer got in between and the snapshot is marked
    /// stale until the next full fetch.
    pub fn patch(
        &self,
        project_id: EntityId,
        patch: SnapshotPatch,
        revision: Option<Revision>,
    ) -> PatchOutcome {
        self.update(project_id, |next| {
            let effect = next.apply(patch);
            next.patches = next.patches.saturating_add(1);
            if let Some(revision) = revision {
                if revision == next.revision + 1 {
                    next.revision = revision;
                } else {
                    next.stale = true;
                }
            }
            effect
        })
    }

    /// Swaps in a freshly listed set of values and rewrites the component
    /// slots that reference them. A read, so the patch count and revision
    /// are left alone.
    pub fn refresh_values(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        values: Vec<Value>,
    ) -> PatchOutcome {
        self.update(project_id, |next| {
            next.apply(SnapshotPatch::ReplaceValues { kind, values })
        })
    }

    /// Runs `edit` on a copy of the populated snapshot and stores the result.
    /// The read-modify-write is atomic per project.
    fn update<F>(&self, project_id: EntityId, edit: F) -> PatchOutcome
    where
        F: FnOnce(&mut ProjectSnapshot) -> PatchEffect,
    {
        let mut outcome = PatchOutcome::Missing;
        self.entries
            .entry(project_id)
            .and_compute_with(|entry| match entry.map(Entry::into_value) {
                Some(Slot::Ready(current)) => {
                    let mut next = ProjectSnapshot::clone(&current);
                    let effect = edit(&mut next);
                    outcome = PatchOutcome::Applied {
                        revision: next.revision,
                        stale: next.stale,
                        effect,
                    };
                    Op::Put(Slot::Ready(Arc::new(next)))
                }
                _ => Op::Nop,
            });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PROJECT, aggregate, value};
    use swatchbook_schema::ValueKind;

    use std::{thread, time::Duration};

    fn cache() -> ProjectCache {
        ProjectCache::new(16)
    }

    #[test]
    fn walks_the_lifecycle() {
        let cache = cache();
        assert_eq!(cache.state(PROJECT), CacheState::Empty);

        cache.begin_loading(PROJECT);
        assert_eq!(cache.state(PROJECT), CacheState::Loading);
        assert!(cache.get(PROJECT).is_none());

        cache.populate(aggregate(4));
        assert_eq!(cache.state(PROJECT), CacheState::Populated);

        cache.patch(
            PROJECT,
            SnapshotPatch::InsertValue {
                kind: ValueKind::Radius,
                value: value(2, "lg", "12px"),
            },
            Some(5),
        );
        assert_eq!(cache.state(PROJECT), CacheState::Patched(1));

        cache.invalidate(PROJECT);
        assert_eq!(cache.state(PROJECT), CacheState::Empty);
    }

    #[test]
    fn consecutive_revision_advances_snapshot() {
        let cache = cache();
        cache.populate(aggregate(4));

        let outcome = cache.patch(
            PROJECT,
            SnapshotPatch::ReplaceValue {
                kind: ValueKind::Color,
                value: value(1, "Primary", "#ffffff"),
            },
            Some(5),
        );

        let PatchOutcome::Applied {
            revision, stale, ..
        } = outcome
        else {
            panic!("expected patch to apply");
        };
        assert_eq!(revision, 5);
        assert!(!stale);
    }

    #[test]
    fn revision_gap_marks_snapshot_stale() {
        let cache = cache();
        cache.populate(aggregate(4));

        cache.patch(
            PROJECT,
            SnapshotPatch::InsertValue {
                kind: ValueKind::Color,
                value: value(2, "Accent", "#ff0000"),
            },
            Some(7),
        );

        let snapshot = cache.get(PROJECT).unwrap();
        assert!(snapshot.stale);
        assert_eq!(snapshot.revision, 4);
        assert_eq!(snapshot.colors.len(), 2);
    }

    #[test]
    fn patch_without_snapshot_is_a_no_op() {
        let cache = cache();
        cache.begin_loading(PROJECT);

        let outcome = cache.patch(
            PROJECT,
            SnapshotPatch::InsertValue {
                kind: ValueKind::Color,
                value: value(2, "Accent", "#ff0000"),
            },
            Some(1),
        );

        assert_eq!(outcome, PatchOutcome::Missing);
        assert_eq!(cache.state(PROJECT), CacheState::Loading);
    }

    #[test]
    fn earlier_readers_keep_their_view() {
        let cache = cache();
        let before = cache.populate(aggregate(1));

        cache.patch(
            PROJECT,
            SnapshotPatch::ReplaceValue {
                kind: ValueKind::Color,
                value: value(1, "Primary", "#ffffff"),
            },
            Some(2),
        );

        assert_eq!(before.colors[0].value, "#112233");
        assert_eq!(cache.get(PROJECT).unwrap().colors[0].value, "#ffffff");
    }

    #[test]
    fn idle_snapshot_survives_until_invalidated() {
        let cache = cache();
        cache.populate(aggregate(4));
        thread::sleep(Duration::from_millis(1500));
        cache.entries.run_pending_tasks();

        let outcome = cache.patch(
            PROJECT,
            SnapshotPatch::InsertValue {
                kind: ValueKind::Color,
                value: value(2, "Accent", "#ff0000"),
            },
            Some(5),
        );

        assert!(matches!(outcome, PatchOutcome::Applied { revision: 5, .. }));
        assert_eq!(cache.state(PROJECT), CacheState::Patched(1));
    }

    #[test]
    fn concurrent_patches_are_not_lost() {
        let cache = cache();
        cache.populate(aggregate(1));

        let workers: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let id = 1000 + t * 200 + i;
                        cache.patch(
                            PROJECT,
                            SnapshotPatch::InsertValue {
                                kind: ValueKind::Color,
                                value: value(id, "c", "#000000"),
                            },
                            None,
                        );
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let snapshot = cache.get(PROJECT).unwrap();
        assert_eq!(snapshot.colors.len(), 1 + 8 * 200);
        assert_eq!(snapshot.patches, 8 * 200);
    }

    #[test]
    fn refreshed_values_reach_components_without_counting_as_patch() {
        let cache = cache();
        cache.populate(aggregate(3));

        let outcome = cache.refresh_values(
            PROJECT,
            ValueKind::Color,
            vec![value(1, "Primary", "#abcdef")],
        );

        assert!(matches!(outcome, PatchOutcome::Applied { revision: 3, stale: false, .. }));
        assert_eq!(cache.state(PROJECT), CacheState::Populated);
        let snapshot = cache.get(PROJECT).unwrap();
        assert_eq!(snapshot.colors[0].value, "#abcdef");
        assert_eq!(snapshot.components[0].styles.background_color.value, "#abcdef");
        assert_eq!(snapshot.components[0].styles.border_radius.value, "4px");
    }
}
