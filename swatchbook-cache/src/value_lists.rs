use moka::sync::Cache;
use std::{sync::Arc, time::Duration};
use swatchbook_schema::{EntityId, Value, ValueKind};

type ListKey = (EntityId, ValueKind);

/// Per-`(project, kind)` value lists, filled by uncached value fetches.
#[derive(Clone)]
pub struct ValueListCache {
    lists: Cache<ListKey, Arc<Vec<Value>>>,
}

impl ValueListCache {
    pub fn new(max_capacity: u64, time_to_idle: Duration) -> Self {
        let lists = Cache::builder()
            .max_capacity(max_capacity.max(1).saturating_mul(ValueKind::ALL.len() as u64))
            .time_to_idle(time_to_idle.max(Duration::from_secs(1)))
            .build();
        Self { lists }
    }

    pub fn get(&self, project_id: EntityId, kind: ValueKind) -> Option<Arc<Vec<Value>>> {
        self.lists.get(&(project_id, kind))
    }

    pub fn put(&self, project_id: EntityId, kind: ValueKind, values: Vec<Value>) -> Arc<Vec<Value>> {
        let values = Arc::new(values);
        self.lists.insert((project_id, kind), values.clone());
        values
    }

    /// Appends to a cached list. Does nothing if the list was never fetched.
    pub fn append(&self, project_id: EntityId, kind: ValueKind, value: Value) {
        if let Some(current) = self.get(project_id, kind) {
            let mut next = Vec::clone(&current);
            next.push(value);
            self.lists.insert((project_id, kind), Arc::new(next));
        }
    }

    /// Replaces the entry with `value.id` in a cached list.
    pub fn replace(&self, project_id: EntityId, kind: ValueKind, value: Value) {
        if let Some(current) = self.get(project_id, kind) {
            let next: Vec<Value> = current
                .iter()
                .map(|v| if v.id == value.id { value.clone() } else { v.clone() })
                .collect();
            self.lists.insert((project_id, kind), Arc::new(next));
        }
    }

    pub fn invalidate_project(&self, project_id: EntityId) {
        for kind in ValueKind::ALL {
            self.lists.invalidate(&(project_id, kind));
        }
    }
}
