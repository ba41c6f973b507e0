//! In-memory `MaterialListStore` used by the lifecycle integration tests.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use tenon_core::error::LifecycleError;
use tenon_core::lifecycle::{MaterialListStore, Transition};
use tenon_core::model::{MaterialList, Snapshot, SnapshotKind, Status};

#[derive(Debug, Default)]
pub struct MemoryStore {
    lists: Vec<MaterialList>,
    current: HashMap<i64, Snapshot>,
    snapshots: HashMap<(i64, SnapshotKind), Snapshot>,
    next_id: i64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Poke `updated_at` directly, simulating a concurrent writer.
    pub fn touch(&mut self, id: i64, at: DateTime<Utc>) {
        if let Some(list) = self.lists.iter_mut().find(|l| l.id == id) {
            list.updated_at = at;
        }
    }

    #[must_use]
    pub fn snapshot(&self, id: i64, kind: SnapshotKind) -> Option<&Snapshot> {
        self.snapshots.get(&(id, kind))
    }
}

impl MaterialListStore for MemoryStore {
    fn get_by_order(&self, order_number: &str) -> Result<Option<MaterialList>, LifecycleError> {
        Ok(self
            .lists
            .iter()
            .find(|l| l.order_number == order_number)
            .cloned())
    }

    fn create(
        &mut self,
        order_number: &str,
        created_by: &str,
        now: DateTime<Utc>,
    ) -> Result<MaterialList, LifecycleError> {
        let list = MaterialList {
            id: self.next_id,
            order_number: order_number.to_string(),
            status: Status::NotStarted,
            quotation_type: None,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            submitted_at: None,
        };
        self.next_id += 1;
        self.current.insert(
            list.id,
            Snapshot {
                projects: vec![],
                categories: vec![],
            },
        );
        self.lists.push(list.clone());
        Ok(list)
    }

    fn load_current(&self, material_list_id: i64) -> Result<Snapshot, LifecycleError> {
        self.current
            .get(&material_list_id)
            .cloned()
            .ok_or_else(|| LifecycleError::NotFound(material_list_id.to_string()))
    }

    fn load_snapshot(
        &self,
        material_list_id: i64,
        kind: SnapshotKind,
    ) -> Result<Option<Snapshot>, LifecycleError> {
        Ok(self.snapshots.get(&(material_list_id, kind)).cloned())
    }

    fn apply(&mut self, transition: &Transition) -> Result<MaterialList, LifecycleError> {
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id == transition.material_list_id)
            .ok_or_else(|| LifecycleError::NotFound(transition.material_list_id.to_string()))?;

        if list.updated_at != transition.expected_updated_at {
            return Err(LifecycleError::Conflict);
        }

        if let Some(status) = transition.new_status {
            list.status = status;
        }
        if let Some(quotation_type) = transition.quotation_type {
            list.quotation_type = Some(quotation_type);
        }
        if let Some(submitted_at) = transition.submitted_at {
            list.submitted_at = Some(submitted_at);
        }
        list.updated_at = transition.now;

        let result = list.clone();
        if let Some(state) = &transition.replace_current {
            self.current.insert(result.id, state.clone());
        }
        if let Some((kind, snapshot)) = &transition.write_snapshot {
            self.snapshots.insert((result.id, *kind), snapshot.clone());
        }
        Ok(result)
    }
}
