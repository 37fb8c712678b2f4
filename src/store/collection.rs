use crate::core::{EntityData, Record};
use std::collections::BTreeSet;

/// Insertion-ordered records of one kind, unique by `id`.
///
/// Besides the records it tracks which ids exist only locally because the
/// remote write that should have created or updated them failed.
#[derive(Debug, Clone)]
pub struct EntityCollection<D> {
    records: Vec<Record<D>>,
    pending_sync: BTreeSet<String>,
}

impl<D> Default for EntityCollection<D> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            pending_sync: BTreeSet::new(),
        }
    }
}

impl<D: EntityData> EntityCollection<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from stored records. A repeated id replaces the
    /// earlier record, keeping the first position.
    pub fn from_records(records: Vec<Record<D>>) -> Self {
        let mut collection = Self::new();
        collection.replace_all(records);
        collection
    }

    pub fn list(&self) -> &[Record<D>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record<D>> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Inserts at the end when `id` is new, otherwise replaces in place.
    pub fn upsert(&mut self, record: Record<D>) -> &[Record<D>] {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        &self.records
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.pending_sync.remove(id);
        self.records.len() != before
    }

    /// Mutates the record in place. Absent ids are left alone.
    pub fn update_with<F>(&mut self, id: &str, f: F) -> Option<&Record<D>>
    where
        F: FnOnce(&mut Record<D>),
    {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        let original_id = record.id.clone();
        f(record);
        record.id = original_id;
        Some(&*record)
    }

    pub fn replace_all(&mut self, records: Vec<Record<D>>) {
        self.records.clear();
        for record in records {
            self.upsert(record);
        }
        let records = &self.records;
        self.pending_sync
            .retain(|id| records.iter().any(|record| &record.id == id));
    }

    pub fn pending_sync(&self) -> &BTreeSet<String> {
        &self.pending_sync
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending_sync.contains(id)
    }

    pub fn mark_pending(&mut self, id: &str) {
        if self.contains(id) {
            self.pending_sync.insert(id.to_string());
        }
    }

    pub fn clear_pending(&mut self, id: &str) {
        self.pending_sync.remove(id);
    }

    pub(crate) fn restore_pending(&mut self, ids: Vec<String>) {
        for id in ids {
            self.mark_pending(&id);
        }
    }

    /// Id for a record synthesized locally: the given Unix time in
    /// milliseconds, bumped until it does not collide.
    pub fn next_local_id(&self, unix_millis: i64) -> String {
        let mut candidate = unix_millis;
        loop {
            let id = candidate.to_string();
            if !self.contains(&id) {
                return id;
            }
            candidate += 1;
        }
    }
}
