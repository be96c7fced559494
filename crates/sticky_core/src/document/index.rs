//! Identity index: the canonical home of embedded object state.

use crate::model::embedded::{EmbeddedId, EmbeddedObject};
use std::collections::BTreeMap;

/// Maps embedded object handles to their live state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectIndex {
    objects: BTreeMap<EmbeddedId, EmbeddedObject>,
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object under a freshly generated handle.
    pub fn register(&mut self, object: EmbeddedObject) -> EmbeddedId {
        let id = EmbeddedId::generate();
        self.objects.insert(id, object);
        id
    }

    pub fn get(&self, id: EmbeddedId) -> Option<&EmbeddedObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: EmbeddedId) -> Option<&mut EmbeddedObject> {
        self.objects.get_mut(&id)
    }

    pub fn remove(&mut self, id: EmbeddedId) -> Option<EmbeddedObject> {
        self.objects.remove(&id)
    }

    pub fn contains(&self, id: EmbeddedId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}
