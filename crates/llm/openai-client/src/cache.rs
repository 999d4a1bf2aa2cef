//! Bounded response cache. Oldest entries are evicted first once the cap is reached.

use std::collections::VecDeque;
use std::sync::Mutex;

use dashmap::DashMap;

use crate::types::ModelTurn;

/// Entries kept per client when no capacity is given.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

pub(crate) struct ResponseCache {
    entries: DashMap<String, ModelTurn>,
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl ResponseCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<ModelTurn> {
        self.entries.get(key).map(|hit| hit.value().clone())
    }

    pub(crate) fn insert(&self, key: String, turn: ModelTurn) {
        if self.capacity == 0 {
            return;
        }
        let mut order = self.order.lock().unwrap_or_else(|e| e.into_inner());
        if self.entries.insert(key.clone(), turn).is_some() {
            return;
        }
        order.push_back(key);
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}
