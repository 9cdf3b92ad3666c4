//! Keyed integer storage with no policy awareness.
//!
//! Only the [`ReferenceMonitor`](crate::ReferenceMonitor) holds one, and it
//! checks existence before every `get`/`set`. Reaching either on an absent
//! key is a caller bug and comes back as [`CovertError::UnregisteredObject`].

use covert_core::error::{CovertError, CovertResult};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: HashMap<String, i32>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `name` with `value`. Overwrites silently; callers check
    /// [`contains`](Self::contains) first.
    pub fn create(&mut self, name: &str, value: i32) {
        self.objects.insert(name.to_string(), value);
    }

    /// Removes `name`, returning its last value if it existed.
    pub fn destroy(&mut self, name: &str) -> Option<i32> {
        self.objects.remove(name)
    }

    /// Current value of `name`. Absent keys are a contract violation.
    pub fn get(&self, name: &str) -> CovertResult<i32> {
        self.objects
            .get(name)
            .copied()
            .ok_or_else(|| CovertError::UnregisteredObject(name.to_string()))
    }

    /// Overwrites the value of an existing object.
    pub fn set(&mut self, name: &str, value: i32) -> CovertResult<()> {
        let slot = self
            .objects
            .get_mut(name)
            .ok_or_else(|| CovertError::UnregisteredObject(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), *v))
    }
}
