//! `SharedStore` — per-manager key/value scratch space.

use qg_core::Value;
use rustc_hash::FxHashMap;

/// Key/value map scoped to one `EntityManager`.
///
/// Used for inter-entity communication and for publishing values the
/// rendering side reads back (`torus.rotX`, …).  Last write wins; no
/// validation of key or value shape.
#[derive(Clone, Debug, Default)]
pub struct SharedStore {
    values: FxHashMap<String, Value>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterate in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
