use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::query::QueryParams;

/// Ordered, duplicate-free set of state keys mirrored into the URL.
///
/// Declaration order is the order tracked keys are written to the query
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedKeys {
    keys: Vec<String>,
}

impl TrackedKeys {
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut tracked = Vec::new();
        for key in keys {
            let key = key.into();
            if !key.is_empty() && !tracked.contains(&key) {
                tracked.push(key);
            }
        }
        Self { keys: tracked }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Tracked keys holding a non-empty value in `state`, in declaration order.
    pub fn snapshot<S: QueryState + ?Sized>(&self, state: &S) -> TrackedState {
        self.iter()
            .filter_map(|key| match state.value(key) {
                Some(value) if !value.is_empty() => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    /// Tracked keys holding a non-empty value in `params`, in declaration
    /// order. Untracked parameters are ignored.
    pub fn extract(&self, params: &QueryParams) -> TrackedState {
        self.iter()
            .filter_map(|key| match params.get(key) {
                Some(value) if !value.is_empty() => Some((key, value)),
                _ => None,
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<K> for TrackedKeys {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Page state as seen by the synchronizer: string values looked up by key,
/// updated through partial patches.
pub trait QueryState {
    fn value(&self, key: &str) -> Option<&str>;
    fn apply(&mut self, patch: &StatePatch);
}

/// Partial update: `Some` sets a key, `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    updates: Vec<(String, Option<String>)>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.updates.push((key.into(), Some(value.into())));
        self
    }

    pub fn clear(mut self, key: impl Into<String>) -> Self {
        self.updates.push((key.into(), None));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.updates.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Generic string-keyed state, ordered by insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedState {
    values: Vec<(String, String)>,
}

impl TrackedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.values.iter().position(|(k, _)| k == key)?;
        Some(self.values.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Same keys and values, ignoring order.
    pub fn same_values(&self, other: &TrackedState) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl QueryState for TrackedState {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key)
    }

    fn apply(&mut self, patch: &StatePatch) {
        for (key, value) in patch.iter() {
            match value {
                Some(value) => self.set(key, value),
                None => {
                    self.remove(key);
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TrackedState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (key, value) in iter {
            state.set(key, value);
        }
        state
    }
}

impl Serialize for TrackedState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_keys_dedupe_and_keep_order() {
        let keys = TrackedKeys::new(["status", "shopId", "status", ""]);
        assert_eq!(keys.iter().collect::<Vec<_>>(), vec!["status", "shopId"]);
        assert!(keys.contains("shopId"));
        assert!(!keys.contains("page"));
    }

    #[test]
    fn snapshot_skips_empty_and_untracked_values() {
        let keys = TrackedKeys::new(["shopId", "status", "dateFrom"]);
        let state: TrackedState = [("status", "PAID"), ("shopId", ""), ("page", "3")]
            .into_iter()
            .collect();
        let snap = keys.snapshot(&state);
        assert_eq!(snap.iter().collect::<Vec<_>>(), vec![("status", "PAID")]);
    }

    #[test]
    fn extract_reads_tracked_params_in_declaration_order() {
        let keys = TrackedKeys::new(["shopId", "status"]);
        let params = QueryParams::parse("?page=3&status=PAID&shopId=7");
        let candidate = keys.extract(&params);
        assert_eq!(
            candidate.iter().collect::<Vec<_>>(),
            vec![("shopId", "7"), ("status", "PAID")]
        );
    }

    #[test]
    fn patch_sets_and_clears() {
        let mut state: TrackedState = [("a", "1"), ("b", "2")].into_iter().collect();
        state.apply(&StatePatch::new().set("a", "9").clear("b").set("c", "3"));
        assert_eq!(state.get("a"), Some("9"));
        assert_eq!(state.get("b"), None);
        assert_eq!(state.get("c"), Some("3"));
    }

    #[test]
    fn same_values_ignores_order() {
        let a: TrackedState = [("x", "1"), ("y", "2")].into_iter().collect();
        let b: TrackedState = [("y", "2"), ("x", "1")].into_iter().collect();
        let c: TrackedState = [("x", "1")].into_iter().collect();
        assert!(a.same_values(&b));
        assert!(!a.same_values(&c));
    }

    #[test]
    fn serializes_as_ordered_map() {
        let state: TrackedState = [("shopId", "7"), ("status", "PAID")].into_iter().collect();
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"shopId":"7","status":"PAID"}"#);
    }
}
