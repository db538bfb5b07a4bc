//! Router-scoped configuration.
//!
//! An open bag of JSON values shared by the router and anything holding a
//! [`Config`] handle. Writes publish a new snapshot atomically, so dispatches
//! running concurrently see either the old or the new map, never a partial
//! write. Ordering between concurrent writers is up to the caller.

use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Key under which browser routers find the element to render errors into.
pub const ENTRYPOINT: &str = "entrypoint";

/// Key naming the active layout.
pub const LAYOUT: &str = "layout";

/// A shared handle to router configuration. Clones see the same values.
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: Arc<ArcSwap<HashMap<String, Value>>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds configuration from a JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Config {
            values: Arc::new(ArcSwap::from_pointee(map.into_iter().collect())),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.load().get(key).cloned()
    }

    /// Returns a string value, if the key holds one.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.load().get(key) {
            Some(Value::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        self.values.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key.clone(), value.clone());
            next
        });
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let previous = self.get(key);
        if previous.is_some() {
            self.values.rcu(|current| {
                let mut next = HashMap::clone(current);
                next.remove(key);
                next
            });
        }
        previous
    }

    /// The element browser routers render error content into.
    pub fn entrypoint(&self) -> Option<String> {
        self.get_str(ENTRYPOINT)
    }

    pub fn layout(&self) -> Option<String> {
        self.get_str(LAYOUT)
    }

    /// A consistent view of every value at this moment.
    pub fn snapshot(&self) -> Arc<HashMap<String, Value>> {
        self.values.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get() {
        let config = Config::new();
        config.set("title", "Tasks");
        config.set("limit", 3);

        assert_eq!(config.get("title"), Some(json!("Tasks")));
        assert_eq!(config.get("limit"), Some(json!(3)));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn handles_share_values() {
        let config = Config::new();
        let handle = config.clone();
        handle.set(ENTRYPOINT, "app");

        assert_eq!(config.entrypoint().as_deref(), Some("app"));
        assert_eq!(config.remove(ENTRYPOINT), Some(json!("app")));
        assert!(config.snapshot().is_empty());
    }

    #[test]
    fn seeded() {
        let map = json!({ "layout": "admin" }).as_object().cloned().unwrap();
        let config = Config::from_map(map);

        assert_eq!(config.layout().as_deref(), Some("admin"));
        assert_eq!(config.entrypoint(), None);
    }
}
