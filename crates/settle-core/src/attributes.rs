//! Declarative attribute model exchanged with the host runtime
//!
//! The host owns diffing and persistence; a handler only sees the prior
//! state, the planned configuration and the state it writes back. Handlers
//! convert the planned map into a typed config struct up front and never
//! touch untyped values inside lifecycle code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute values indexed by attribute name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(Map<String, Value>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Like [`get`](Self::get), but treats null and zero values as unset
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !is_zero_value(v))
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Decode the map into a typed configuration
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    /// Encode a typed value; non-object values produce an empty map
    pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Ok(Self::default()),
        }
    }

    /// Overwrite every key present in `other`
    pub fn merge(&mut self, other: AttributeMap) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }
}

impl From<Map<String, Value>> for AttributeMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<AttributeMap> for Value {
    fn from(map: AttributeMap) -> Self {
        Value::Object(map.0)
    }
}

fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// One resource instance as seen by a handler invocation
#[derive(Debug, Clone, Default)]
pub struct ResourceData {
    id: String,
    prior: AttributeMap,
    planned: AttributeMap,
    state: AttributeMap,
    new_resource: bool,
}

impl ResourceData {
    /// Data for a resource that does not exist yet
    pub fn for_create(planned: AttributeMap) -> Self {
        Self {
            id: String::new(),
            prior: AttributeMap::new(),
            state: planned.clone(),
            planned,
            new_resource: true,
        }
    }

    /// Data for an existing resource with a planned change
    pub fn for_update(id: impl Into<String>, prior: AttributeMap, planned: AttributeMap) -> Self {
        Self {
            id: id.into(),
            state: planned.clone(),
            prior,
            planned,
            new_resource: false,
        }
    }

    /// Data for reading or deleting an existing resource
    pub fn existing(id: impl Into<String>, state: AttributeMap) -> Self {
        Self {
            id: id.into(),
            prior: state.clone(),
            planned: state.clone(),
            state,
            new_resource: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Assign the identifier; set once when the resource is created
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// The resource is gone; the host drops it from its tracked state
    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_new_resource(&self) -> bool {
        self.new_resource
    }

    /// Mark the resource as no longer new (after the create step finished)
    pub fn mark_existing(&mut self) {
        self.new_resource = false;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.planned.get(key)
    }

    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.planned.get_ok(key)
    }

    pub fn has_change(&self, key: &str) -> bool {
        self.prior.get(key) != self.planned.get(key)
    }

    pub fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has_change(key))
    }

    /// (prior, planned) values of one attribute
    pub fn get_change(&self, key: &str) -> (Option<&Value>, Option<&Value>) {
        (self.prior.get(key), self.planned.get(key))
    }

    /// Decode the planned configuration into a typed struct
    pub fn config<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        self.planned.decode()
    }

    /// Decode the prior state into a typed struct
    pub fn prior_config<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        self.prior.decode()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.set(key, value);
    }

    /// Mirror every observed attribute into the resulting state
    pub fn set_all(&mut self, observed: AttributeMap) {
        self.state.merge(observed);
    }

    pub fn state(&self) -> &AttributeMap {
        &self.state
    }

    pub fn into_state(self) -> AttributeMap {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        size: Option<i32>,
    }

    #[test]
    fn test_change_detection() {
        let prior = AttributeMap::new().with("name", "a").with("size", 1);
        let planned = AttributeMap::new().with("name", "a").with("size", 2);
        let data = ResourceData::for_update("id-1", prior, planned);

        assert!(!data.has_change("name"));
        assert!(data.has_change("size"));
        assert!(data.has_changes(&["name", "size"]));
        assert_eq!(data.get_change("size"), (Some(&json!(1)), Some(&json!(2))));
    }

    #[test]
    fn test_typed_round_trip() {
        let planned = AttributeMap::new().with("name", "fleet");
        let data = ResourceData::for_create(planned);
        let config: Sample = data.config().unwrap();
        assert_eq!(
            config,
            Sample {
                name: "fleet".to_string(),
                size: None
            }
        );

        let encoded = AttributeMap::encode(&config).unwrap();
        assert_eq!(encoded.get_str("name"), Some("fleet"));
    }

    #[test]
    fn test_get_ok_skips_zero_values() {
        let map = AttributeMap::new()
            .with("description", "")
            .with("timeout", 0)
            .with("enabled", true);
        assert!(map.get_ok("description").is_none());
        assert!(map.get_ok("timeout").is_none());
        assert!(map.get_ok("enabled").is_some());
        assert!(map.get_ok("missing").is_none());
    }

    #[test]
    fn test_clear_id_on_gone_resource() {
        let mut data = ResourceData::existing("fleet-1", AttributeMap::new());
        assert!(!data.is_new_resource());
        data.clear_id();
        assert!(data.id().is_empty());
    }
}
