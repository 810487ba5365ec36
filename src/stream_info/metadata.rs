//! Dynamic metadata: free-form namespace → key → value annotations that
//! filters attach to a transaction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicMetadata {
    namespaces: BTreeMap<String, Map<String, Value>>,
}

impl DynamicMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, namespace: impl Into<String>, key: impl Into<String>, value: impl Into<Value>) {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// All keys of one namespace as a structured object.
    pub fn namespace(&self, namespace: &str) -> Option<&Map<String, Value>> {
        self.namespaces.get(namespace)
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.namespace(namespace)?.get(key)
    }

    /// The value at `namespace`/`key` if it is a string.
    pub fn string_value(&self, namespace: &str, key: &str) -> Option<&str> {
        self.get(namespace, key)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_value() {
        let mut md = DynamicMetadata::new();
        md.set("cle.log.rsp.lua", "body", "{}");
        md.set("cle.log.rsp.lua", "size", 2);

        assert_eq!(md.string_value("cle.log.rsp.lua", "body"), Some("{}"));
        assert_eq!(md.string_value("cle.log.rsp.lua", "size"), None);
        assert_eq!(md.get("cle.log.rsp.lua", "size"), Some(&json!(2)));
        assert_eq!(md.string_value("missing", "body"), None);
    }
}
