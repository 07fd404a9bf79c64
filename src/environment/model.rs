//! Immutable value objects produced by a configuration resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named, ordered key/value layer contributing to an [`Environment`].
///
/// The name is an opaque provenance identifier (which backing document,
/// profile, or application the values came from). Iteration preserves
/// insertion order; duplicate keys are impossible by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySource {
    /// Provenance identifier, e.g. `"myapp-production"`.
    pub name: String,
    /// The key/value pairs, in insertion order.
    pub source: IndexMap<String, Value>,
}

impl PropertySource {
    /// Create a property source from a name and its values.
    pub fn new(name: impl Into<String>, source: IndexMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }
}

/// The fully assembled, precedence-ordered result of a configuration
/// resolution request.
///
/// Invariant: `property_sources` ordering encodes precedence. For any key
/// present in multiple sources, the value from the source appearing
/// **earlier** in the sequence wins when the environment is flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// The application name the environment was resolved for (the original,
    /// un-normalized request string).
    pub name: String,
    /// The profiles actually used to resolve the request. May differ from
    /// the raw request (`"default"` is substituted for blank).
    pub profiles: Vec<String>,
    /// The version label the environment was resolved against.
    pub label: Option<String>,
    /// Backing-store revision the values were read from, when the store
    /// exposes one (e.g. a commit id).
    pub version: Option<String>,
    /// Opaque backing-store state token, when the store exposes one.
    pub state: Option<String>,
    /// Precedence-ordered property sources, highest precedence first.
    pub property_sources: Vec<PropertySource>,
}

impl Environment {
    /// Create an empty environment for the given name and profiles.
    pub fn new(name: impl Into<String>, profiles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            profiles,
            label: None,
            version: None,
            state: None,
            property_sources: Vec::new(),
        }
    }

    /// Set the label this environment was resolved against.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the backing-store version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a property source (lower precedence than everything already
    /// present).
    pub fn add(&mut self, source: PropertySource) {
        self.property_sources.push(source);
    }

    /// Prepend a property source, giving it the highest precedence.
    pub fn add_first(&mut self, source: PropertySource) {
        self.property_sources.insert(0, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(name: &str, key: &str, value: &str) -> PropertySource {
        let mut map = IndexMap::new();
        map.insert(key.to_string(), json!(value));
        PropertySource::new(name, map)
    }

    #[test]
    fn add_appends_and_add_first_prepends() {
        let mut env = Environment::new("myapp", vec!["default".to_string()]);
        env.add(source("a", "k", "1"));
        env.add(source("b", "k", "2"));
        env.add_first(source("c", "k", "3"));

        let names: Vec<_> = env.property_sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let mut env = Environment::new("myapp", vec!["dev".to_string()]).with_label("main");
        env.add(source("myapp-dev", "server.port", "8080"));

        let json = serde_json::to_value(&env).unwrap();
        assert!(json.get("propertySources").is_some());
        assert_eq!(json["name"], "myapp");
        assert_eq!(json["label"], "main");
        assert_eq!(json["propertySources"][0]["source"]["server.port"], "8080");
    }

    #[test]
    fn round_trips_through_json() {
        let mut env = Environment::new("myapp", vec!["dev".to_string()])
            .with_label("main")
            .with_version("abc123");
        env.add(source("myapp-dev", "k", "v"));

        let text = serde_json::to_string(&env).unwrap();
        let back: Environment = serde_json::from_str(&text).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn property_source_preserves_insertion_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), json!(1));
        map.insert("a".to_string(), json!(2));
        map.insert("m".to_string(), json!(3));
        let source = PropertySource::new("s", map);

        let keys: Vec<_> = source.source.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}
