//! Flattening an environment into one effective map and substituting
//! `${key}` placeholders in resource text.

use indexmap::IndexMap;
use serde_json::Value;

use super::Environment;

/// Flatten an environment into a single effective configuration.
///
/// Sources are merged in precedence order: for any key present in multiple
/// sources, the value from the source appearing earlier in
/// `property_sources` wins.
pub fn flatten(environment: &Environment) -> IndexMap<String, Value> {
    let mut effective = IndexMap::new();
    for source in &environment.property_sources {
        for (key, value) in &source.source {
            effective
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    effective
}

/// Substitute `${key}` and `${key:default}` placeholders in `text` using a
/// flattened environment.
///
/// Unresolved placeholders with no default are left verbatim. String values
/// render unquoted; other values render as their JSON form.
pub fn resolve_placeholders(values: &IndexMap<String, Value>, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let placeholder = &after[..end];
                let (key, default) = match placeholder.split_once(':') {
                    Some((key, default)) => (key, Some(default)),
                    None => (placeholder, None),
                };
                match values.get(key) {
                    Some(value) => out.push_str(&render(value)),
                    None => match default {
                        Some(default) => out.push_str(default),
                        None => {
                            out.push_str("${");
                            out.push_str(placeholder);
                            out.push('}');
                        }
                    },
                }
                rest = &after[end + 1..];
            }
            None => {
                // No closing brace: emit the rest untouched.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::PropertySource;
    use serde_json::json;

    fn environment(sources: Vec<(&str, Vec<(&str, Value)>)>) -> Environment {
        let mut env = Environment::new("myapp", vec!["default".to_string()]);
        for (name, pairs) in sources {
            let mut map = IndexMap::new();
            for (k, v) in pairs {
                map.insert(k.to_string(), v);
            }
            env.add(PropertySource::new(name, map));
        }
        env
    }

    #[test]
    fn earlier_source_wins_when_flattened() {
        let env = environment(vec![
            ("high", vec![("shared", json!("winner")), ("only-high", json!(1))]),
            ("low", vec![("shared", json!("loser")), ("only-low", json!(2))]),
        ]);

        let flat = flatten(&env);
        assert_eq!(flat["shared"], json!("winner"));
        assert_eq!(flat["only-high"], json!(1));
        assert_eq!(flat["only-low"], json!(2));
    }

    #[test]
    fn substitutes_known_keys() {
        let env = environment(vec![("s", vec![("greeting", json!("hello"))])]);
        let flat = flatten(&env);
        assert_eq!(resolve_placeholders(&flat, "say ${greeting}!"), "say hello!");
    }

    #[test]
    fn non_string_values_render_as_json() {
        let env = environment(vec![("s", vec![("port", json!(8080))])]);
        let flat = flatten(&env);
        assert_eq!(resolve_placeholders(&flat, "port=${port}"), "port=8080");
    }

    #[test]
    fn unresolved_placeholders_are_left_verbatim() {
        let flat = IndexMap::new();
        assert_eq!(resolve_placeholders(&flat, "x=${missing}"), "x=${missing}");
    }

    #[test]
    fn default_is_used_for_missing_keys() {
        let env = environment(vec![("s", vec![("present", json!("yes"))])]);
        let flat = flatten(&env);
        assert_eq!(
            resolve_placeholders(&flat, "${present:fallback} ${missing:fallback}"),
            "yes fallback"
        );
    }

    #[test]
    fn unterminated_placeholder_is_left_untouched() {
        let flat = IndexMap::new();
        assert_eq!(resolve_placeholders(&flat, "broken ${key"), "broken ${key");
    }

    #[test]
    fn multiple_placeholders_in_one_line() {
        let env = environment(vec![(
            "s",
            vec![("host", json!("localhost")), ("port", json!(5432))],
        )]);
        let flat = flatten(&env);
        assert_eq!(
            resolve_placeholders(&flat, "postgres://${host}:${port}/db"),
            "postgres://localhost:5432/db"
        );
    }
}
