//! A flat key → text table loaded from nested JSON.

use crate::error::LocaleError;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

// Hardcoded pattern, cannot fail to compile
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[A-Za-z0-9_.-]+\}").expect("placeholder pattern is valid"));

/// Localized strings keyed by dot-separated paths such as `menu.start`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Parse a catalog, flattening nested objects into dotted keys.
    ///
    /// String leaves are kept as is; any other leaf is stored as its JSON
    /// text (`3`, `true`, `[1,2]`).
    pub fn from_json(json: &str) -> Result<Self, LocaleError> {
        let Value::Object(root) = serde_json::from_str::<Value>(json)? else {
            return Err(LocaleError::NotAnObject);
        };
        let mut entries = HashMap::new();
        flatten(&root, "", &mut entries);
        Ok(Self { entries })
    }

    /// Look up `key` and fill its `{name}` placeholders with `args`.
    ///
    /// Placeholders are filled left to right regardless of their names.
    /// Placeholders beyond the last argument are left as written, and a
    /// missing key comes back as `⟦key⟧`.
    pub fn text(&self, key: &str, args: &[&dyn Display]) -> String {
        let Some(template) = self.entries.get(key) else {
            return missing(key);
        };
        if args.is_empty() {
            return template.clone();
        }

        let mut args = args.iter();
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| match args.next() {
                Some(arg) => arg.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// The raw template for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The text shown for a key with no translation.
fn missing(key: &str) -> String {
    format!("⟦{key}⟧")
}

fn flatten(object: &Map<String, Value>, prefix: &str, out: &mut HashMap<String, String>) {
    for (key, value) in object {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            Value::Object(nested) => flatten(nested, &full_key, out),
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "Dungeon",
        "status": {
            "health": "{player} has {hp}/{max} HP",
            "level": 3
        },
        "flags": { "debug": false }
    }"#;

    #[test]
    fn test_flatten_nested_keys() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get("title"), Some("Dungeon"));
        assert_eq!(catalog.get("status.level"), Some("3"));
        assert_eq!(catalog.get("flags.debug"), Some("false"));
        assert!(catalog.get("status").is_none());
    }

    #[test]
    fn test_missing_key() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.text("menu.quit", &[]), "⟦menu.quit⟧");
        assert_eq!(Catalog::default().text("x", &[&1]), "⟦x⟧");
    }

    #[test]
    fn test_placeholders_filled_in_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.text("status.health", &[&"Ada", &7, &10]),
            "Ada has 7/10 HP"
        );
    }

    #[test]
    fn test_surplus_placeholders_left_unexpanded() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(
            catalog.text("status.health", &[&"Ada"]),
            "Ada has {hp}/{max} HP"
        );
    }

    #[test]
    fn test_no_args_returns_template() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.text("status.health", &[]), "{player} has {hp}/{max} HP");
    }

    #[test]
    fn test_extra_args_ignored() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.text("title", &[&"unused"]), "Dungeon");
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(Catalog::from_json("[1, 2]"), Err(LocaleError::NotAnObject)));
        assert!(matches!(Catalog::from_json("{"), Err(LocaleError::Parse(_))));
    }
}
