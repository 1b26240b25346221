//! Role corpus ingestion and the description lookup path.
//!
//! A corpus is a set of classification roles, each identified by a role
//! number (two 4-digit groups separated by a period, e.g. `1111.0300`) with
//! one free-text description. Two JSON shapes are accepted:
//!
//! - an object mapping role number to description:
//!   `{"1111.0300": "Plans and directs ..."}`
//! - an array of records carrying at least `role_number` and a description
//!   field: `[{"role_number": "1111.0300", "Role Description": "..."}]`
//!
//! Malformed entries (bad role number, empty description) are skipped with a
//! warning; they never abort ingestion. Roles are immutable once loaded.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::Result;

/// Lexical pattern of a role number: two 4-digit groups joined by a period.
static ROLE_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}\.\d{4}$").expect("role number pattern is valid")
});

/// Returns true when `candidate` is a well-formed role number.
pub fn is_role_number(candidate: &str) -> bool {
    ROLE_NUMBER_PATTERN.is_match(candidate)
}

/// One classification role: a stable identifier plus its description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Unique role number, e.g. `1111.0300`.
    pub role_number: String,
    /// Free-text description of the role.
    pub description: String,
}

/// An immutable, ordered collection of roles.
///
/// Iteration order is the role-number order (`BTreeMap`), which makes corpus
/// builds deterministic regardless of source JSON key order.
#[derive(Debug, Clone, Default)]
pub struct RoleCorpus {
    roles: BTreeMap<String, String>,
}

impl RoleCorpus {
    /// Build a corpus from role records, skipping malformed entries.
    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        let mut corpus = Self::default();
        for role in roles {
            corpus.insert(role.role_number, role.description);
        }
        corpus
    }

    /// Parse a corpus from a JSON value in either accepted shape.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let mut corpus = Self::default();
        match value {
            Value::Object(map) => {
                for (role_number, description) in map {
                    let description = description.as_str().unwrap_or_default().to_owned();
                    corpus.insert(role_number.clone(), description);
                }
            }
            Value::Array(records) => {
                for record in records {
                    let Some(role_number) = record.get("role_number").and_then(Value::as_str)
                    else {
                        warn!("skipping corpus record without a role_number field");
                        continue;
                    };
                    let description = record
                        .get("Role Description")
                        .or_else(|| record.get("description"))
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    corpus.insert(role_number.to_owned(), description.to_owned());
                }
            }
            other => {
                warn!(
                    "corpus JSON must be an object or an array, got {}",
                    json_type_name(other)
                );
            }
        }
        Ok(corpus)
    }

    /// Load a corpus from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::from_json_value(&value)
    }

    fn insert(&mut self, role_number: String, description: String) {
        if !is_role_number(&role_number) {
            warn!(role_number = %role_number, "skipping role with malformed role number");
            return;
        }
        if description.trim().is_empty() {
            warn!(role_number = %role_number, "skipping role with empty description");
            return;
        }
        self.roles.insert(role_number, description);
    }

    /// Number of roles in the corpus.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns true when the corpus holds no roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Iterate over `(role_number, description)` pairs in role-number order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles
            .iter()
            .map(|(number, description)| (number.as_str(), description.as_str()))
    }

    /// Look up a role's stored description by its exact role number.
    ///
    /// This is the independent description-by-id read path; it does not go
    /// through the fusion ranking. A miss is an explicit `None`, not an
    /// error.
    pub fn description(&self, role_number: &str) -> Option<&str> {
        self.roles.get(role_number).map(String::as_str)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_number_pattern() {
        assert!(is_role_number("1111.0300"));
        assert!(is_role_number("7222.0100"));
        assert!(!is_role_number("1111.030"));
        assert!(!is_role_number("111.0300"));
        assert!(!is_role_number("1111-0300"));
        assert!(!is_role_number("1111.03000"));
        assert!(!is_role_number("abcd.efgh"));
        assert!(!is_role_number(""));
    }

    #[test]
    fn test_corpus_from_json_object() {
        let value = json!({
            "1111.0300": "Plans, organises and directs operations.",
            "2512.0100": "Designs and develops software systems."
        });
        let corpus = RoleCorpus::from_json_value(&value).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.description("1111.0300"),
            Some("Plans, organises and directs operations.")
        );
    }

    #[test]
    fn test_corpus_from_json_records() {
        let value = json!([
            {"role_number": "1111.0300", "Role Name": "Director",
             "Role Description": "Plans and directs operations."},
            {"role_number": "2512.0100", "description": "Develops software."}
        ]);
        let corpus = RoleCorpus::from_json_value(&value).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.description("2512.0100"), Some("Develops software."));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let value = json!({
            "1111.0300": "Valid role.",
            "not-a-role": "Bad key.",
            "2512.0100": "",
            "3333.4444": "   "
        });
        let corpus = RoleCorpus::from_json_value(&value).unwrap();
        assert_eq!(corpus.len(), 1);
        assert!(corpus.description("not-a-role").is_none());
        assert!(corpus.description("2512.0100").is_none());
    }

    #[test]
    fn test_records_without_role_number_are_skipped() {
        let value = json!([
            {"Role Description": "No id here."},
            {"role_number": "1111.0300", "Role Description": "Fine."}
        ]);
        let corpus = RoleCorpus::from_json_value(&value).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let corpus = RoleCorpus::from_json_value(&json!({})).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.description("9999.9999"), None);
    }

    #[test]
    fn test_iteration_is_ordered_by_role_number() {
        let value = json!({
            "9999.0001": "Last.",
            "1111.0300": "First.",
            "5555.5555": "Middle."
        });
        let corpus = RoleCorpus::from_json_value(&value).unwrap();
        let numbers: Vec<&str> = corpus.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec!["1111.0300", "5555.5555", "9999.0001"]);
    }

    #[test]
    fn test_from_json_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"1111.0300": "Plans and directs operations."}}"#
        )
        .unwrap();

        let corpus = RoleCorpus::from_json_file(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
    }
}
