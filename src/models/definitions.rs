//! SDK definitions and their resolution
//!
//! The definitions document lists every SDK the release job knows about:
//!
//! ```json
//! {"SDKS": [{"value": "python", "repo": "{package}_python", "template": "python"}]}
//! ```
//!
//! `value` becomes the lookup key and is dropped from the stored record.

use crate::core::constants::DEFINITION_ID_KEY;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// Error types for definition resolution
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Missing definitions for {0:?} SDKs, aborting.")]
    Missing(Vec<String>),

    #[error("Definition entry #{index} has no string `value` field")]
    MissingIdentifier { index: usize },

    #[error("Definition for {sdk:?} is malformed")]
    Malformed {
        sdk: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw definitions document
#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionsDocument {
    #[serde(rename = "SDKS")]
    pub sdks: Vec<Map<String, Value>>,
}

/// Repository and generator settings for one SDK
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SdkDefinition {
    /// Repository name template containing `{package}`
    pub repo: String,
    /// Generator flavor passed as `-g`
    pub template: String,
}

/// SDK identifier to definition lookup table
#[derive(Debug, Clone, Default)]
pub struct DefinitionTable {
    definitions: HashMap<String, SdkDefinition>,
}

impl DefinitionTable {
    /// Build the table from the definitions document
    ///
    /// A later entry with the same identifier replaces an earlier one.
    pub fn from_document(document: DefinitionsDocument) -> Result<Self, DefinitionError> {
        let mut definitions = HashMap::with_capacity(document.sdks.len());

        for (index, mut entry) in document.sdks.into_iter().enumerate() {
            let sdk = match entry.remove(DEFINITION_ID_KEY) {
                Some(Value::String(sdk)) => sdk,
                _ => return Err(DefinitionError::MissingIdentifier { index }),
            };

            let definition: SdkDefinition = serde_json::from_value(Value::Object(entry))
                .map_err(|source| DefinitionError::Malformed {
                    sdk: sdk.clone(),
                    source,
                })?;

            definitions.insert(sdk, definition);
        }

        Ok(Self { definitions })
    }

    pub fn get(&self, sdk: &str) -> Option<&SdkDefinition> {
        self.definitions.get(sdk)
    }

    pub fn contains(&self, sdk: &str) -> bool {
        self.definitions.contains_key(sdk)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check that every requested SDK has a definition
    ///
    /// All missing identifiers are reported at once, sorted and deduplicated.
    pub fn validate<S: AsRef<str>>(&self, requested: &[S]) -> Result<(), DefinitionError> {
        let missing: BTreeSet<&str> = requested
            .iter()
            .map(|sdk| sdk.as_ref())
            .filter(|sdk| !self.contains(sdk))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DefinitionError::Missing(
                missing.into_iter().map(String::from).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> DefinitionsDocument {
        serde_json::from_str(json).unwrap()
    }

    fn sample_table() -> DefinitionTable {
        DefinitionTable::from_document(document(
            r#"{"SDKS": [
                {"value": "python", "repo": "{package}_python", "template": "python", "label": "Python"},
                {"value": "php", "repo": "{package}_php", "template": "php"}
            ]}"#,
        ))
        .unwrap()
    }

    #[test]
    fn test_build_table_drops_identifier() {
        let table = sample_table();
        assert_eq!(table.len(), 2);

        let python = table.get("python").unwrap();
        assert_eq!(python.repo, "{package}_python");
        assert_eq!(python.template, "python");
    }

    #[test]
    fn test_validate_all_present() {
        assert!(sample_table().validate(&["php", "python"]).is_ok());
    }

    #[test]
    fn test_validate_reports_exactly_missing() {
        let err = sample_table()
            .validate(&["ruby", "python", "java", "ruby"])
            .unwrap_err();
        match err {
            DefinitionError::Missing(missing) => assert_eq!(missing, vec!["java", "ruby"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_message() {
        let err = sample_table().validate(&["go"]).unwrap_err();
        assert_eq!(err.to_string(), r#"Missing definitions for ["go"] SDKs, aborting."#);
    }

    #[test]
    fn test_entry_without_identifier() {
        let result = DefinitionTable::from_document(document(
            r#"{"SDKS": [{"repo": "x", "template": "y"}]}"#,
        ));
        assert!(matches!(
            result,
            Err(DefinitionError::MissingIdentifier { index: 0 })
        ));
    }

    #[test]
    fn test_entry_without_template() {
        let result = DefinitionTable::from_document(document(
            r#"{"SDKS": [{"value": "go", "repo": "{package}_go"}]}"#,
        ));
        assert!(matches!(result, Err(DefinitionError::Malformed { .. })));
    }

    #[test]
    fn test_later_entry_wins() {
        let table = DefinitionTable::from_document(document(
            r#"{"SDKS": [
                {"value": "go", "repo": "old", "template": "go"},
                {"value": "go", "repo": "new", "template": "go"}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(table.get("go").unwrap().repo, "new");
    }
}
