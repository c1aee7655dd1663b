//! JSON Schema for the profile file.

use jsonschema::Validator;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

const SCHEMA_JSON: &str = include_str!("../../../assets/remote-process.schema.json");

static VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value =
        serde_json::from_str(SCHEMA_JSON).expect("embedded schema should be valid JSON");
    jsonschema::validator_for(&schema).expect("embedded schema should compile")
});

/// One place where a document breaks the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON pointer into the offending document, empty for the root.
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pointer.as_str() {
            "" => f.write_str(&self.message),
            pointer => write!(f, "{pointer}: {}", self.message),
        }
    }
}

/// Returns the embedded JSON schema as a string.
pub fn schema() -> &'static str {
    SCHEMA_JSON
}

/// Checks `document` against the profile schema.
///
/// # Errors
///
/// Returns every violation found, in the order the validator reports them.
///
/// # Panics
///
/// Panics on first use if the embedded schema does not compile.
pub fn validate(document: &Value) -> Result<(), Vec<SchemaViolation>> {
    let violations: Vec<_> = VALIDATOR
        .iter_errors(document)
        .map(|error| SchemaViolation {
            pointer: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
