use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the soft-delete flag in the document index
pub const DELETED_FIELD: &str = "deleted";

/// What the gateway knows about a document in the content index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceRecord {
    pub index: String,
    pub document_id: String,
    pub deleted: Option<bool>,
}

impl ExistenceRecord {
    /// Build a record from the fields returned by the index
    ///
    /// A non-boolean `deleted` value is treated as absent.
    #[must_use]
    pub fn from_fields(index: &str, document_id: &str, fields: Option<&Map<String, Value>>) -> Self {
        let deleted = fields.and_then(|f| f.get(DELETED_FIELD)).and_then(Value::as_bool);
        Self { index: index.to_string(), document_id: document_id.to_string(), deleted }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_deleted_flag() {
        let source = fields(json!({"deleted": true}));
        let record = ExistenceRecord::from_fields("idx", "vid", Some(&source));
        assert_eq!(record.deleted, Some(true));
        assert!(record.is_deleted());
    }

    #[test]
    fn test_missing_flag() {
        let source = fields(json!({"title": "x"}));
        let record = ExistenceRecord::from_fields("idx", "vid", Some(&source));
        assert_eq!(record.deleted, None);
        assert!(!record.is_deleted());

        let record = ExistenceRecord::from_fields("idx", "vid", None);
        assert!(!record.is_deleted());
    }

    #[test]
    fn test_non_boolean_flag_ignored() {
        let source = fields(json!({"deleted": "yes"}));
        let record = ExistenceRecord::from_fields("idx", "vid", Some(&source));
        assert_eq!(record.deleted, None);
    }
}
