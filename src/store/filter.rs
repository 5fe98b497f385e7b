//! # Query Filters
//!
//! Field predicates and query windows understood by the store.

use serde_json::Value;

use super::Document;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equals
    Eq,
}

/// A single field predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field to filter on
    pub field: String,

    /// Comparison operator
    pub operator: FilterOperator,

    /// Value to compare against
    pub value: Value,
}

impl Filter {
    /// Create an equality filter
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Eq,
            value: value.into(),
        }
    }

    /// Check if a document matches this filter.
    ///
    /// A missing field compares as `null`.
    pub fn matches(&self, doc: &Document) -> bool {
        let field_value = doc.get(&self.field).unwrap_or(&Value::Null);

        match self.operator {
            FilterOperator::Eq => field_value == &self.value,
        }
    }
}

/// Check that a document satisfies every filter
pub fn matches_all(filters: &[Filter], doc: &Document) -> bool {
    filters.iter().all(|f| f.matches(doc))
}

/// Filter plus skip/limit window for `find`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Conjunction of predicates
    pub filter: Vec<Filter>,

    /// Number of matching documents to skip
    pub skip: usize,

    /// Maximum number of documents to return
    pub limit: Option<usize>,
}

impl FindQuery {
    /// Query matching every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Query matching the given predicates
    pub fn filtered(filter: Vec<Filter>) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Restrict the result to a skip/limit window
    pub fn window(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_eq_filter() {
        let filter = Filter::eq("user", "u1");
        assert!(filter.matches(&doc(json!({"user": "u1"}))));
        assert!(!filter.matches(&doc(json!({"user": "u2"}))));
        assert!(!filter.matches(&doc(json!({}))));
    }

    #[test]
    fn test_missing_field_compares_as_null() {
        let filter = Filter::eq("description", Value::Null);
        assert!(filter.matches(&doc(json!({}))));
        assert!(!filter.matches(&doc(json!({"description": "x"}))));
    }

    #[test]
    fn test_matches_all_is_conjunction() {
        let filters = vec![Filter::eq("a", 1), Filter::eq("b", 2)];
        assert!(matches_all(&filters, &doc(json!({"a": 1, "b": 2}))));
        assert!(!matches_all(&filters, &doc(json!({"a": 1, "b": 3}))));
        assert!(matches_all(&[], &doc(json!({}))));
    }

    #[test]
    fn test_window() {
        let query = FindQuery::all().window(6, 3);
        assert_eq!(query.skip, 6);
        assert_eq!(query.limit, Some(3));
    }
}
