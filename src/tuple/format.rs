//! Runtime tuple format: reference-counted schema descriptor.
//!
//! Two kinds:
//! - nameless: positional access only; one shared instance lives in the
//!   Database and is handed out to every read view that does not need field
//!   names (see Database::runtime_format).
//! - dictionary-backed: carries an independent TupleDictionary copy so that
//!   name-based access keeps working even after the live space is altered.
//!
//! The C-side ref counter maps to Arc: holding Arc<TupleFormat> is holding a
//! reference; identity comparison is Arc::ptr_eq on the handle.

use std::sync::Arc;

use super::TupleDictionary;

#[derive(Debug)]
pub struct TupleFormat {
    dict: Option<Arc<TupleDictionary>>,
}

impl TupleFormat {
    /// New nameless runtime format (positional access only).
    pub fn nameless() -> Self {
        Self { dict: None }
    }

    /// New format backed by a field dictionary.
    pub fn with_dictionary(dict: Arc<TupleDictionary>) -> Self {
        Self { dict: Some(dict) }
    }

    pub fn has_field_names(&self) -> bool {
        self.dict.is_some()
    }

    pub fn dictionary(&self) -> Option<&Arc<TupleDictionary>> {
        self.dict.as_ref()
    }

    /// Field position for a name; None for nameless formats or unknown names.
    pub fn field_no_by_name(&self, name: &str) -> Option<u32> {
        self.dict.as_ref()?.no_by_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::{FieldDef, FieldType};

    #[test]
    fn nameless_format_resolves_nothing() {
        let f = TupleFormat::nameless();
        assert!(!f.has_field_names());
        assert_eq!(f.field_no_by_name("id"), None);
    }

    #[test]
    fn dictionary_format_resolves_names() {
        let dict = Arc::new(
            TupleDictionary::new(&[FieldDef::new("id", FieldType::Unsigned)]).unwrap(),
        );
        let f = TupleFormat::with_dictionary(dict);
        assert!(f.has_field_names());
        assert_eq!(f.field_no_by_name("id"), Some(0));
        assert_eq!(f.field_no_by_name("nope"), None);
    }
}
