//! Field dictionary: maps field names to positions.
//!
//! A dictionary is an independent copy of the field names of a space
//! definition. Read views that need name-based access build their own
//! dictionary instead of borrowing the live space's one, because the live
//! definition may be altered after the read view is taken.

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use super::FieldDef;

/// Immutable name -> field position mapping. Shared via Arc.
#[derive(Debug)]
pub struct TupleDictionary {
    names: Vec<String>,
    by_name: HashMap<String, u32>,
}

impl TupleDictionary {
    /// Build a dictionary from field definitions. Fails on duplicate names.
    pub fn new(fields: &[FieldDef]) -> Result<Self> {
        let mut names = Vec::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len());
        for (no, field) in fields.iter().enumerate() {
            if by_name.insert(field.name.clone(), no as u32).is_some() {
                return Err(anyhow!("duplicate field name '{}'", field.name));
            }
            names.push(field.name.clone());
        }
        Ok(Self { names, by_name })
    }

    pub fn field_count(&self) -> u32 {
        self.names.len() as u32
    }

    pub fn name_by_no(&self, no: u32) -> Option<&str> {
        self.names.get(no as usize).map(|s| s.as_str())
    }

    pub fn no_by_name(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::FieldType;

    #[test]
    fn dictionary_maps_names_to_positions() {
        let fields = vec![
            FieldDef::new("id", FieldType::Unsigned),
            FieldDef::new("name", FieldType::String),
        ];
        let dict = TupleDictionary::new(&fields).expect("must build");
        assert_eq!(dict.field_count(), 2);
        assert_eq!(dict.no_by_name("id"), Some(0));
        assert_eq!(dict.no_by_name("name"), Some(1));
        assert_eq!(dict.no_by_name("missing"), None);
        assert_eq!(dict.name_by_no(1), Some("name"));
        assert_eq!(dict.name_by_no(2), None);
    }

    #[test]
    fn dictionary_rejects_duplicate_names() {
        let fields = vec![
            FieldDef::new("id", FieldType::Unsigned),
            FieldDef::new("id", FieldType::String),
        ];
        assert!(TupleDictionary::new(&fields).is_err());
    }
}
