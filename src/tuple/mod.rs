//! tuple — records, field dictionaries and runtime tuple formats.
//!
//! Submodules:
//! - dictionary.rs: TupleDictionary (field name -> position), built from field defs.
//! - format.rs: TupleFormat (nameless or dictionary-backed), shared via Arc.
//!
//! A Tuple is an immutable, reference-counted array of Values. Cloning a Tuple
//! bumps a refcount; identity is observable via Tuple::ptr_eq, which is what
//! read-view result processing relies on for its "no upgrade => same record"
//! contract.

mod dictionary;
mod format;

pub use dictionary::TupleDictionary;
pub use format::TupleFormat;

use std::fmt;
use std::sync::Arc;

/// A single field value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Unsigned(u64),
    Integer(i64),
    Str(String),
    Bytes(Vec<u8>),
}

/// One field of a space definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            field_type,
        }
    }
}

/// Declared type of a field (advisory; values are dynamically typed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Any,
    Unsigned,
    Integer,
    String,
    Bytes,
    Boolean,
}

/// Immutable record. Clones share the underlying field array.
#[derive(Clone)]
pub struct Tuple {
    fields: Arc<Vec<Value>>,
}

impl Tuple {
    pub fn new(fields: Vec<Value>) -> Self {
        Self {
            fields: Arc::new(fields),
        }
    }

    pub fn field(&self, no: u32) -> Option<&Value> {
        self.fields.get(no as usize)
    }

    pub fn field_count(&self) -> u32 {
        self.fields.len() as u32
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Resolve a field by name through a format (requires a dictionary-backed
    /// format, returns None otherwise).
    pub fn field_by_name(&self, format: &TupleFormat, name: &str) -> Option<&Value> {
        self.field(format.field_no_by_name(name)?)
    }

    /// True if both tuples share the same underlying field array.
    pub fn ptr_eq(a: &Tuple, b: &Tuple) -> bool {
        Arc::ptr_eq(&a.fields, &b.fields)
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}
