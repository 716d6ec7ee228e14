// Base modules
pub mod consts;
pub mod config;
pub mod metrics;

// Module folders (with mod.rs)
pub mod tuple;     // src/tuple/{mod,dictionary,format}.rs
pub mod space;     // src/space/{mod,upgrade}.rs
pub mod engine;    // src/engine/{mod,memory}.rs
pub mod db;        // src/db/mod.rs
pub mod read_view; // src/read_view/{mod,options,owner,space}.rs

// Convenience re-exports
pub use config::FrostConfig;
pub use db::Database;
pub use engine::{Engine, EngineReadView, Index, IndexReadView, MemoryEngine, MemoryIndex};
pub use read_view::{IndexReadViewHandle, ReadView, ReadViewOptions, SpaceReadView};
pub use space::{FillNewFields, Space, SpaceDef, SpaceUpgrade, TupleTransform};
pub use tuple::{FieldDef, FieldType, Tuple, TupleDictionary, TupleFormat, Value};
