//! engine — storage engine seams consumed by the read-view core.
//!
//! Submodules:
//! - memory.rs: MemoryEngine/MemoryIndex, the in-memory reference engine.
//!
//! The core only sequences lifecycle through these traits: it asks an engine
//! whether it can snapshot itself, asks factories for engine/index read views,
//! and tears everything down by dropping. Scan semantics of an index read view
//! are the engine's business.

mod memory;

pub use memory::{MemoryEngine, MemoryEngineReadView, MemoryIndex, MemoryIndexReadView};

use anyhow::Result;

use crate::read_view::ReadViewOptions;
use crate::tuple::Tuple;

/// Pluggable storage engine. Snapshot support is optional per engine.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Capability flag: engines answering false are silently skipped when a
    /// read view is opened, together with all their spaces.
    fn supports_read_view(&self) -> bool;

    /// Engine-wide snapshot state. Only called on engines that advertise
    /// support; teardown is Drop.
    fn create_read_view(&self, opts: &ReadViewOptions) -> Result<Box<dyn EngineReadView>>;
}

/// Opaque per-engine snapshot state. Lifecycle only: created by the engine
/// factory, destroyed by Drop when the owning read view closes.
pub trait EngineReadView: Send {
    fn engine_name(&self) -> &str;
}

/// One index of a space.
pub trait Index: Send + Sync {
    fn id(&self) -> u32;

    fn name(&self) -> &str;

    /// Frozen scan surface over this index. Teardown is Drop.
    fn create_read_view(&self) -> Result<Box<dyn IndexReadView>>;
}

/// Frozen scan surface of one index. The read-view core wraps each one in a
/// handle carrying the back-reference to its space read view; engine code
/// should go through the handle so ownership checks fire in debug builds.
pub trait IndexReadView: Send {
    /// Point lookup by encoded key.
    fn get(&self, key: &[u8]) -> Option<Tuple>;

    /// All records in key order.
    fn tuples(&self) -> Vec<Tuple>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
