//! In-memory reference engine.
//!
//! MemoryIndex keeps key -> Tuple in an ordered map behind an RwLock; its read
//! view is a plain clone of that map taken at creation time, so the frozen
//! view is trivially isolated from later writes.
//!
//! Both the engine and each index count their live read views. The counters
//! are how tests observe the all-or-nothing rollback contract of open():
//! after a failed open every counter must be back to zero.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};

use super::{Engine, EngineReadView, Index, IndexReadView};
use crate::read_view::ReadViewOptions;
use crate::tuple::Tuple;

/// Decrements a live-object counter on drop.
struct LiveGuard {
    counter: Arc<AtomicU64>,
}

impl LiveGuard {
    fn acquire(counter: &Arc<AtomicU64>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self {
            counter: counter.clone(),
        }
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Snapshot-capable in-memory engine (construct with new_volatile for an
/// engine that opts out of read views).
pub struct MemoryEngine {
    name: String,
    supports_read_view: bool,
    live_read_views: Arc<AtomicU64>,
}

impl MemoryEngine {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            supports_read_view: true,
            live_read_views: Arc::new(AtomicU64::new(0)),
        })
    }

    /// An engine that does not advertise snapshot support; the read-view core
    /// skips it and all its spaces.
    pub fn new_volatile(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            supports_read_view: false,
            live_read_views: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Number of engine read views currently alive.
    pub fn live_read_views(&self) -> u64 {
        self.live_read_views.load(Ordering::Relaxed)
    }
}

impl Engine for MemoryEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_read_view(&self) -> bool {
        self.supports_read_view
    }

    fn create_read_view(&self, _opts: &ReadViewOptions) -> Result<Box<dyn EngineReadView>> {
        if !self.supports_read_view {
            return Err(anyhow!(
                "engine '{}' does not support read views",
                self.name
            ));
        }
        Ok(Box::new(MemoryEngineReadView {
            engine_name: self.name.clone(),
            _guard: LiveGuard::acquire(&self.live_read_views),
        }))
    }
}

/// Engine-wide snapshot state of MemoryEngine. Nothing to pin beyond the
/// live counter: index read views carry their own frozen data.
pub struct MemoryEngineReadView {
    engine_name: String,
    _guard: LiveGuard,
}

impl EngineReadView for MemoryEngineReadView {
    fn engine_name(&self) -> &str {
        &self.engine_name
    }
}

/// Ordered key -> Tuple index.
pub struct MemoryIndex {
    id: u32,
    name: String,
    data: RwLock<BTreeMap<Vec<u8>, Tuple>>,
    live_read_views: Arc<AtomicU64>,
}

impl MemoryIndex {
    pub fn new(id: u32, name: &str) -> Arc<Self> {
        Arc::new(Self {
            id,
            name: name.to_string(),
            data: RwLock::new(BTreeMap::new()),
            live_read_views: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Writer side: insert/replace a record.
    pub fn insert(&self, key: &[u8], tuple: Tuple) {
        self.data
            .write()
            .expect("index lock poisoned")
            .insert(key.to_vec(), tuple);
    }

    /// Writer side: delete a record.
    pub fn remove(&self, key: &[u8]) {
        self.data.write().expect("index lock poisoned").remove(key);
    }

    pub fn len(&self) -> usize {
        self.data.read().expect("index lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of index read views currently alive.
    pub fn live_read_views(&self) -> u64 {
        self.live_read_views.load(Ordering::Relaxed)
    }
}

impl Index for MemoryIndex {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn create_read_view(&self) -> Result<Box<dyn IndexReadView>> {
        let frozen = self.data.read().expect("index lock poisoned").clone();
        Ok(Box::new(MemoryIndexReadView {
            data: frozen,
            _guard: LiveGuard::acquire(&self.live_read_views),
        }))
    }
}

/// Frozen copy of a MemoryIndex.
pub struct MemoryIndexReadView {
    data: BTreeMap<Vec<u8>, Tuple>,
    _guard: LiveGuard,
}

impl IndexReadView for MemoryIndexReadView {
    fn get(&self, key: &[u8]) -> Option<Tuple> {
        self.data.get(key).cloned()
    }

    fn tuples(&self) -> Vec<Tuple> {
        self.data.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::Value;

    #[test]
    fn index_read_view_is_isolated_from_writes() {
        let idx = MemoryIndex::new(0, "primary");
        idx.insert(b"a", Tuple::new(vec![Value::Unsigned(1)]));

        let rv = idx.create_read_view().expect("must create");
        idx.insert(b"b", Tuple::new(vec![Value::Unsigned(2)]));
        idx.remove(b"a");

        assert_eq!(rv.len(), 1);
        assert!(rv.get(b"a").is_some());
        assert!(rv.get(b"b").is_none());
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn live_read_view_counters() {
        let idx = MemoryIndex::new(0, "primary");
        assert_eq!(idx.live_read_views(), 0);
        let rv = idx.create_read_view().expect("must create");
        assert_eq!(idx.live_read_views(), 1);
        drop(rv);
        assert_eq!(idx.live_read_views(), 0);

        let eng = MemoryEngine::new("memory");
        let opts = ReadViewOptions::default();
        let erv = eng.create_read_view(&opts).expect("must create");
        assert_eq!(eng.live_read_views(), 1);
        drop(erv);
        assert_eq!(eng.live_read_views(), 0);
    }

    #[test]
    fn volatile_engine_refuses_read_views() {
        let eng = MemoryEngine::new_volatile("scratch");
        assert!(!eng.supports_read_view());
        assert!(eng.create_read_view(&ReadViewOptions::default()).is_err());
    }
}
