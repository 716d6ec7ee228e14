//! db — Database: engine list + space registry + shared runtime format.
//!
//! This is the writer-side container the read-view core walks at open time:
//! - engines, in registration order (engine read views are created in this
//!   order, before any space is visited);
//! - spaces, enumerated in id order through a callback that aborts on the
//!   first error;
//! - the process-wide nameless runtime tuple format, owned here explicitly
//!   rather than hidden in a global, and shared by every read view that does
//!   not ask for field names.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};

use crate::engine::Engine;
use crate::space::Space;
use crate::tuple::TupleFormat;

pub struct Database {
    engines: Vec<Arc<dyn Engine>>,
    spaces: RwLock<BTreeMap<u32, Arc<Space>>>,
    runtime_format: Arc<TupleFormat>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
            spaces: RwLock::new(BTreeMap::new()),
            runtime_format: Arc::new(TupleFormat::nameless()),
        }
    }

    /// Register an engine. Registration order is the engine read-view
    /// creation order at open time.
    pub fn add_engine(&mut self, engine: Arc<dyn Engine>) -> Result<()> {
        if self.engines.iter().any(|e| e.name() == engine.name()) {
            return Err(anyhow!("engine '{}' already registered", engine.name()));
        }
        self.engines.push(engine);
        Ok(())
    }

    pub fn engines(&self) -> &[Arc<dyn Engine>] {
        &self.engines
    }

    pub fn engine_by_name(&self, name: &str) -> Option<&Arc<dyn Engine>> {
        self.engines.iter().find(|e| e.name() == name)
    }

    /// Register a space. Fails on duplicate id or name.
    pub fn add_space(&self, space: Space) -> Result<Arc<Space>> {
        let mut spaces = self.spaces.write().expect("space registry poisoned");
        if spaces.contains_key(&space.id()) {
            return Err(anyhow!("space id {} already registered", space.id()));
        }
        if spaces.values().any(|s| s.name() == space.name()) {
            return Err(anyhow!("space name '{}' already registered", space.name()));
        }
        let space = Arc::new(space);
        spaces.insert(space.id(), space.clone());
        Ok(space)
    }

    pub fn remove_space(&self, id: u32) -> Option<Arc<Space>> {
        self.spaces
            .write()
            .expect("space registry poisoned")
            .remove(&id)
    }

    pub fn space_by_id(&self, id: u32) -> Option<Arc<Space>> {
        self.spaces
            .read()
            .expect("space registry poisoned")
            .get(&id)
            .cloned()
    }

    pub fn space_by_name(&self, name: &str) -> Option<Arc<Space>> {
        self.spaces
            .read()
            .expect("space registry poisoned")
            .values()
            .find(|s| s.name() == name)
            .cloned()
    }

    pub fn space_count(&self) -> usize {
        self.spaces.read().expect("space registry poisoned").len()
    }

    /// Enumerate all spaces in id order; stops at the first callback error
    /// and propagates it.
    pub fn foreach_space(&self, cb: &mut dyn FnMut(&Arc<Space>) -> Result<()>) -> Result<()> {
        let spaces: Vec<Arc<Space>> = self
            .spaces
            .read()
            .expect("space registry poisoned")
            .values()
            .cloned()
            .collect();
        for space in &spaces {
            cb(space)?;
        }
        Ok(())
    }

    /// The shared nameless runtime tuple format.
    pub fn runtime_format(&self) -> &Arc<TupleFormat> {
        &self.runtime_format
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryEngine;
    use crate::space::SpaceDef;

    #[test]
    fn registry_rejects_duplicates() {
        let mut db = Database::new();
        let eng = MemoryEngine::new("memory");
        db.add_engine(eng.clone()).expect("first engine");
        assert!(db.add_engine(MemoryEngine::new("memory")).is_err());

        db.add_space(Space::new(SpaceDef::new(1, "users", vec![]), eng.clone()))
            .expect("first space");
        assert!(db
            .add_space(Space::new(SpaceDef::new(1, "other", vec![]), eng.clone()))
            .is_err());
        assert!(db
            .add_space(Space::new(SpaceDef::new(2, "users", vec![]), eng))
            .is_err());
    }

    #[test]
    fn foreach_space_walks_in_id_order_and_aborts() {
        let mut db = Database::new();
        let eng = MemoryEngine::new("memory");
        db.add_engine(eng.clone()).expect("engine");
        for id in [3u32, 1, 2] {
            db.add_space(Space::new(
                SpaceDef::new(id, &format!("s{id}"), vec![]),
                eng.clone(),
            ))
            .expect("space");
        }

        let mut seen = Vec::new();
        db.foreach_space(&mut |s| {
            seen.push(s.id());
            Ok(())
        })
        .expect("full walk");
        assert_eq!(seen, vec![1, 2, 3]);

        let mut seen = Vec::new();
        let res = db.foreach_space(&mut |s| {
            seen.push(s.id());
            if s.id() == 2 {
                Err(anyhow!("stop"))
            } else {
                Ok(())
            }
        });
        assert!(res.is_err());
        assert_eq!(seen, vec![1, 2]);
    }
}
