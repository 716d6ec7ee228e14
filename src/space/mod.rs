//! space — live space definitions and in-flight schema upgrades.
//!
//! Submodules:
//! - upgrade.rs: TupleTransform trait, SpaceUpgrade (live migration),
//!   SpaceUpgradeReadView (snapshotted transform), FillNewFields transform.
//!
//! A Space is the writer-side object: definition + owning engine + sparse
//! index map + optional in-flight upgrade. Read views copy what they need out
//! of it at open time and never look back.

mod upgrade;

pub use upgrade::{FillNewFields, SpaceUpgrade, SpaceUpgradeReadView, TupleTransform};

use std::sync::{Arc, RwLock};

use anyhow::{anyhow, Result};

use crate::consts::{GROUP_DEFAULT, INDEX_ID_MAX};
use crate::engine::{Engine, Index};
use crate::tuple::FieldDef;

/// Static definition of a space.
#[derive(Debug, Clone)]
pub struct SpaceDef {
    pub id: u32,
    pub name: String,
    pub group_id: u32,
    pub temporary: bool,
    pub fields: Vec<FieldDef>,
}

impl SpaceDef {
    pub fn new(id: u32, name: &str, fields: Vec<FieldDef>) -> Self {
        Self {
            id,
            name: name.to_string(),
            group_id: GROUP_DEFAULT,
            temporary: false,
            fields,
        }
    }

    pub fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    pub fn with_group(mut self, group_id: u32) -> Self {
        self.group_id = group_id;
        self
    }
}

/// A live space: definition, owning engine, sparse index map, optional
/// in-flight upgrade. The upgrade slot is the only part mutated after
/// registration (the writer thread starts/finishes migrations).
pub struct Space {
    def: SpaceDef,
    engine: Arc<dyn Engine>,
    indexes: Vec<Option<Arc<dyn Index>>>,
    upgrade: RwLock<Option<Arc<SpaceUpgrade>>>,
}

impl Space {
    pub fn new(def: SpaceDef, engine: Arc<dyn Engine>) -> Self {
        Self {
            def,
            engine,
            indexes: Vec::new(),
            upgrade: RwLock::new(None),
        }
    }

    pub fn def(&self) -> &SpaceDef {
        &self.def
    }

    pub fn id(&self) -> u32 {
        self.def.id
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn group_id(&self) -> u32 {
        self.def.group_id
    }

    pub fn is_temporary(&self) -> bool {
        self.def.temporary
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Register an index. Slot is chosen by the index's own id; gaps stay
    /// empty. Fails on id ceiling or occupied slot.
    pub fn add_index(&mut self, index: Arc<dyn Index>) -> Result<()> {
        let id = index.id();
        if id > INDEX_ID_MAX {
            return Err(anyhow!(
                "index id {} of space '{}' exceeds the ceiling {}",
                id,
                self.def.name,
                INDEX_ID_MAX
            ));
        }
        let slot = id as usize;
        if slot >= self.indexes.len() {
            self.indexes.resize_with(slot + 1, || None);
        }
        if self.indexes[slot].is_some() {
            return Err(anyhow!(
                "index id {} already registered in space '{}'",
                id,
                self.def.name
            ));
        }
        self.indexes[slot] = Some(index);
        Ok(())
    }

    /// Max index id currently registered (index map size - 1); 0 for a space
    /// with no indexes, matching an index map of one empty slot.
    pub fn index_id_max(&self) -> u32 {
        (self.indexes.len().max(1) - 1) as u32
    }

    pub fn index(&self, id: u32) -> Option<&Arc<dyn Index>> {
        self.indexes.get(id as usize)?.as_ref()
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Arc<dyn Index>> {
        self.indexes.iter().filter_map(|slot| slot.as_ref())
    }

    /// In-flight migration, if any.
    pub fn upgrade(&self) -> Option<Arc<SpaceUpgrade>> {
        self.upgrade.read().expect("upgrade lock poisoned").clone()
    }

    /// Writer side: start a migration.
    pub fn begin_upgrade(&self, upgrade: Arc<SpaceUpgrade>) {
        *self.upgrade.write().expect("upgrade lock poisoned") = Some(upgrade);
    }

    /// Writer side: finish (or abandon) the migration.
    pub fn finish_upgrade(&self) {
        *self.upgrade.write().expect("upgrade lock poisoned") = None;
    }
}
