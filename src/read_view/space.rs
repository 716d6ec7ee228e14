//! Space read view: one space's slice of a database read view.
//!
//! Built during ReadView::open in three fallible steps (format resolution,
//! upgrade resolution, index map), torn down by Drop. Structurally immutable
//! after construction.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::owner::OwnerCell;
use super::ReadViewOptions;
use crate::metrics::{
    record_index_read_view, record_space_read_view, record_upgrade_apply,
    record_upgrade_apply_failure,
};
use crate::space::{Space, SpaceUpgradeReadView};
use crate::tuple::{Tuple, TupleDictionary, TupleFormat};

/// Index read view plus its back-reference to the owning space read view
/// (space id + the aggregate's owner cell). Engine code reaches frozen data
/// through this handle, so the thread-affinity contract is checked in debug
/// builds on every access.
pub struct IndexReadViewHandle {
    view: Box<dyn crate::engine::IndexReadView>,
    space_id: u32,
    owner: Arc<OwnerCell>,
}

impl IndexReadViewHandle {
    /// Space this index read view belongs to.
    pub fn space_id(&self) -> u32 {
        self.space_id
    }

    /// Debug-build contract check: the calling thread must be the one that
    /// activated the owning read view. Compiled out in release builds.
    #[inline]
    pub fn check_owner(&self) {
        debug_assert!(
            self.owner.is_held_by_current(),
            "index read view of space {} used outside the owning thread",
            self.space_id
        );
    }

    pub fn get(&self, key: &[u8]) -> Option<Tuple> {
        self.check_owner();
        self.view.get(key)
    }

    pub fn tuples(&self) -> Vec<Tuple> {
        self.check_owner();
        self.view.tuples()
    }

    pub fn len(&self) -> usize {
        self.check_owner();
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read view of one space: format reference, optional upgrade transform and a
/// sparse array of index read views indexed by index id.
pub struct SpaceReadView {
    id: u32,
    name: String,
    group_id: u32,
    format: Arc<TupleFormat>,
    upgrade: Option<SpaceUpgradeReadView>,
    index_id_max: u32,
    index_map: Vec<Option<IndexReadViewHandle>>,
    owner: Arc<OwnerCell>,
}

impl SpaceReadView {
    /// Build a read view of one space. Any fallible step aborts the whole
    /// build; partially created index read views are released by Drop.
    pub(crate) fn build(
        space: &Arc<Space>,
        opts: &ReadViewOptions,
        runtime_format: &Arc<TupleFormat>,
        owner: Arc<OwnerCell>,
    ) -> Result<Self> {
        // Step 1: format resolution. A private dictionary copy is mandatory
        // when field names are requested: the live definition may be altered
        // after this read view is taken.
        let format = if opts.needs_field_names {
            let dict = Arc::new(
                TupleDictionary::new(&space.def().fields)
                    .with_context(|| format!("build dictionary for space '{}'", space.name()))?,
            );
            // The intermediate dictionary reference is dropped with `dict`;
            // the format keeps its own.
            Arc::new(TupleFormat::with_dictionary(dict))
        } else {
            runtime_format.clone()
        };

        // Step 2: upgrade resolution. Snapshotting an in-flight migration
        // always succeeds once the precondition holds.
        let upgrade = if opts.needs_space_upgrade {
            space.upgrade().map(|up| SpaceUpgradeReadView::new(&up))
        } else {
            None
        };

        // Step 3: index map, sized by the space's current max index id.
        let index_id_max = space.index_id_max();
        let mut index_map: Vec<Option<IndexReadViewHandle>> =
            Vec::with_capacity(index_id_max as usize + 1);
        index_map.resize_with(index_id_max as usize + 1, || None);
        for id in 0..=index_id_max {
            let index = match space.index(id) {
                Some(index) => index,
                None => continue,
            };
            if !(opts.filter_index)(space, index.as_ref()) {
                continue;
            }
            let view = index.create_read_view().with_context(|| {
                format!(
                    "create read view of index '{}' (id {}) of space '{}'",
                    index.name(),
                    id,
                    space.name()
                )
            })?;
            index_map[id as usize] = Some(IndexReadViewHandle {
                view,
                space_id: space.id(),
                owner: owner.clone(),
            });
            record_index_read_view();
        }

        record_space_read_view();
        Ok(Self {
            id: space.id(),
            name: space.name().to_string(),
            group_id: space.group_id(),
            format,
            upgrade,
            index_id_max,
            index_map,
            owner,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    pub fn format(&self) -> &Arc<TupleFormat> {
        &self.format
    }

    /// True if both space read views hold the very same format instance
    /// (nameless shared format; private formats never compare equal).
    pub fn shares_format_with(&self, other: &SpaceReadView) -> bool {
        Arc::ptr_eq(&self.format, &other.format)
    }

    pub fn has_upgrade(&self) -> bool {
        self.upgrade.is_some()
    }

    pub fn index_id_max(&self) -> u32 {
        self.index_id_max
    }

    /// Index read view by id: None beyond index_id_max and for slots left
    /// empty (absent or filtered-out indexes).
    pub fn index(&self, id: u32) -> Option<&IndexReadViewHandle> {
        if id > self.index_id_max {
            return None;
        }
        self.index_map[id as usize].as_ref()
    }

    pub fn indexes(&self) -> impl Iterator<Item = &IndexReadViewHandle> {
        self.index_map.iter().filter_map(|slot| slot.as_ref())
    }

    /// Prepare a record fetched from this read view for the consumer: apply
    /// the snapshotted upgrade transform if there is one, otherwise hand the
    /// record back unchanged (same identity). The input is never mutated.
    ///
    /// May only be called by the thread that activated the read view.
    pub fn process_result(&self, tuple: &Tuple) -> Result<Tuple> {
        debug_assert!(
            self.owner.is_held_by_current(),
            "process_result on space {} outside the owning thread",
            self.id
        );
        match &self.upgrade {
            Some(upgrade) => {
                record_upgrade_apply();
                upgrade.apply(tuple).map_err(|e| {
                    record_upgrade_apply_failure();
                    e
                })
            }
            None => Ok(tuple.clone()),
        }
    }

    pub(crate) fn upgrade_mut(&mut self) -> Option<&mut SpaceUpgradeReadView> {
        self.upgrade.as_mut()
    }
}

impl Drop for SpaceReadView {
    fn drop(&mut self) {
        for slot in &self.index_map {
            if let Some(handle) = slot {
                debug_assert!(handle.space_id() == self.id);
            }
        }
        debug_assert!(self.upgrade.as_ref().map_or(true, |up| !up.is_active()));
    }
}
