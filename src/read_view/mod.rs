//! read_view — consistent point-in-time view of the whole database.
//!
//! Submodules:
//! - options.rs: ReadViewOptions (filters + feature flags).
//! - space.rs: SpaceReadView + IndexReadViewHandle (per-space slice).
//! - owner.rs: OwnerCell (owning-thread marker shared with child handles).
//!
//! Lifecycle: open -> activate -> (use) -> deactivate -> close. Opening walks
//! every engine that can snapshot itself, then every eligible space, and is
//! all-or-nothing: the first failed sub-creation rolls back everything built
//! so far. Activation binds the aggregate to the calling thread; the intended
//! pattern is to build in one thread and activate in the worker that drains
//! the view.

mod options;
mod owner;
mod space;

pub use options::{IndexFilter, ReadViewOptions, SpaceFilter};
pub use space::{IndexReadViewHandle, SpaceReadView};

use std::thread::ThreadId;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::db::Database;
use crate::engine::EngineReadView;
use crate::metrics::{
    record_read_view_activation, record_read_view_activation_failure, record_read_view_closed,
    record_read_view_deactivation, record_read_view_open_failure, record_read_view_opened,
};
use owner::OwnerCell;
use std::sync::Arc;

/// Read view of the entire database: engine read views plus space read views,
/// both in creation order, and the owning-thread marker.
pub struct ReadView {
    engines: Vec<Box<dyn EngineReadView>>,
    spaces: Vec<SpaceReadView>,
    owner: Arc<OwnerCell>,
}

impl std::fmt::Debug for ReadView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadView")
            .field("engines", &self.engines.len())
            .field("spaces", &self.spaces.len())
            .finish_non_exhaustive()
    }
}

impl ReadView {
    /// Open a database read view. Engines that don't support read views are
    /// silently skipped, together with their spaces. A space is included iff
    /// its engine can snapshot itself, it is not temporary (unless
    /// needs_temporary_spaces), and the space filter accepts it.
    ///
    /// On error nothing stays allocated: every engine/space/index read view
    /// built so far is torn down before the error is returned.
    pub fn open(db: &Database, opts: &ReadViewOptions) -> Result<ReadView> {
        match Self::open_inner(db, opts) {
            Ok(rv) => {
                record_read_view_opened();
                debug!(
                    "read view opened: {} engine rv, {} space rv",
                    rv.engines.len(),
                    rv.spaces.len()
                );
                Ok(rv)
            }
            Err(e) => {
                record_read_view_open_failure();
                warn!("read view open failed: {e:#}");
                Err(e)
            }
        }
    }

    fn open_inner(db: &Database, opts: &ReadViewOptions) -> Result<ReadView> {
        let owner = Arc::new(OwnerCell::new());

        // Engine pass: all engine read views are created before any space is
        // visited. A factory failure drops the partial vector, releasing
        // everything built so far.
        let mut engines: Vec<Box<dyn EngineReadView>> = Vec::new();
        for engine in db.engines() {
            if !engine.supports_read_view() {
                continue;
            }
            let engine_rv = engine
                .create_read_view(opts)
                .with_context(|| format!("create read view of engine '{}'", engine.name()))?;
            engines.push(engine_rv);
        }

        // Space pass, in space-id order. Eligibility checks in this exact
        // order: engine capability, temporary flag, space filter.
        let mut spaces: Vec<SpaceReadView> = Vec::new();
        db.foreach_space(&mut |space| {
            if !space.engine().supports_read_view() {
                return Ok(());
            }
            if space.is_temporary() && !opts.needs_temporary_spaces {
                return Ok(());
            }
            if !(opts.filter_space)(space) {
                return Ok(());
            }
            let space_rv =
                SpaceReadView::build(space, opts, db.runtime_format(), owner.clone())
                    .with_context(|| format!("build read view of space '{}'", space.name()))?;
            spaces.push(space_rv);
            Ok(())
        })?;

        Ok(ReadView {
            engines,
            spaces,
            owner,
        })
    }

    /// Close the read view. The view must not be active. Space read views are
    /// torn down first, then engine read views (Drop does the same).
    pub fn close(self) {
        // Teardown happens in Drop; consuming self makes CLOSED terminal.
    }

    /// Bind the read view to the calling thread and activate every space's
    /// upgrade transform, in creation order. On failure the already-activated
    /// prefix is deactivated and the view returns to its inactive state.
    pub fn activate(&mut self) -> Result<()> {
        debug_assert!(self.owner.owner().is_none());
        self.owner.set_current();
        for i in 0..self.spaces.len() {
            let res = match self.spaces[i].upgrade_mut() {
                Some(upgrade) => upgrade.activate(),
                None => Ok(()),
            };
            if let Err(e) = res {
                for j in (0..i).rev() {
                    if let Some(upgrade) = self.spaces[j].upgrade_mut() {
                        upgrade.deactivate();
                    }
                }
                self.owner.clear();
                record_read_view_activation_failure();
                warn!("read view activation failed: {e:#}");
                return Err(e);
            }
        }
        record_read_view_activation();
        debug!("read view activated");
        Ok(())
    }

    /// Deactivate every space's upgrade transform and release the view from
    /// the calling thread. Only the owner may deactivate.
    pub fn deactivate(&mut self) {
        debug_assert!(self.owner.is_held_by_current());
        for space_rv in &mut self.spaces {
            if let Some(upgrade) = space_rv.upgrade_mut() {
                upgrade.deactivate();
            }
        }
        self.owner.clear();
        record_read_view_deactivation();
        debug!("read view deactivated");
    }

    /// True between a successful activate and its matching deactivate.
    pub fn is_active(&self) -> bool {
        self.owner.owner().is_some()
    }

    /// Thread that activated the view, if any.
    pub fn owner_thread(&self) -> Option<ThreadId> {
        self.owner.owner()
    }

    /// Space read views in creation order. Lazy, finite, restartable.
    pub fn spaces(&self) -> impl Iterator<Item = &SpaceReadView> {
        self.spaces.iter()
    }

    pub fn space_by_id(&self, id: u32) -> Option<&SpaceReadView> {
        self.spaces.iter().find(|s| s.id() == id)
    }

    pub fn space_count(&self) -> usize {
        self.spaces.len()
    }

    pub fn engine_count(&self) -> usize {
        self.engines.len()
    }
}

impl Drop for ReadView {
    fn drop(&mut self) {
        debug_assert!(
            self.owner.owner().is_none(),
            "read view closed while still active"
        );
        // Spaces before engines: index read views may reference engine state.
        self.spaces.clear();
        self.engines.clear();
        record_read_view_closed();
    }
}
