//! Read-view creation options.

use std::sync::Arc;

use crate::config::FrostConfig;
use crate::engine::Index;
use crate::space::Space;

/// Space filter: true to include the space. Any state the predicate needs is
/// captured by the closure.
pub type SpaceFilter = Arc<dyn Fn(&Space) -> bool + Send + Sync>;

/// Index filter: true to include the index of the given space.
pub type IndexFilter = Arc<dyn Fn(&Space, &dyn Index) -> bool + Send + Sync>;

/// Options for ReadView::open. Defaults: accept-all filters, all flags off.
#[derive(Clone)]
pub struct ReadViewOptions {
    pub filter_space: SpaceFilter,
    pub filter_index: IndexFilter,
    /// Build a private dictionary-backed tuple format per space so records
    /// can be accessed by field name. Off: every space read view shares the
    /// database's nameless runtime format.
    pub needs_field_names: bool,
    /// Snapshot an in-flight schema migration (if any) so fetched records can
    /// be upgraded on the fly via process_result.
    pub needs_space_upgrade: bool,
    /// Include temporary spaces.
    pub needs_temporary_spaces: bool,
}

impl Default for ReadViewOptions {
    fn default() -> Self {
        Self {
            filter_space: Arc::new(|_| true),
            filter_index: Arc::new(|_, _| true),
            needs_field_names: false,
            needs_space_upgrade: false,
            needs_temporary_spaces: false,
        }
    }
}

impl ReadViewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the boolean flags from configuration; filters stay accept-all.
    pub fn from_config(config: &FrostConfig) -> Self {
        Self {
            needs_field_names: config.needs_field_names,
            needs_space_upgrade: config.needs_space_upgrade,
            needs_temporary_spaces: config.needs_temporary_spaces,
            ..Self::default()
        }
    }

    pub fn with_space_filter(
        mut self,
        filter: impl Fn(&Space) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_space = Arc::new(filter);
        self
    }

    pub fn with_index_filter(
        mut self,
        filter: impl Fn(&Space, &dyn Index) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter_index = Arc::new(filter);
        self
    }
}
