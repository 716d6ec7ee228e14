//! In-flight schema upgrades and their read-view snapshots.
//!
//! A live migration (SpaceUpgrade) owns a TupleTransform. A read view opened
//! mid-migration snapshots the transform into a SpaceUpgradeReadView, which is
//! activated/deactivated together with the read view and applied lazily to
//! fetched records.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::tuple::{Tuple, Value};

/// Record transform of a schema migration.
///
/// activate() is called when the owning read view is bound to its worker
/// thread (e.g. to pin thread-local resources); deactivate() undoes it.
/// apply() must not mutate the input record.
pub trait TupleTransform: Send + Sync {
    fn activate(&self) -> Result<()> {
        Ok(())
    }

    fn deactivate(&self) {}

    fn apply(&self, tuple: &Tuple) -> Result<Tuple>;
}

/// Live in-flight migration of a space.
pub struct SpaceUpgrade {
    transform: Arc<dyn TupleTransform>,
}

impl SpaceUpgrade {
    pub fn new(transform: Arc<dyn TupleTransform>) -> Self {
        Self { transform }
    }
}

/// Snapshot of a migration taken at read-view open time.
///
/// Taking the snapshot always succeeds once the precondition (migration in
/// flight) holds; only activation may fail.
pub struct SpaceUpgradeReadView {
    transform: Arc<dyn TupleTransform>,
    active: bool,
}

impl SpaceUpgradeReadView {
    pub(crate) fn new(upgrade: &SpaceUpgrade) -> Self {
        Self {
            transform: upgrade.transform.clone(),
            active: false,
        }
    }

    pub(crate) fn activate(&mut self) -> Result<()> {
        debug_assert!(!self.active);
        self.transform
            .activate()
            .context("activate space upgrade read view")?;
        self.active = true;
        Ok(())
    }

    pub(crate) fn deactivate(&mut self) {
        debug_assert!(self.active);
        self.transform.deactivate();
        self.active = false;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Apply the snapshotted transform. The input record stays valid and
    /// unmodified; the result is a new record.
    pub fn apply(&self, tuple: &Tuple) -> Result<Tuple> {
        self.transform
            .apply(tuple)
            .context("apply space upgrade transform")
    }
}

/// "Add columns with a default" migration: pads every record to at least
/// min_fields fields with a fill value.
pub struct FillNewFields {
    min_fields: u32,
    fill: Value,
}

impl FillNewFields {
    pub fn new(min_fields: u32, fill: Value) -> Self {
        Self { min_fields, fill }
    }
}

impl TupleTransform for FillNewFields {
    fn apply(&self, tuple: &Tuple) -> Result<Tuple> {
        let mut fields = tuple.fields().to_vec();
        while (fields.len() as u32) < self.min_fields {
            fields.push(self.fill.clone());
        }
        Ok(Tuple::new(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_new_fields_pads_short_records() {
        let t = Tuple::new(vec![Value::Unsigned(1)]);
        let tr = FillNewFields::new(3, Value::Null);
        let out = tr.apply(&t).expect("must apply");
        assert_eq!(out.field_count(), 3);
        assert_eq!(out.field(0), Some(&Value::Unsigned(1)));
        assert_eq!(out.field(2), Some(&Value::Null));
        // original untouched
        assert_eq!(t.field_count(), 1);
    }

    #[test]
    fn fill_new_fields_keeps_long_records() {
        let t = Tuple::new(vec![Value::Unsigned(1), Value::Unsigned(2)]);
        let tr = FillNewFields::new(1, Value::Null);
        let out = tr.apply(&t).expect("must apply");
        assert_eq!(out.field_count(), 2);
    }
}
