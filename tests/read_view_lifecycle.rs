// tests/read_view_lifecycle.rs
//
// Run only this file:
//   cargo test --test read_view_lifecycle -- --nocapture
//
// Covers:
// 1) activate/deactivate cycles: the owner marker always returns to None.
// 2) Cross-thread handoff: build in one thread, activate and drain in a
//    worker thread (the first-class usage pattern).
// 3) Frozen index data is isolated from writer mutations after open.

use std::sync::Arc;
use std::thread;

use anyhow::Result;

use frostview::{
    Database, FieldDef, FieldType, MemoryEngine, MemoryIndex, ReadView, ReadViewOptions, Space,
    SpaceDef, Tuple, Value,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn setup() -> Result<(Database, Arc<MemoryEngine>, Arc<MemoryIndex>)> {
    let mut db = Database::new();
    let eng = MemoryEngine::new("memory");
    db.add_engine(eng.clone())?;

    let idx = MemoryIndex::new(0, "primary");
    idx.insert(b"a", Tuple::new(vec![Value::Unsigned(1)]));
    idx.insert(b"b", Tuple::new(vec![Value::Unsigned(2)]));

    let mut space = Space::new(
        SpaceDef::new(1, "events", vec![FieldDef::new("id", FieldType::Unsigned)]),
        eng.clone(),
    );
    space.add_index(idx.clone())?;
    db.add_space(space)?;
    Ok((db, eng, idx))
}

#[test]
fn activate_deactivate_any_number_of_times() -> Result<()> {
    init_logs();
    let (db, _eng, _idx) = setup()?;
    let mut rv = ReadView::open(&db, &ReadViewOptions::default())?;

    assert!(!rv.is_active());
    assert!(rv.owner_thread().is_none());

    for _ in 0..10 {
        rv.activate()?;
        assert!(rv.is_active());
        assert_eq!(rv.owner_thread(), Some(thread::current().id()));
        rv.deactivate();
        assert!(!rv.is_active());
        assert!(rv.owner_thread().is_none());
    }

    rv.close();
    Ok(())
}

#[test]
fn build_in_one_thread_drain_in_another() -> Result<()> {
    init_logs();
    let (db, eng, idx) = setup()?;

    // Coordinator thread builds the snapshot...
    let mut rv = ReadView::open(&db, &ReadViewOptions::default())?;

    // ...writer keeps mutating live data...
    idx.insert(b"c", Tuple::new(vec![Value::Unsigned(3)]));
    idx.remove(b"a");

    // ...worker thread activates and drains it.
    let worker = thread::spawn(move || -> Result<ReadView> {
        rv.activate()?;
        let srv = rv.spaces().next().expect("one space");
        let primary = srv.index(0).expect("primary index");

        // Frozen state: exactly the two records of open time.
        assert_eq!(primary.len(), 2);
        let got = primary.get(b"a").expect("a visible in the read view");
        let processed = srv.process_result(&got)?;
        assert!(Tuple::ptr_eq(&got, &processed));
        assert!(primary.get(b"c").is_none());

        rv.deactivate();
        Ok(rv)
    });
    let rv = worker.join().expect("worker must not panic")?;

    assert!(!rv.is_active());
    rv.close();
    assert_eq!(eng.live_read_views(), 0);

    // Live data kept moving independently.
    assert_eq!(idx.len(), 2);
    assert!(idx.live_read_views() == 0);
    Ok(())
}

#[test]
fn multiple_read_views_are_independent() -> Result<()> {
    init_logs();
    let (db, eng, idx) = setup()?;

    let mut rv1 = ReadView::open(&db, &ReadViewOptions::default())?;
    idx.insert(b"c", Tuple::new(vec![Value::Unsigned(3)]));
    let mut rv2 = ReadView::open(&db, &ReadViewOptions::default())?;

    assert_eq!(eng.live_read_views(), 2);
    assert_eq!(idx.live_read_views(), 2);

    rv1.activate()?;
    rv2.activate()?;
    let n1 = rv1.spaces().next().unwrap().index(0).unwrap().len();
    let n2 = rv2.spaces().next().unwrap().index(0).unwrap().len();
    assert_eq!(n1, 2);
    assert_eq!(n2, 3);
    rv2.deactivate();
    rv1.deactivate();

    rv1.close();
    assert_eq!(eng.live_read_views(), 1);
    rv2.close();
    assert_eq!(eng.live_read_views(), 0);
    Ok(())
}
