//! Integration tests for the experiment store

use cellbench::cell::CellType;
use cellbench::config::BenchConfig;
use cellbench::experiment::{Experiment, ExperimentStore};
use cellbench::Error;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_four_lfp_cells_within_bounds() {
    let mut rng = rng();
    let experiment = Experiment::builder("LFP bank")
        .primary_cell_type(CellType::Lfp)
        .with_cells(4, &mut rng)
        .build();

    assert_eq!(experiment.cell_count(), 4);
    for (i, cell) in experiment.cells().iter().enumerate() {
        assert_eq!(cell.slot_index(), i + 1);
        assert_eq!(cell.cell_type(), CellType::Lfp);
        assert!((cell.min_voltage() - 2.8).abs() < f64::EPSILON);
        assert!((cell.max_voltage() - 3.4).abs() < f64::EPSILON);
        assert!((25.0..=40.0).contains(&cell.temperature()));
        assert!((1.0..=5.0).contains(&cell.current()));
        assert!((2500.0..=3500.0).contains(&cell.capacity()));
    }
}

// ============================================================================
// Save / load
// ============================================================================

#[test]
fn test_save_twice_last_write_wins() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    let first = Experiment::builder("tmp").with_cells(2, &mut rng).build();
    let second = Experiment::builder("tmp").with_cells(5, &mut rng).build();

    store.save("A", first).unwrap();
    store.save("A", second.clone()).unwrap();

    let loaded = store.load("A").unwrap();
    assert_eq!(loaded.cell_count(), 5);
    assert_eq!(loaded.cells(), second.cells());
    assert_eq!(loaded.name(), "A");
    assert_eq!(store.list_names(), vec!["A"]);
}

#[test]
fn test_load_returns_independent_copy() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    store.save("A", Experiment::builder("A").with_cells(3, &mut rng).build()).unwrap();

    let mut copy = store.load("A").unwrap();
    copy.cell_mut(1).unwrap().set_voltage(0.5).unwrap();

    let saved = store.get("A").unwrap();
    assert!((saved.cell(1).unwrap().voltage() - 0.5).abs() > f64::EPSILON);
}

#[test]
fn test_list_names_keeps_insertion_order() {
    let mut store = ExperimentStore::new();
    for name in ["gamma", "alpha", "beta"] {
        store.save(name, Experiment::new(name)).unwrap();
    }
    store.save("alpha", Experiment::new("alpha")).unwrap();
    assert_eq!(store.list_names(), vec!["gamma", "alpha", "beta"]);
}

#[test]
fn test_load_unknown() {
    let store = ExperimentStore::new();
    assert!(matches!(store.load("ghost"), Err(Error::NotFound(_))));
}

// ============================================================================
// Create / select
// ============================================================================

#[test]
fn test_create_trims_and_rejects_duplicates() {
    let mut store = ExperimentStore::new();
    store.create("  Run 1 ").unwrap();
    assert!(store.contains("Run 1"));
    assert_eq!(store.current(), Some("Run 1"));

    assert!(matches!(store.create("Run 1"), Err(Error::DuplicateName(_))));
    assert!(matches!(store.create("   "), Err(Error::InvalidArgument(_))));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_create_uses_config_metadata() {
    let config = BenchConfig::builder()
        .bench_name("Bench_042")
        .group_name("Group_Z")
        .default_cell_type(CellType::Lfp)
        .build()
        .unwrap();
    let mut store = ExperimentStore::with_config(config);
    let experiment = store.create("Run").unwrap();
    assert_eq!(experiment.bench_name(), Some("Bench_042"));
    assert_eq!(experiment.group_name(), Some("Group_Z"));
    assert_eq!(experiment.primary_cell_type(), CellType::Lfp);
}

#[test]
fn test_select_unknown_keeps_current() {
    let mut store = ExperimentStore::new();
    store.create("A").unwrap();
    assert!(store.select("B").is_err());
    assert_eq!(store.current(), Some("A"));
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_set_cell_count_idempotent() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    store.save("A", Experiment::builder("A").with_cells(4, &mut rng).build()).unwrap();

    store.set_cell_count("A", 10, CellType::Nmc, &mut rng).unwrap();
    let once = store.load("A").unwrap();
    store.set_cell_count("A", 10, CellType::Nmc, &mut rng).unwrap();
    let twice = store.load("A").unwrap();
    assert_eq!(once, twice);
    assert_eq!(twice.cell_count(), 10);
}

#[test]
fn test_set_cell_count_shrink_keeps_prefix() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    let full = Experiment::builder("A").with_cells(6, &mut rng).build();
    store.save("A", full.clone()).unwrap();

    store.set_cell_count("A", 2, CellType::Lfp, &mut rng).unwrap();
    let shrunk = store.load("A").unwrap();
    assert_eq!(shrunk.cells(), &full.cells()[..2]);
}

#[test]
fn test_set_cell_count_bounds_checked_first() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    let err = store
        .set_cell_count("ghost", 0, CellType::Nmc, &mut rng)
        .unwrap_err();
    assert!(matches!(err, Error::CellCountOutOfRange { requested: 0, .. }));
    assert!(matches!(
        store.set_cell_count("ghost", 3, CellType::Nmc, &mut rng),
        Err(Error::NotFound(_))
    ));
}

// ============================================================================
// Compare
// ============================================================================

#[test]
fn test_compare_missing_name_fails_whole_call() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    store.save("X", Experiment::builder("X").with_cells(3, &mut rng).build()).unwrap();

    let err = store.compare(&["X", "Y"]).unwrap_err();
    assert!(matches!(err, Error::NotFound(ref name) if name == "Y"));
}

#[test]
fn test_compare_concatenates_in_given_order() {
    let mut rng = rng();
    let mut store = ExperimentStore::new();
    store.save("X", Experiment::builder("X").with_cells(2, &mut rng).build()).unwrap();
    store.save("Y", Experiment::builder("Y").with_cells(3, &mut rng).build()).unwrap();

    let rows = store.compare(&["Y", "X"]).unwrap();
    assert_eq!(rows.len(), 5);
    let tags: Vec<_> = rows
        .iter()
        .map(|r| (r.experiment.as_deref().unwrap(), r.slot_index))
        .collect();
    assert_eq!(
        tags,
        vec![("Y", 1), ("Y", 2), ("Y", 3), ("X", 1), ("X", 2)]
    );
}
