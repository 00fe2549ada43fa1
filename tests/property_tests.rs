//! Property-based tests for cellbench
//!
//! - Test curve and generator invariants over random inputs
//! - Run with ProptestConfig::with_cases(100)

use cellbench::cell::{CellRecord, CellType};
use cellbench::curve::{charge_curve, discharge_curve, SAMPLE_COUNT};
use cellbench::experiment::Experiment;
use cellbench::generator::{capacity_range, defaults_for};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

fn arb_cell_type() -> impl Strategy<Value = CellType> {
    prop_oneof![Just(CellType::Lfp), Just(CellType::Nmc)]
}

/// (low, high) voltage pair with low <= high
fn arb_voltage_span() -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..5.0, 0.0f64..5.0).prop_map(|(a, b)| (a.min(b), a.max(b)))
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Curve Properties
    // ========================================================================

    /// Property: charge voltages stay within [v_start, v_max]
    #[test]
    fn prop_charge_within_bounds(
        (lo, hi) in arb_voltage_span(),
        capacity in 0.0f64..20_000.0,
        current in 0.01f64..20.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let curve = charge_curve(lo, hi, capacity, current, &mut rng).unwrap();
        prop_assert_eq!(curve.len(), SAMPLE_COUNT);
        for p in curve.points() {
            prop_assert!(p.voltage >= lo && p.voltage <= hi);
        }
    }

    /// Property: discharge voltages stay within [v_min, v_max]
    #[test]
    fn prop_discharge_within_bounds(
        (lo, hi) in arb_voltage_span(),
        capacity in 0.0f64..20_000.0,
        current in 0.01f64..20.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let curve = discharge_curve(hi, lo, capacity, current, &mut rng).unwrap();
        for p in curve.points() {
            prop_assert!(p.voltage >= lo && p.voltage <= hi);
        }
    }

    /// Property: positive capacity gives strictly increasing time ending at t_end
    #[test]
    fn prop_time_strictly_increasing(
        capacity in 1.0f64..20_000.0,
        current in 0.01f64..20.0,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let curve = charge_curve(3.0, 3.4, capacity, current, &mut rng).unwrap();
        let points = curve.points();
        prop_assert!(points[0].time_hours.abs() < f64::EPSILON);
        for w in points.windows(2) {
            prop_assert!(w[1].time_hours > w[0].time_hours);
        }
        let t_end = capacity / (current * 1000.0);
        prop_assert!((curve.duration_hours() - t_end).abs() <= t_end * 1e-12);
    }

    // ========================================================================
    // Generator Properties
    // ========================================================================

    /// Property: generated defaults stay inside their ranges
    #[test]
    fn prop_defaults_in_range(cell_type in arb_cell_type(), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let d = defaults_for(cell_type, &mut rng);
        let (c_lo, c_hi) = capacity_range(cell_type);
        prop_assert!((25.0..=40.0).contains(&d.temperature));
        prop_assert!((1.0..=5.0).contains(&d.current));
        prop_assert!((c_lo..=c_hi).contains(&d.capacity));
        prop_assert_eq!(d.capacity.fract(), 0.0);
        prop_assert!(cell_type.voltage_band().contains(d.voltage));
    }

    // ========================================================================
    // Range Check Properties
    // ========================================================================

    /// Property: the band bounds are in range, just past them is not
    #[test]
    fn prop_out_of_range_is_strict(cell_type in arb_cell_type()) {
        let band = cell_type.voltage_band();
        let at = |v: f64| CellRecord::builder(1, cell_type).voltage(v).build().unwrap();
        prop_assert!(!at(band.max).is_out_of_range());
        prop_assert!(!at(band.min).is_out_of_range());
        prop_assert!(at(band.max + 0.01).is_out_of_range());
        prop_assert!(at(band.min - 0.01).is_out_of_range());
    }

    // ========================================================================
    // Experiment Properties
    // ========================================================================

    /// Property: resizing to n twice equals resizing once
    #[test]
    fn prop_resize_idempotent(
        start in 1usize..=24,
        n in 1usize..=24,
        cell_type in arb_cell_type(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut experiment = Experiment::builder("p").with_cells(start, &mut rng).build();
        experiment.resize(n, cell_type, &mut rng);
        let once = experiment.clone();
        experiment.resize(n, cell_type, &mut rng);
        prop_assert_eq!(&experiment, &once);
        prop_assert_eq!(experiment.cell_count(), n);
        for (i, cell) in experiment.cells().iter().enumerate() {
            prop_assert_eq!(cell.slot_index(), i + 1);
        }
    }
}
