//! Experiment - a named bank of cell slots plus bench metadata

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cell::{CellRecord, CellType};
use crate::generator::{defaults_for, preset_for, random_cell_type, TestMode};
use crate::{Error, Result};

/// Experiment represents one configured test run of the cell bank.
///
/// Cells are kept ordered by slot index, and slot `i` always lives at
/// position `i - 1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experiment {
    name: String,
    bench_name: Option<String>,
    group_name: Option<String>,
    primary_cell_type: CellType,
    created_at: DateTime<Utc>,
    cells: Vec<CellRecord>,
}

impl Experiment {
    /// Create an empty experiment with the current timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    /// Create a builder for an experiment with metadata.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ExperimentBuilder {
        ExperimentBuilder::new(name)
    }

    /// Experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    /// Bench the experiment ran on, if recorded.
    #[must_use]
    pub fn bench_name(&self) -> Option<&str> {
        self.bench_name.as_deref()
    }

    /// Group the experiment belongs to, if recorded.
    #[must_use]
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    /// Record bench and group names.
    pub fn set_metadata(&mut self, bench_name: impl Into<String>, group_name: impl Into<String>) {
        self.bench_name = Some(bench_name.into());
        self.group_name = Some(group_name.into());
    }

    /// Chemistry used for newly created slots.
    #[must_use]
    pub const fn primary_cell_type(&self) -> CellType {
        self.primary_cell_type
    }

    /// Change the chemistry used for newly created slots. Existing slots keep
    /// their own type.
    pub fn set_primary_cell_type(&mut self, cell_type: CellType) {
        self.primary_cell_type = cell_type;
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// All cells, ordered by slot.
    #[must_use]
    pub fn cells(&self) -> &[CellRecord] {
        &self.cells
    }

    /// Number of slots.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// True if the bank has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at a 1-based slot.
    #[must_use]
    pub fn cell(&self, slot_index: usize) -> Option<&CellRecord> {
        slot_index
            .checked_sub(1)
            .and_then(|i| self.cells.get(i))
    }

    /// Mutable cell at a 1-based slot.
    ///
    /// # Errors
    ///
    /// Returns `SlotNotFound` if the experiment has no such slot.
    pub fn cell_mut(&mut self, slot_index: usize) -> Result<&mut CellRecord> {
        slot_index
            .checked_sub(1)
            .and_then(|i| self.cells.get_mut(i))
            .ok_or(Error::SlotNotFound(slot_index))
    }

    /// Grow or shrink the bank to `n` slots.
    ///
    /// New slots get randomized defaults for `cell_type`; slots above `n` are
    /// dropped. Retained slots are left exactly as they were, so calling this
    /// twice with the same `n` is the same as calling it once.
    pub fn resize<R: Rng + ?Sized>(&mut self, n: usize, cell_type: CellType, rng: &mut R) {
        if n < self.cells.len() {
            self.cells.truncate(n);
            return;
        }
        for slot in self.cells.len() + 1..=n {
            self.cells
                .push(CellRecord::from_defaults(slot, &defaults_for(cell_type, rng)));
        }
    }

    /// Give every slot a random chemistry and fresh defaults for it.
    pub fn randomize_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            let cell_type = random_cell_type(rng);
            cell.apply_defaults(&defaults_for(cell_type, rng));
        }
    }

    /// Overwrite every slot with the scenario values for its own chemistry.
    pub fn apply_preset(&mut self, mode: TestMode) {
        for cell in &mut self.cells {
            cell.apply_defaults(&preset_for(mode, cell.cell_type()));
        }
    }

    /// Serialize to a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input or a cell with an out-of-domain
    /// measurement, and `InvalidArgument` if the slots are not numbered
    /// `1..=n` in order. Each cell's band is re-derived from its type.
    pub fn from_json(json: &str) -> Result<Self> {
        let experiment: Self = serde_json::from_str(json)?;
        for (i, cell) in experiment.cells.iter().enumerate() {
            if cell.slot_index() != i + 1 {
                return Err(Error::InvalidArgument(format!(
                    "slot {} found at position {}",
                    cell.slot_index(),
                    i + 1
                )));
            }
        }
        Ok(experiment)
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    name: String,
    bench_name: Option<String>,
    group_name: Option<String>,
    primary_cell_type: CellType,
    created_at: DateTime<Utc>,
    cells: Vec<CellRecord>,
}

impl ExperimentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bench_name: None,
            group_name: None,
            primary_cell_type: CellType::default(),
            created_at: Utc::now(),
            cells: Vec::new(),
        }
    }

    /// Set the bench name.
    #[must_use]
    pub fn bench_name(mut self, name: impl Into<String>) -> Self {
        self.bench_name = Some(name.into());
        self
    }

    /// Set the group name.
    #[must_use]
    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    /// Set the primary chemistry.
    #[must_use]
    pub const fn primary_cell_type(mut self, cell_type: CellType) -> Self {
        self.primary_cell_type = cell_type;
        self
    }

    /// Set a custom creation timestamp (useful for deserialization/testing).
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Fill the bank with `n` slots of the primary chemistry.
    #[must_use]
    pub fn with_cells<R: Rng + ?Sized>(mut self, n: usize, rng: &mut R) -> Self {
        self.cells = (1..=n)
            .map(|slot| {
                CellRecord::from_defaults(slot, &defaults_for(self.primary_cell_type, &mut *rng))
            })
            .collect();
        self
    }

    /// Build the `Experiment`.
    #[must_use]
    pub fn build(self) -> Experiment {
        Experiment {
            name: self.name,
            bench_name: self.bench_name,
            group_name: self.group_name,
            primary_cell_type: self.primary_cell_type,
            created_at: self.created_at,
            cells: self.cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_experiment_new_is_empty() {
        let exp = Experiment::new("exp-1");
        assert_eq!(exp.name(), "exp-1");
        assert!(exp.is_empty());
        assert!(exp.bench_name().is_none());
    }

    #[test]
    fn test_resize_grow_and_shrink() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut exp = Experiment::new("e");
        exp.resize(6, CellType::Lfp, &mut rng);
        assert_eq!(exp.cell_count(), 6);
        let kept: Vec<CellRecord> = exp.cells()[..3].to_vec();

        exp.resize(3, CellType::Nmc, &mut rng);
        assert_eq!(exp.cells(), kept.as_slice());

        exp.resize(5, CellType::Nmc, &mut rng);
        assert_eq!(&exp.cells()[..3], kept.as_slice());
        assert_eq!(exp.cell(5).unwrap().cell_type(), CellType::Nmc);
        assert_eq!(exp.cell(5).unwrap().slot_index(), 5);
    }

    #[test]
    fn test_cell_lookup_is_one_based() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut exp = Experiment::builder("e").with_cells(2, &mut rng).build();
        assert!(exp.cell(0).is_none());
        assert_eq!(exp.cell(1).unwrap().slot_index(), 1);
        assert!(matches!(exp.cell_mut(3), Err(Error::SlotNotFound(3))));
    }

    #[test]
    fn test_apply_preset_per_type() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut exp = Experiment::builder("e")
            .primary_cell_type(CellType::Lfp)
            .with_cells(2, &mut rng)
            .build();
        exp.cell_mut(2).unwrap().set_cell_type(CellType::Nmc);
        exp.apply_preset(TestMode::Discharging);
        assert!((exp.cell(1).unwrap().voltage() - 3.0).abs() < f64::EPSILON);
        assert!((exp.cell(2).unwrap().voltage() - 3.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_snapshot() {
        let mut rng = StdRng::seed_from_u64(11);
        let exp = Experiment::builder("snap")
            .bench_name("Bench_009")
            .with_cells(3, &mut rng)
            .build();
        let restored = Experiment::from_json(&exp.to_json().unwrap()).unwrap();
        assert_eq!(exp, restored);
    }

    fn tampered_snapshot(edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut rng = StdRng::seed_from_u64(11);
        let exp = Experiment::builder("snap")
            .primary_cell_type(CellType::Nmc)
            .with_cells(2, &mut rng)
            .build();
        let mut value: serde_json::Value = serde_json::from_str(&exp.to_json().unwrap()).unwrap();
        edit(&mut value["cells"][0]);
        value.to_string()
    }

    #[test]
    fn test_json_snapshot_band_is_rederived() {
        let json = tampered_snapshot(|cell| {
            cell["min_voltage"] = 9.0.into();
            cell["max_voltage"] = 1.0.into();
        });
        let restored = Experiment::from_json(&json).unwrap();
        let cell = restored.cell(1).unwrap();
        assert!((cell.min_voltage() - 3.2).abs() < f64::EPSILON);
        assert!((cell.max_voltage() - 4.0).abs() < f64::EPSILON);
        assert!(!cell.is_out_of_range());
    }

    #[test]
    fn test_json_snapshot_rejects_out_of_domain() {
        let json = tampered_snapshot(|cell| cell["temperature"] = 500.0.into());
        assert!(matches!(Experiment::from_json(&json), Err(Error::Json(_))));
    }

    #[test]
    fn test_json_snapshot_rejects_misnumbered_slots() {
        let json = tampered_snapshot(|cell| cell["slot_index"] = 2.into());
        assert!(matches!(
            Experiment::from_json(&json),
            Err(Error::InvalidArgument(_))
        ));
    }
}
