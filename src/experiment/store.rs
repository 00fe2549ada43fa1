//! Experiment Store - in-memory mapping from experiment name to experiment
//!
//! Lives for the process (or session) lifetime only. There is no delete:
//! saving over an existing name silently replaces it.

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use super::Experiment;
use crate::cell::CellType;
use crate::config::BenchConfig;
use crate::export::CellRow;
use crate::{Error, Result};

/// In-memory store of named experiments.
///
/// ## Design
///
/// Experiments live in a hash map keyed by name for O(1) lookups; a separate
/// name vector remembers first-insertion order for listing. One experiment is
/// the current selection at a time.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    config: BenchConfig,
    experiments: FxHashMap<String, Experiment>,
    order: Vec<String>,
    current: Option<String>,
}

impl ExperimentStore {
    /// Create a new empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty store bounded by `config`.
    #[must_use]
    pub fn with_config(config: BenchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration the store enforces.
    #[must_use]
    pub const fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Number of experiments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Check if the store holds no experiments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Check if an experiment exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.experiments.contains_key(name)
    }

    /// Insert or overwrite an experiment under `name`.
    ///
    /// Last write wins; the stored copy is renamed to `name`. A fresh name is
    /// appended to the listing order, an existing one keeps its position.
    ///
    /// # Errors
    ///
    /// Returns `CellCountOutOfRange` if a non-empty experiment has a slot
    /// count outside the configured bounds; the store is left unchanged.
    pub fn save(&mut self, name: &str, mut experiment: Experiment) -> Result<()> {
        if !experiment.is_empty() {
            self.config
                .check_cell_count(experiment.cell_count())
                .map_err(|e| {
                    warn!(experiment = name, error = %e, "refusing to save experiment");
                    e
                })?;
        }
        experiment.rename(name);
        if self.experiments.insert(name.to_string(), experiment).is_some() {
            debug!(experiment = name, "overwrote saved experiment");
        } else {
            self.order.push(name.to_string());
            info!(experiment = name, "saved new experiment");
        }
        Ok(())
    }

    /// Create an empty experiment and select it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank name and `DuplicateName` if the
    /// name is taken.
    pub fn create(&mut self, name: &str) -> Result<&mut Experiment> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "experiment name must not be empty".to_string(),
            ));
        }
        if self.contains(name) {
            warn!(experiment = name, "refusing to create duplicate experiment");
            return Err(Error::DuplicateName(name.to_string()));
        }
        let experiment = Experiment::builder(name)
            .bench_name(self.config.bench_name.clone())
            .group_name(self.config.group_name.clone())
            .primary_cell_type(self.config.default_cell_type)
            .build();
        self.save(name, experiment)?;
        self.current = Some(name.to_string());
        self.experiments
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Return a deep copy of a saved experiment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no experiment has that name.
    pub fn load(&self, name: &str) -> Result<Experiment> {
        self.get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Borrow a saved experiment.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Experiment> {
        self.experiments.get(name)
    }

    /// Mutably borrow a saved experiment.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Experiment> {
        self.experiments.get_mut(name)
    }

    /// Experiment names in first-insertion order.
    #[must_use]
    pub fn list_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Make `name` the current experiment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no experiment has that name.
    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(Error::NotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        debug!(experiment = name, "selected experiment");
        Ok(())
    }

    /// Name of the current experiment, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current experiment, if any.
    #[must_use]
    pub fn current_experiment(&self) -> Option<&Experiment> {
        self.current.as_deref().and_then(|name| self.get(name))
    }

    /// Resize a saved experiment to `n` slots.
    ///
    /// New slots get defaults for `cell_type`; retained slots are untouched.
    ///
    /// # Errors
    ///
    /// Returns `CellCountOutOfRange` if `n` violates the configured bounds and
    /// `NotFound` if the experiment does not exist. The store is unchanged on
    /// error.
    pub fn set_cell_count<R: Rng + ?Sized>(
        &mut self,
        name: &str,
        n: usize,
        cell_type: CellType,
        rng: &mut R,
    ) -> Result<()> {
        let n = self.config.check_cell_count(n)?;
        let experiment = self
            .experiments
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        experiment.resize(n, cell_type, rng);
        debug!(experiment = name, cells = n, "resized experiment");
        Ok(())
    }

    /// Flat rows of several experiments, tagged by name and concatenated in
    /// the order the names were given.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for the first unknown name; no rows are returned in
    /// that case.
    pub fn compare(&self, names: &[&str]) -> Result<Vec<CellRow>> {
        let experiments = names
            .iter()
            .map(|name| self.get(name).ok_or_else(|| Error::NotFound((*name).to_string())))
            .collect::<Result<Vec<&Experiment>>>()?;

        Ok(experiments
            .into_iter()
            .flat_map(|exp| {
                exp.cells()
                    .iter()
                    .map(move |cell| CellRow::from_record(cell, Some(exp.name())))
            })
            .collect())
    }
}
