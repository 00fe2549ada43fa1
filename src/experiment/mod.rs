//! Experiments and the in-memory experiment store
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentStore (1) ──< Experiment (N) ──< CellRecord (slots 1..=n)
//! ```
//!
//! The store exclusively owns its experiments; an experiment exclusively owns
//! its cells. `load` hands out deep copies, so edits to a loaded copy never
//! reach the store until it is saved again.
//!
//! ## Usage
//!
//! ```rust
//! use cellbench::cell::CellType;
//! use cellbench::experiment::{Experiment, ExperimentStore};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut store = ExperimentStore::new();
//!
//! let exp = Experiment::builder("Run 1")
//!     .primary_cell_type(CellType::Lfp)
//!     .with_cells(4, &mut rng)
//!     .build();
//! store.save("Run 1", exp)?;
//!
//! let loaded = store.load("Run 1")?;
//! assert_eq!(loaded.cell_count(), 4);
//! # Ok::<(), cellbench::Error>(())
//! ```

mod experiment_record;
mod store;

pub use experiment_record::{Experiment, ExperimentBuilder};
pub use store::ExperimentStore;
