//! # cellbench: Battery Cell Test Bench Core
//!
//! **Version**: 0.1.0
//!
//! cellbench models a bank of lithium cells (LFP and NMC) on a test bench,
//! fills them with plausible randomized or preset measurements, simulates
//! noisy charge/discharge voltage curves, keeps named experiments in memory
//! and exports them as CSV.
//!
//! ## Layout
//!
//! - [`cell`]: cell records, chemistries and their voltage bands
//! - [`generator`]: randomized defaults and test-mode presets
//! - [`curve`]: sigmoid charge/discharge curve simulator
//! - [`experiment`]: experiments and the in-memory experiment store
//! - [`summary`]: min/max/mean insights and out-of-range detection
//! - [`export`]: CSV export/import and Arrow record batches
//! - [`dashboard`]: headless controller for the interactive surface
//! - [`session`]: per-user store isolation
//!
//! ## Example Usage
//!
//! ```rust
//! use cellbench::config::BenchConfig;
//! use cellbench::dashboard::Dashboard;
//! use cellbench::generator::TestMode;
//!
//! let mut dashboard = Dashboard::seeded(BenchConfig::default(), 42)?;
//! dashboard.set_cell_count(4)?;
//! dashboard.apply_preset(TestMode::Charging);
//!
//! let csv = dashboard.export_csv()?;
//! assert_eq!(csv.lines().count(), 5);
//! assert!(dashboard.summary()?.all_within_range());
//! # Ok::<(), cellbench::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cell;
pub mod config;
pub mod curve;
pub mod dashboard;
pub mod error;
pub mod experiment;
pub mod export;
pub mod generator;
pub mod session;
pub mod summary;

pub use error::{Error, Result};
