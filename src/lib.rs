//! # Interference: load-test measurement tooling
//!
//! Two independent batch utilities for load-testing campaigns:
//!
//! - **Interval aggregator** ([`confidence`]): pools repeated-trial latency
//!   samples per experiment step, writes a 95% confidence interval per step,
//!   and warns about repeats whose interval is too wide to trust.
//! - **Profile generator** ([`profile`]): synthesizes linear or stepwise
//!   request-rate profiles for the load generator.
//!
//! Measurements are read into Arrow record batches ([`measurement`]) and
//! processed in a single pass. Nothing is cached between runs.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use interference::confidence::{self, ConfidencePolicy};
//! use interference::profile;
//!
//! // Aggregate measurements/checkout/<step>/<repeat>/summary_out.csv
//! let run = confidence::run("measurements/checkout", &ConfidencePolicy::default())?;
//! println!("{} steps, {} flagged", run.statistics.len(), run.exceeding.len());
//!
//! // 10 -> 100 RPS over one minute
//! let ramp = profile::generate_linear(10, 100, 60)?;
//! profile::write_profile("ramp.csv", &ramp)?;
//! # Ok::<(), interference::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod confidence;
pub mod error;
pub mod measurement;
pub mod profile;

pub use error::{Error, Result};
