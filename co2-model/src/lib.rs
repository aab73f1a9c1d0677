//! Core types for CO2 emissions chart data.
//!
//! A [`Record`](record::Record) is one country-year observation with a
//! fixed set of named metrics. Loaders translate the dataset's native CSV
//! headers into this schema; everything downstream works on typed fields.
//!
//! ```rust
//! use co2_model::{metric::Metric, record::Record};
//!
//! let csv = "Entity,Code,Year,region,Annual CO₂ emissions\nFrance,FRA,2000,Europe,400\n";
//! let records = Record::parse_csv(csv).unwrap();
//! assert_eq!(records[0].year, 2000);
//! assert_eq!(records[0].metric(Metric::Annual), 400.0);
//! ```

pub mod climate;
pub mod error;
pub mod metric;
pub mod period;
pub mod record;
pub mod region;

pub use error::{ModelError, Result};
