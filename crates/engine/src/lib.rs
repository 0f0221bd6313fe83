//! `partsbench-engine` — Cross-reference resolution and demand aggregation.
//!
//! Pure engine crate: receives pre-loaded catalog and demand records, returns
//! resolved mappings, regional rollups, and benchmarking KPIs.
//! No CLI dependencies; file loading is limited to parsing CSV text.

pub mod aggregate;
pub mod config;
pub mod demand;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod kpi;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod summary;

pub use config::PipelineConfig;
pub use engine::{run, PipelineInput};
pub use error::PipelineError;
pub use model::{DemandRecord, PipelineResult, RegionalAggregate, ResolvedMapping};
