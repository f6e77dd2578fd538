//! Trial-level statistics: summaries, the office-versus-residential
//! significance test and the downside metrics.

pub mod comparator;

pub use comparator::{DownsideMetrics, SummaryStats, TTestResult};
