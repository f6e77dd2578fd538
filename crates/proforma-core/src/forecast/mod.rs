//! Sales and cost forecasting for the two competing projects.

pub mod sales;

pub use sales::OfficeGapModel;
