//! Calendar arithmetic, reporting windows and billing occurrence generation.

pub mod calendar;
pub mod occurrences;
pub mod window;

pub use occurrences::Occurrences;
pub use window::{DateWindow, ReportingMode, ReportingWindow};
