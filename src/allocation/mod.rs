//! Period allocation and window totals.

pub mod aggregator;
pub mod allocator;

pub use aggregator::{summarize, total_for, Contribution, PeriodTotal, TotalScope};
pub use allocator::{allocate, allocate_month, allocate_year, billed_interval};
