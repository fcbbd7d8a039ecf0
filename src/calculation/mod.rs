//! Calculation primitives for the analytics engine.
//!
//! This module contains the building blocks every analysis is made of:
//! score equivalence lookup, ordered grouping with explicit missing-value
//! handling, rates, means and medians, top-N selection, percentage
//! distributions, cross-tabulation and Simpson's diversity index.
//!
//! None of these functions fail. A statistic over an empty group is `None`.

mod dimension;
mod distribution;
mod diversity;
mod grouping;
mod score_equivalence;

pub use dimension::{
    ApplicationDimension, EnrollmentDimension, EnrollmentRateBreakdown, GroupKey,
    RetentionBreakdown, enrollment_rate_by, enrollment_rate_table, retention_by, retention_table,
};
pub use distribution::{CrossTab, count_by, percentage_distribution, top_n};
pub use diversity::simpson_index;
pub use grouping::{
    Grouped, NumericSummary, RateCounter, decimal_mean, mean, median, rate, sort_desc_by,
};
