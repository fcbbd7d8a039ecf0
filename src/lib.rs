//! Enrollment analytics engine for university admissions and enrollment data.
//!
//! This crate normalizes raw application and enrollment records, derives
//! rates, retention figures, score equivalents and diversity indices, and
//! assembles the results into named tables for stakeholder dashboards.

#![warn(missing_docs)]

pub mod analysis;
pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
