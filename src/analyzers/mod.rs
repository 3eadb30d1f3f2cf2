//! Grading and descriptive statistics.
//!
//! This module classifies totals into letter grades and summarizes a view
//! set: overall spread, grade distribution, per-class averages and score
//! bands.

pub mod aggregate;
pub mod grade;
pub mod types;
pub mod utility;
