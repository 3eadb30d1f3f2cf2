//! Filter and sort criteria, and the projection of a record set into a view.
//!
//! A view is always recomputed from the full record set; nothing here mutates
//! the source.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::GradebookError;
use crate::record::Record;

/// Which class section to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassFilter {
    #[default]
    All,
    Class(u32),
}

impl ClassFilter {
    fn keeps(self, record: &Record) -> bool {
        match self {
            ClassFilter::All => true,
            ClassFilter::Class(id) => record.class_id() == Some(id),
        }
    }
}

impl FromStr for ClassFilter {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ClassFilter::All);
        }
        s.parse()
            .map(ClassFilter::Class)
            .map_err(|_| GradebookError::InvalidClassFilter(s.to_string()))
    }
}

impl fmt::Display for ClassFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassFilter::All => f.write_str("all"),
            ClassFilter::Class(id) => write!(f, "{id}"),
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    /// Ascending class, then ascending roster number.
    #[serde(rename = "number")]
    RosterOrder,
    #[serde(rename = "total-desc")]
    TotalDescending,
    #[serde(rename = "total-asc")]
    TotalAscending,
    #[serde(rename = "final-desc")]
    FinalExamDescending,
    /// Source order, filtered but not sorted.
    #[default]
    #[serde(rename = "none")]
    Insertion,
}

impl SortKey {
    /// The option value the dashboard uses for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::RosterOrder => "number",
            SortKey::TotalDescending => "total-desc",
            SortKey::TotalAscending => "total-asc",
            SortKey::FinalExamDescending => "final-desc",
            SortKey::Insertion => "none",
        }
    }
}

impl From<&str> for SortKey {
    /// Unknown keys leave the view in source order.
    fn from(s: &str) -> Self {
        match s.trim() {
            "number" => SortKey::RosterOrder,
            "total-desc" => SortKey::TotalDescending,
            "total-asc" => SortKey::TotalAscending,
            "final-desc" => SortKey::FinalExamDescending,
            _ => SortKey::Insertion,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything that determines a view of the record set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    pub class_filter: ClassFilter,
    pub search_term: String,
    pub sort_key: SortKey,
}

impl Criteria {
    pub fn new(class_filter: ClassFilter, search_term: impl Into<String>, sort_key: SortKey) -> Self {
        Criteria {
            class_filter,
            search_term: search_term.into(),
            sort_key,
        }
    }
}

/// Returns the positions in `records` that make up the view, in view order.
pub fn project(records: &[Record], criteria: &Criteria) -> Vec<usize> {
    let needle = criteria.search_term.trim().to_lowercase();

    let mut selected: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.class_filter.keeps(r))
        .filter(|(_, r)| matches_search(r, &needle))
        .map(|(i, _)| i)
        .collect();

    // sort_by is stable: equal keys keep their source order.
    match criteria.sort_key {
        SortKey::RosterOrder => selected.sort_by(|&a, &b| {
            let (a, b) = (&records[a], &records[b]);
            nones_last(a.class_id(), b.class_id()).then(nones_last(a.number(), b.number()))
        }),
        SortKey::TotalDescending => {
            selected.sort_by(|&a, &b| descending(records[a].total(), records[b].total()))
        }
        SortKey::TotalAscending => {
            selected.sort_by(|&a, &b| ascending(records[a].total(), records[b].total()))
        }
        SortKey::FinalExamDescending => selected.sort_by(|&a, &b| {
            descending(records[a].final_exam(), records[b].final_exam())
        }),
        SortKey::Insertion => {}
    }

    selected
}

/// Borrowing form of [`project`].
pub fn apply<'a>(records: &'a [Record], criteria: &Criteria) -> Vec<&'a Record> {
    project(records, criteria)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

// `needle` is already trimmed and lowercased.
fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record.name().to_lowercase().contains(needle)
        || record
            .number()
            .is_some_and(|n| n.to_string().contains(needle))
}

fn nones_last(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// NaN goes after every real value whichever direction is requested.
fn ascending(a: f64, b: f64) -> Ordering {
    a.is_nan().cmp(&b.is_nan()).then_with(|| a.total_cmp(&b))
}

fn descending(a: f64, b: f64) -> Ordering {
    a.is_nan().cmp(&b.is_nan()).then_with(|| b.total_cmp(&a))
}
