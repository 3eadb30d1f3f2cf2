//! Data types produced by the aggregation engine.

use serde::Serialize;

use crate::analyzers::grade::Grade;

/// Who holds the highest or lowest total in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRef {
    pub name: String,
    pub class_id: Option<u32>,
}

/// Number and share of records holding one letter grade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: usize,
    pub percentage: f64,
}

/// Mean total of one class, 0 when the class has no records in the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAverage {
    pub class_id: u32,
    pub average: f64,
    pub count: usize,
}

/// A half-open range of totals used for the distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    #[serde(rename = "0-59")]
    Below60,
    #[serde(rename = "60-69")]
    Sixties,
    #[serde(rename = "70-79")]
    Seventies,
    #[serde(rename = "80-89")]
    Eighties,
    #[serde(rename = "90-100")]
    NinetyUp,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 5] = [
        ScoreBand::Below60,
        ScoreBand::Sixties,
        ScoreBand::Seventies,
        ScoreBand::Eighties,
        ScoreBand::NinetyUp,
    ];

    /// Buckets a total with the same `<` chain the dashboard always used:
    /// anything below 60 (negatives included) is the first band, and a value
    /// that fails every comparison, such as NaN, ends up in the top band.
    pub fn of(total: f64) -> ScoreBand {
        if total < 60.0 {
            ScoreBand::Below60
        } else if total < 70.0 {
            ScoreBand::Sixties
        } else if total < 80.0 {
            ScoreBand::Seventies
        } else if total < 90.0 {
            ScoreBand::Eighties
        } else {
            ScoreBand::NinetyUp
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Below60 => "0-59",
            ScoreBand::Sixties => "60-69",
            ScoreBand::Seventies => "70-79",
            ScoreBand::Eighties => "80-89",
            ScoreBand::NinetyUp => "90-100",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub band: ScoreBand,
    pub count: usize,
}

/// Descriptive statistics of a view set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSummary {
    pub count: usize,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub std_dev: f64,
    pub max_student: Option<StudentRef>,
    pub min_student: Option<StudentRef>,
    /// One entry per letter, in [`Grade::ALL`] order.
    pub grade_counts: Vec<GradeCount>,
    /// One entry per configured class id, in configuration order.
    pub class_averages: Vec<ClassAverage>,
    /// One entry per band, in [`ScoreBand::ALL`] order.
    pub score_bands: Vec<BandCount>,
}

impl GradeSummary {
    pub fn grade_count(&self, grade: Grade) -> usize {
        self.grade_counts
            .iter()
            .find(|g| g.grade == grade)
            .map_or(0, |g| g.count)
    }

    /// Returns `None` for a class outside the configured range.
    pub fn class_average(&self, class_id: u32) -> Option<f64> {
        self.class_averages
            .iter()
            .find(|c| c.class_id == class_id)
            .map(|c| c.average)
    }

    pub fn band_count(&self, band: ScoreBand) -> usize {
        self.score_bands
            .iter()
            .find(|b| b.band == band)
            .map_or(0, |b| b.count)
    }
}
