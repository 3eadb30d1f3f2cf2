//! The student record produced by the parser.

use serde::Serialize;

use crate::analyzers::grade::{Grade, grade};

/// Raw score columns of one row, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub final_exam: f64,
    pub performance: [f64; 3],
    /// Supplied by the input, not recomputed from the other columns.
    pub total: f64,
}

/// One student's scores plus the grade derived from `total`.
///
/// Fields are private: a record cannot change after construction, so the
/// grade always matches the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    class_id: Option<u32>,
    number: Option<u32>,
    name: String,
    #[serde(flatten)]
    scores: Scores,
    grade: Grade,
}

impl Record {
    pub fn new(
        class_id: Option<u32>,
        number: Option<u32>,
        name: impl Into<String>,
        scores: Scores,
    ) -> Self {
        Record {
            class_id,
            number,
            name: name.into(),
            grade: grade(scores.total),
            scores,
        }
    }

    /// `None` when the column could not be read as a class number.
    pub fn class_id(&self) -> Option<u32> {
        self.class_id
    }

    /// `None` when the column could not be read as a roster number.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn final_exam(&self) -> f64 {
        self.scores.final_exam
    }

    pub fn total(&self) -> f64 {
        self.scores.total
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }
}
