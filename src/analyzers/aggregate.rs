use crate::analyzers::grade::Grade;
use crate::analyzers::types::{
    BandCount, ClassAverage, GradeCount, GradeSummary, ScoreBand, StudentRef,
};
use crate::analyzers::utility::{mean, percentage, population_std_dev};
use crate::record::Record;
use tracing::debug;

/// Class sections reported by default: a fixed five-section classroom.
pub const DEFAULT_CLASS_IDS: [u32; 5] = [1, 2, 3, 4, 5];

/// Summarizes a view set into a [`GradeSummary`].
///
/// `class_ids` is the fixed list of sections to report averages for; it is
/// not derived from the data, so a section absent from the view reports 0.
/// Extremes are taken from the first record reaching them in iteration
/// order. An empty view yields zeros everywhere.
pub fn summarize<'a, I>(records: I, class_ids: &[u32]) -> GradeSummary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut totals = Vec::new();
    let mut highest: Option<&Record> = None;
    let mut lowest: Option<&Record> = None;
    let mut grade_tally = [0usize; Grade::ALL.len()];
    let mut band_tally = [0usize; ScoreBand::ALL.len()];
    let mut class_sums = vec![(0.0f64, 0usize); class_ids.len()];

    for record in records {
        let total = record.total();
        totals.push(total);

        if highest.is_none_or(|h| total > h.total()) {
            highest = Some(record);
        }
        if lowest.is_none_or(|l| total < l.total()) {
            lowest = Some(record);
        }

        grade_tally[grade_index(record.grade())] += 1;
        band_tally[band_index(ScoreBand::of(total))] += 1;

        if let Some(class_id) = record.class_id() {
            if let Some(pos) = class_ids.iter().position(|&c| c == class_id) {
                class_sums[pos].0 += total;
                class_sums[pos].1 += 1;
            }
        }
    }

    let count = totals.len();
    let average = mean(&totals);
    let std_dev = population_std_dev(&totals, average);

    let grade_counts = Grade::ALL
        .iter()
        .zip(grade_tally)
        .map(|(&grade, n)| GradeCount {
            grade,
            count: n,
            percentage: percentage(n, count),
        })
        .collect();

    let class_averages = class_ids
        .iter()
        .zip(class_sums)
        .map(|(&class_id, (sum, n))| ClassAverage {
            class_id,
            average: if n == 0 { 0.0 } else { sum / n as f64 },
            count: n,
        })
        .collect();

    let score_bands = ScoreBand::ALL
        .iter()
        .zip(band_tally)
        .map(|(&band, n)| BandCount { band, count: n })
        .collect();

    debug!(count, average, "View summarized");

    GradeSummary {
        count,
        average,
        max: highest.map_or(0.0, Record::total),
        min: lowest.map_or(0.0, Record::total),
        std_dev,
        max_student: highest.map(student_ref),
        min_student: lowest.map(student_ref),
        grade_counts,
        class_averages,
        score_bands,
    }
}

fn student_ref(record: &Record) -> StudentRef {
    StudentRef {
        name: record.name().to_string(),
        class_id: record.class_id(),
    }
}

fn grade_index(grade: Grade) -> usize {
    Grade::ALL.iter().position(|&g| g == grade).unwrap_or(0)
}

fn band_index(band: ScoreBand) -> usize {
    ScoreBand::ALL.iter().position(|&b| b == band).unwrap_or(0)
}
