use serde::Serialize;
use std::fmt;

/// Letter grade on the standard 10-point banding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// All letters, best first. This is also the order used in reports.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a total score into a letter grade.
///
/// | Range  | Grade |
/// |--------|-------|
/// | >= 90  | A     |
/// | >= 80  | B     |
/// | >= 70  | C     |
/// | >= 60  | D     |
/// | < 60   | F     |
///
/// NaN fails every comparison and lands on F.
pub fn grade(score: f64) -> Grade {
    match score {
        s if s >= 90.0 => Grade::A,
        s if s >= 80.0 => Grade::B,
        s if s >= 70.0 => Grade::C,
        s if s >= 60.0 => Grade::D,
        _ => Grade::F,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(grade(100.0), Grade::A);
        assert_eq!(grade(90.0), Grade::A);
        assert_eq!(grade(89.9999), Grade::B);
        assert_eq!(grade(80.0), Grade::B);
        assert_eq!(grade(79.99), Grade::C);
        assert_eq!(grade(70.0), Grade::C);
        assert_eq!(grade(69.5), Grade::D);
        assert_eq!(grade(60.0), Grade::D);
        assert_eq!(grade(59.9), Grade::F);
        assert_eq!(grade(0.0), Grade::F);
    }

    #[test]
    fn test_grade_out_of_range_scores() {
        assert_eq!(grade(130.0), Grade::A);
        assert_eq!(grade(-5.0), Grade::F);
    }

    #[test]
    fn test_grade_nan_is_f() {
        assert_eq!(grade(f64::NAN), Grade::F);
    }

    #[test]
    fn test_grade_monotonic() {
        let mut previous = grade(110.0);
        let mut score = 110.0;
        while score > -10.0 {
            let current = grade(score);
            assert!(current >= previous, "{score} graded {current} after {previous}");
            previous = current;
            score -= 0.25;
        }
    }

    #[test]
    fn test_grade_display() {
        let letters: Vec<String> = Grade::ALL.iter().map(|g| g.to_string()).collect();
        assert_eq!(letters, ["A", "B", "C", "D", "F"]);
    }
}
