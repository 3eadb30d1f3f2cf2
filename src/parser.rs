//! CSV parser for student score sheets.
//!
//! The first line is a header and is skipped without being checked. Every
//! other non-blank line is read positionally into a [`Record`]. Fields that
//! do not parse as numbers are kept as not-a-number markers instead of
//! failing the row.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use tracing::{debug, info, warn};

use crate::error::GradebookError;
use crate::record::{Record, Scores};

/// Positional column names of an input row.
pub const COLUMNS: [&str; 8] = [
    "classId",
    "number",
    "name",
    "finalExam",
    "performance1",
    "performance2",
    "performance3",
    "total",
];

/// Parses delimited text into records, preserving input order.
///
/// # Errors
///
/// Returns [`GradebookError::LoadFailure`] if the text is empty or cannot be
/// split into rows. Malformed fields inside a row never produce an error.
#[tracing::instrument(skip(text), fields(bytes = text.len()))]
pub fn parse_records(text: &str) -> Result<Vec<Record>, GradebookError> {
    let body = text.trim();
    if body.is_empty() {
        return Err(GradebookError::LoadFailure("input is empty".into()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut records = Vec::new();
    let mut anomalies = 0usize;

    for result in rdr.records() {
        let row = result.map_err(|e| GradebookError::LoadFailure(e.to_string()))?;
        if is_blank(&row) {
            continue;
        }

        let mut fields = FieldReader::new(&row);
        let class_id = fields.int(0);
        let number = fields.int(1);
        let name = fields.text(2);
        let scores = Scores {
            final_exam: fields.real(3),
            performance: [fields.real(4), fields.real(5), fields.real(6)],
            total: fields.real(7),
        };
        anomalies += fields.anomalies;

        records.push(Record::new(class_id, number, name, scores));
    }

    if anomalies > 0 {
        warn!(anomalies, "Some fields could not be parsed as numbers");
    }
    info!(records = records.len(), "Grade sheet parsed");

    Ok(records)
}

/// Reads a grade sheet from `path`, decompressing it first when the file
/// name ends in `.gz`.
pub fn read_source(path: &Path) -> Result<String, GradebookError> {
    let file = File::open(path)?;
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(path = %path.display(), gzipped, "Reading grade sheet");

    if gzipped {
        read_text(GzDecoder::new(file))
    } else {
        read_text(file)
    }
}

/// Reads all of `reader` as UTF-8 text.
///
/// Undecodable input cannot be split into rows, so it is a load failure.
pub fn read_text<R: Read>(mut reader: R) -> Result<String, GradebookError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| GradebookError::LoadFailure(e.to_string()))?;
    Ok(text)
}

// A whitespace-only line comes through the reader as a single blank field.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).is_some_and(|f| f.trim().is_empty())
}

/// Reads the longest leading integer of `raw`, so `"2.0"` and `"12th"`
/// both count. A negative or oversized value has no class/roster meaning.
fn leading_int(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = digit_run(bytes, sign);
    if digits == 0 {
        return None;
    }
    let value: i64 = raw[..sign + digits].parse().ok()?;
    u32::try_from(value).ok()
}

/// Reads the longest leading decimal number of `raw`, so `"85pts"` is 85.
fn leading_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if raw[sign..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_digits = digit_run(bytes, sign);
    let mut end = sign + int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digit_run(bytes, end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if end == sign {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(bytes, exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    raw[..end].parse().ok()
}

fn digit_run(bytes: &[u8], start: usize) -> usize {
    bytes
        .get(start..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

struct FieldReader<'r> {
    row: &'r StringRecord,
    anomalies: usize,
}

impl<'r> FieldReader<'r> {
    fn new(row: &'r StringRecord) -> Self {
        Self { row, anomalies: 0 }
    }

    fn text(&self, idx: usize) -> &'r str {
        self.row.get(idx).unwrap_or("")
    }

    fn int(&mut self, idx: usize) -> Option<u32> {
        let parsed = self.row.get(idx).and_then(leading_int);
        if parsed.is_none() {
            self.anomaly(idx);
        }
        parsed
    }

    fn real(&mut self, idx: usize) -> f64 {
        match self.row.get(idx).and_then(leading_float) {
            Some(value) => value,
            None => {
                self.anomaly(idx);
                f64::NAN
            }
        }
    }

    fn anomaly(&mut self, idx: usize) {
        self.anomalies += 1;
        debug!(
            line = self.row.position().map(|p| p.line()),
            column = COLUMNS[idx],
            raw = self.row.get(idx),
            "Unparseable field kept as not-a-number"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::Grade;

    const HEADER: &str = "classId,number,name,finalExam,performance1,performance2,performance3,total";

    #[test]
    fn test_parse_empty_input_is_load_failure() {
        assert!(matches!(
            parse_records(""),
            Err(GradebookError::LoadFailure(_))
        ));
        assert!(matches!(
            parse_records("  \n\n "),
            Err(GradebookError::LoadFailure(_))
        ));
    }

    #[test]
    fn test_parse_header_only() {
        let records = parse_records(HEADER).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_header_is_not_validated() {
        let records = parse_records("whatever\n1,2,Kim,40,10,10,10,70").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Kim");
    }

    #[test]
    fn test_parse_rows_in_order() {
        let text = format!(
            "{HEADER}\n1,1,Kim,45,15,15,20,95\n2,1,Lee,20,10,10,15,55\n"
        );
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].class_id(), Some(1));
        assert_eq!(records[0].number(), Some(1));
        assert_eq!(records[0].name(), "Kim");
        assert_eq!(records[0].final_exam(), 45.0);
        assert_eq!(records[0].scores().performance, [15.0, 15.0, 20.0]);
        assert_eq!(records[0].total(), 95.0);
        assert_eq!(records[0].grade(), Grade::A);
        assert_eq!(records[1].name(), "Lee");
        assert_eq!(records[1].grade(), Grade::F);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = format!("{HEADER}\n\n1,1,Kim,45,15,15,20,95\n   \n\t\n2,1,Lee,20,10,10,15,55\n\n");
        let records = parse_records(&text).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_bad_fields_become_markers() {
        let text = format!("{HEADER}\nx,?,Kim,abc,10,10,10,n/a");
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.class_id(), None);
        assert_eq!(r.number(), None);
        assert!(r.final_exam().is_nan());
        assert!(r.total().is_nan());
        assert_eq!(r.scores().performance, [10.0, 10.0, 10.0]);
        assert_eq!(r.grade(), Grade::F);
    }

    #[test]
    fn test_numeric_prefixes_are_read() {
        let text = format!("{HEADER}\n2.0,1,Lee,30,10,10,10,70\n3,12th,Park,40.5kg,.5,7.,1e1x,85pts");
        let records = parse_records(&text).unwrap();

        assert_eq!(records[0].class_id(), Some(2));
        let park = &records[1];
        assert_eq!(park.number(), Some(12));
        assert_eq!(park.final_exam(), 40.5);
        assert_eq!(park.scores().performance, [0.5, 7.0, 10.0]);
        assert_eq!(park.total(), 85.0);
        assert_eq!(park.grade(), Grade::B);
    }

    #[test]
    fn test_prefix_class_is_kept_by_class_filter() {
        use crate::view::{ClassFilter, Criteria, SortKey, project};

        let text = format!("{HEADER}\n2.0,1,Lee,30,10,10,10,70\n3,1,Park,40,10,10,10,85pts");
        let records = parse_records(&text).unwrap();
        let criteria = Criteria::new(ClassFilter::Class(2), "", SortKey::Insertion);
        assert_eq!(project(&records, &criteria), vec![0]);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int(" 7 "), Some(7));
        assert_eq!(leading_int("+3"), Some(3));
        assert_eq!(leading_int("2.9"), Some(2));
        assert_eq!(leading_int("-1"), None);
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);
        assert_eq!(leading_int("-"), None);
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("85pts"), Some(85.0));
        assert_eq!(leading_float("-2.5e2z"), Some(-250.0));
        assert_eq!(leading_float("3e"), Some(3.0));
        assert_eq!(leading_float("Infinity"), Some(f64::INFINITY));
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("NaN"), None);
    }

    #[test]
    fn test_short_row_is_kept() {
        let text = format!("{HEADER}\n3,12,Park");
        let records = parse_records(&text).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_id(), Some(3));
        assert!(records[0].total().is_nan());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = format!("{HEADER},grade\n1,5,Kim,45,15,15,20,95,A");
        let records = parse_records(&text).unwrap();
        assert_eq!(records[0].total(), 95.0);
    }

    #[test]
    fn test_numbers_are_trimmed() {
        let text = format!("{HEADER}\n 2 , 7 ,Choi, 40.5 ,10,10,10, 70.5 ");
        let records = parse_records(&text).unwrap();

        assert_eq!(records[0].class_id(), Some(2));
        assert_eq!(records[0].number(), Some(7));
        assert_eq!(records[0].final_exam(), 40.5);
        assert_eq!(records[0].total(), 70.5);
    }

    #[test]
    fn test_read_text() {
        let text = format!("{HEADER}\n1,1,Kim,45,15,15,20,95");
        let read = read_text(text.as_bytes()).unwrap();
        assert_eq!(parse_records(&read).unwrap().len(), 1);
    }

    #[test]
    fn test_read_text_invalid_utf8_is_load_failure() {
        let bytes: &[u8] = &[0xFF, 0xFE, 0x00, 0x01];
        assert!(matches!(
            read_text(bytes),
            Err(GradebookError::LoadFailure(_))
        ));
    }

    #[test]
    fn test_read_source_gzip() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let path = std::env::temp_dir().join("grade_dashboard_test_source.csv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        write!(encoder, "{HEADER}\n1,1,Kim,45,15,15,20,95\n").unwrap();
        encoder.finish().unwrap();

        let text = read_source(&path).unwrap();
        assert_eq!(parse_records(&text).unwrap()[0].name(), "Kim");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_source_missing_file() {
        let result = read_source(Path::new("/nonexistent/grades.csv"));
        assert!(matches!(result, Err(GradebookError::Io(_))));
    }
}
