use grade_dashboard::analyzers::grade::Grade;
use grade_dashboard::analyzers::types::ScoreBand;
use grade_dashboard::config::DashboardConfig;
use grade_dashboard::parser::parse_records;
use grade_dashboard::session::Dashboard;
use grade_dashboard::view::{ClassFilter, Criteria, SortKey};

const SAMPLE: &str = include_str!("fixtures/sample_grades.csv");

fn dashboard() -> Dashboard {
    Dashboard::from_text(DashboardConfig::default(), SAMPLE).expect("Failed to load sample")
}

#[test]
fn test_full_pipeline() {
    let dashboard = dashboard();
    let summary = dashboard.summary();

    assert_eq!(dashboard.records().len(), 12);
    assert_eq!(summary.count, 12);
    assert_eq!(summary.max, 93.0);
    assert_eq!(summary.min, 48.0);
    // Two students share the top total; the first in file order wins.
    assert_eq!(summary.max_student.as_ref().unwrap().name, "Kim Minjun");
    assert_eq!(summary.grade_count(Grade::A), 3);
    assert_eq!(summary.grade_count(Grade::F), 2);
    assert_eq!(summary.band_count(ScoreBand::NinetyUp), 3);
    assert_eq!(summary.class_averages.len(), 5);
}

#[test]
fn test_class_filter_then_summary() {
    let mut dashboard = dashboard();
    dashboard.set_criteria(Criteria::new(ClassFilter::Class(2), "", SortKey::TotalDescending));

    let summary = dashboard.summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.class_average(2), Some((90.0 + 55.0 + 79.0) / 3.0));
    assert_eq!(summary.class_average(1), Some(0.0));

    let names: Vec<&str> = dashboard.view().map(|r| r.name()).collect();
    assert_eq!(names, ["Choi Yuna", "Kang Doyun", "Jung Haneul"]);
}

#[test]
fn test_search_by_roster_number() {
    let mut dashboard = dashboard();
    dashboard.set_criteria(Criteria::new(ClassFilter::All, "33", SortKey::RosterOrder));

    let names: Vec<&str> = dashboard.view().map(|r| r.name()).collect();
    assert_eq!(names, ["Kang Doyun"]);
}

#[test]
fn test_empty_view_summary_is_zero() {
    let mut dashboard = dashboard();
    dashboard.set_criteria(Criteria::new(ClassFilter::All, "nobody", SortKey::RosterOrder));

    let summary = dashboard.summary();
    assert_eq!(summary.count, 0);
    assert_eq!(summary.average, 0.0);
    assert_eq!(summary.std_dev, 0.0);
}

#[test]
fn test_export_then_reparse_matches_view() {
    let mut dashboard = dashboard();
    dashboard.set_criteria(Criteria::new(ClassFilter::All, "", SortKey::FinalExamDescending));

    let mut out = Vec::new();
    dashboard.export_csv(&mut out).expect("export failed");
    let reparsed = parse_records(&String::from_utf8(out).unwrap()).unwrap();

    let view: Vec<_> = dashboard.view().cloned().collect();
    assert_eq!(reparsed, view);
}
