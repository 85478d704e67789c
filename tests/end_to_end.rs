//! Full pipeline walk: raw delimited file through cleaning, persistence in
//! both formats, balancing, cross-validation, report round-trip, and
//! comparison.

use medml::prelude::*;
use medml::dataset::arff::{read_arff_path, write_arff_path};
use medml::evaluation::report::write_report;

/// Raw input: one quoted attribute name, missing ages, a three-category
/// nominal, a constant column, a numeric 0/1 target, and two duplicate rows.
fn raw_csv() -> String {
    let mut out = String::from("'age',cp,pressure,target\n");
    let cps = ["typical", "atypical", "none"];
    for i in 0..24 {
        let age = if i % 11 == 3 {
            "?".to_string()
        } else {
            format!("{}", 35 + (i * 3) % 40)
        };
        out.push_str(&format!(
            "{},{},120,{}\n",
            age,
            cps[i % 3],
            u32::from(i % 3 == 0)
        ));
    }
    // Duplicates of the first two data rows
    out.push_str("35,typical,120,1\n");
    out.push_str("38,atypical,120,0\n");
    out
}

fn prepare() -> Dataset {
    let mut raw = DelimitedReader::new()
        .read(raw_csv().as_bytes(), "heart")
        .unwrap();
    raw.set_class_last().unwrap();
    let raw = raw.nominalize_class().unwrap();

    let (clean, summary) = DataCleaner::new().clean(&raw).unwrap();
    assert_eq!(summary.duplicates_removed, 2);
    assert_eq!(summary.constants_removed, vec!["pressure".to_string()]);
    assert_eq!(clean.total_missing(), 0);
    clean
}

#[test]
fn cleaned_dataset_round_trips_through_both_formats() {
    let clean = prepare();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("clean.csv");
    DelimitedWriter::new().write_path(&clean, &csv_path).unwrap();
    let from_csv = DelimitedReader::new().read_path(&csv_path).unwrap();
    assert_eq!(from_csv.n_rows(), clean.n_rows());

    let arff_path = dir.path().join("clean.arff");
    write_arff_path(&clean, &arff_path).unwrap();
    let from_arff = read_arff_path(&arff_path).unwrap();
    assert_eq!(from_arff.attributes(), clean.attributes());
    assert_eq!(from_arff.rows(), clean.rows());

    // Only the typed format can know the 0/1 class is nominal
    let class_col = clean.n_attributes() - 1;
    assert!(from_arff.attribute(class_col).is_nominal());
    assert!(from_csv.attribute(class_col).is_numeric());
}

#[test]
fn balanced_evaluation_reports_compare() {
    let mut clean = prepare();
    clean.set_class_last().unwrap();

    let balanced = balance(&clean, BalanceMode::Uniform, 1).unwrap();
    assert_eq!(balanced.n_rows(), clean.n_rows());

    let tree = cross_validate(
        || ClassifierKind::DecisionTree.build(1),
        &balanced,
        5,
        1,
    )
    .unwrap();
    let baseline = cross_validate(
        || ClassifierKind::Majority.build(1),
        &balanced,
        5,
        1,
    )
    .unwrap();
    assert_eq!(tree.instances, balanced.n_rows());
    assert_eq!(baseline.instances, balanced.n_rows());

    // Reports round-trip through disk and the text parser
    let dir = tempfile::tempdir().unwrap();
    let tree_path = dir.path().join("tree.txt");
    let baseline_path = dir.path().join("baseline.txt");
    write_report(&tree, &tree_path).unwrap();
    write_report(&baseline, &baseline_path).unwrap();

    let tree_text = std::fs::read_to_string(&tree_path).unwrap();
    let baseline_text = std::fs::read_to_string(&baseline_path).unwrap();

    let overall_tree = parse_overall_metrics(&tree_text).unwrap();
    let overall_baseline = parse_overall_metrics(&baseline_text).unwrap();
    let parsed_accuracy = overall_tree["accuracy"];
    assert!((parsed_accuracy - tree.percent_correct).abs() < 0.006);

    let comparison = ComparisonReport::new(
        "Decision Tree",
        overall_tree,
        parse_class_metrics(&tree_text).unwrap(),
        "Majority Baseline",
        overall_baseline,
        parse_class_metrics(&baseline_text).unwrap(),
    );
    let rendered = comparison.render();
    assert!(rendered.contains("=== WINNER ANALYSIS ==="));
    assert!(rendered.contains("Best Accuracy:"));
}

#[test]
fn cross_validation_is_reproducible_end_to_end() {
    let clean = prepare();

    let a = cross_validate(|| ClassifierKind::DecisionTree.build(9), &clean, 5, 9).unwrap();
    let b = cross_validate(|| ClassifierKind::DecisionTree.build(9), &clean, 5, 9).unwrap();

    assert_eq!(a.percent_correct, b.percent_correct);
    assert_eq!(a.kappa, b.kappa);
    assert_eq!(a.mean_absolute_error, b.mean_absolute_error);
    assert_eq!(a.root_mean_squared_error, b.root_mean_squared_error);
    assert_eq!(a.confusion, b.confusion);
}
