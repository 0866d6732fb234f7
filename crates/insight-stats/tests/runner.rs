//! Behaviour of the test runner on small, hand-checked datasets.

use insight_model::{Column, ColumnValues};
use insight_stats::{
    Insufficient, Significance, chi_square_independence, confidence_interval_mean,
    mann_whitney_u, one_sample_t, one_way_anova, pearson, two_sample_t,
};

fn welch_fixture() -> (Column, Column) {
    (
        Column::from_f64s("sales", [10.0, 12.0, 11.0, 9.0, 50.0, 52.0, 48.0, 51.0]),
        Column::from_labels("segment", ["A", "A", "A", "A", "B", "B", "B", "B"]),
    )
}

#[test]
fn welch_separates_distant_groups() {
    let (values, groups) = welch_fixture();
    let res = two_sample_t(&values, &groups).expect("welch result");
    assert_eq!(res.groups[0].label, "A");
    assert!((res.groups[0].mean - 10.5).abs() < 1e-12);
    assert!((res.groups[1].mean - 50.25).abs() < 1e-12);
    assert!(res.t < 0.0);
    assert!(res.p_value < 0.01);
    assert_eq!(Significance::decide(res.p_value, 0.05), Significance::Reject);
}

#[test]
fn welch_requires_exactly_two_groups() {
    let values = Column::from_f64s("v", [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let groups = Column::from_labels("g", ["A", "A", "B", "B", "C", "C"]);
    assert_eq!(
        two_sample_t(&values, &groups),
        Err(Insufficient::WrongGroupCount {
            expected: 2,
            found: 3
        })
    );
}

#[test]
fn welch_requires_two_values_per_group() {
    let values = Column::from_f64s("v", [1.0, 2.0, 3.0]);
    let groups = Column::from_labels("g", ["A", "A", "B"]);
    assert!(matches!(
        two_sample_t(&values, &groups),
        Err(Insufficient::GroupTooSmall { ref group, required: 2, found: 1 }) if group == "B"
    ));
}

#[test]
fn grouping_by_the_value_column_is_degenerate() {
    let (values, _) = welch_fixture();
    assert!(matches!(
        two_sample_t(&values, &values),
        Err(Insufficient::SameColumn { .. })
    ));
    assert!(matches!(
        mann_whitney_u(&values, &values),
        Err(Insufficient::SameColumn { .. })
    ));
    assert!(matches!(
        one_way_anova(&values, &values),
        Err(Insufficient::SameColumn { .. })
    ));
}

#[test]
fn mann_whitney_on_welch_fixture() {
    let (values, groups) = welch_fixture();
    let res = mann_whitney_u(&values, &groups).expect("u result");
    assert_eq!(res.u, 0.0);
    // Exact: 2 / C(8, 4).
    assert!((res.p_value - 2.0 / 70.0).abs() < 1e-12);
}

#[test]
fn mann_whitney_accepts_single_value_groups() {
    let values = Column::from_f64s("v", [1.0, 2.0]);
    let groups = Column::from_labels("g", ["A", "B"]);
    let res = mann_whitney_u(&values, &groups).expect("u result");
    assert_eq!(res.u, 0.0);
    assert_eq!(res.p_value, 1.0);
}

#[test]
fn chi_square_on_perfect_association() {
    let mut a = vec!["x"; 10];
    a.extend(["y"; 10]);
    let mut b = vec!["p"; 10];
    b.extend(["q"; 10]);
    let res = chi_square_independence(&Column::from_labels("a", a), &Column::from_labels("b", b))
        .expect("chi2 result");
    assert_eq!(res.table.observed, vec![vec![10, 0], vec![0, 10]]);
    assert!(res.yates);
    assert!((res.chi2 - 16.2).abs() < 1e-9);
    assert!(res.p_value < 0.01);
}

#[test]
fn chi_square_without_pairs_is_empty() {
    let a = Column::new("a", ColumnValues::Text(vec![None, Some("x".into())]));
    let b = Column::new("b", ColumnValues::Text(vec![Some("p".into()), None]));
    assert_eq!(
        chi_square_independence(&a, &b),
        Err(Insufficient::EmptyContingency)
    );
}

#[test]
fn pearson_of_a_column_with_itself() {
    let x = Column::from_f64s("x", [1.0, 2.0, 3.0, 4.0, 5.0]);
    let res = pearson(&x, &x).expect("pearson result");
    assert_eq!(res.r, 1.0);
    assert!(res.p_value < 1e-12);
}

#[test]
fn pearson_constant_input_has_zero_variance() {
    let x = Column::from_f64s("x", [1.0, 2.0, 3.0]);
    let y = Column::from_f64s("y", [7.0, 7.0, 7.0]);
    assert_eq!(pearson(&x, &y), Err(Insufficient::ZeroVariance));
}

#[test]
fn small_samples_are_insufficient_not_panics() {
    let one = Column::from_f64s("x", [4.2]);
    let empty = Column::new("e", ColumnValues::Numeric(vec![]));
    assert_eq!(
        one_sample_t(&one, 0.0),
        Err(Insufficient::TooFewObservations {
            required: 2,
            found: 1
        })
    );
    assert!(one_sample_t(&empty, 0.0).is_err());
    assert!(confidence_interval_mean(&one, 0.95).is_err());
    assert!(confidence_interval_mean(&empty, 0.95).is_err());
}

#[test]
fn text_numbers_are_coerced() {
    let col = Column::from_labels("price", ["1", " 2 ", "abc", "3"]);
    let ci = confidence_interval_mean(&col, 0.9).expect("ci");
    assert_eq!(ci.n, 3);
    assert!((ci.mean - 2.0).abs() < 1e-12);
}

#[test]
fn boolean_values_coerce_to_zero_and_one() {
    let col = Column::new(
        "flag",
        ColumnValues::Boolean(vec![Some(true), Some(false), None, Some(true)]),
    );
    let res = one_sample_t(&col, 0.0).expect("t result");
    assert_eq!(res.n, 3);
    assert!((res.mean - 2.0 / 3.0).abs() < 1e-12);
}
