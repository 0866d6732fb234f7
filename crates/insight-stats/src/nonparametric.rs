//! Mann-Whitney U test.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use insight_model::Column;

use crate::outcome::{Insufficient, TestOutcome};
use crate::sample::{GroupSummary, two_groups};

/// The exact p-value is used when the smaller group has at most this many
/// values and there are no ties.
pub const EXACT_CUTOFF: usize = 8;

/// How the p-value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UMethod {
    Exact,
    /// Normal approximation with tie and continuity correction.
    Asymptotic,
}

/// Mann-Whitney U test result. `u` is the statistic of the first group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannWhitney {
    pub u: f64,
    pub p_value: f64,
    pub method: UMethod,
    pub groups: [GroupSummary; 2],
}

/// Two-sided Mann-Whitney U test of `values` between the two groups of
/// `groups`. Each group needs at least one numeric value.
pub fn mann_whitney_u(values: &Column, groups: &Column) -> TestOutcome<MannWhitney> {
    let [first, second] = two_groups(values, groups, 1)?;
    let n1 = first.values.len();
    let n2 = second.values.len();

    let (r1, tie_term) = rank_sum(&first.values, &second.values);
    let u1 = r1 - (n1 * (n1 + 1)) as f64 / 2.0;
    let u_max = u1.max((n1 * n2) as f64 - u1);

    let exact = if n1.min(n2) <= EXACT_CUTOFF && tie_term == 0.0 {
        exact_p(n1, n2, u_max)
    } else {
        None
    };
    let (p_value, method) = match exact {
        Some(p) => (p, UMethod::Exact),
        None => (asymptotic_p(n1, n2, u_max, tie_term)?, UMethod::Asymptotic),
    };

    Ok(MannWhitney {
        u: u1,
        p_value,
        method,
        groups: [GroupSummary::of(&first), GroupSummary::of(&second)],
    })
}

/// Mid-rank sum of `first` within the pooled sample, plus the tie term
/// `Σ(t³ - t)` over tied runs.
fn rank_sum(first: &[f64], second: &[f64]) -> (f64, f64) {
    let mut pooled: Vec<(f64, bool)> = first
        .iter()
        .map(|v| (*v, true))
        .chain(second.iter().map(|v| (*v, false)))
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut r1 = 0.0;
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < pooled.len() {
        let mut end = start;
        while end + 1 < pooled.len() && pooled[end + 1].0 == pooled[start].0 {
            end += 1;
        }
        let run = &pooled[start..=end];
        let rank = (start + end) as f64 / 2.0 + 1.0;
        let in_first = run.iter().filter(|(_, first)| *first).count();
        r1 += rank * in_first as f64;
        let t = run.len() as f64;
        tie_term += t.powi(3) - t;
        start = end + 1;
    }
    (r1, tie_term)
}

/// `P(U >= u_max)` doubled, from the exact null distribution. `None` when the
/// number of orderings does not fit the counting type.
fn exact_p(n1: usize, n2: usize, u_max: f64) -> Option<f64> {
    let counts = u_distribution(n1, n2)?;
    let total: i128 = counts.iter().sum();
    let threshold = u_max.round() as usize;
    let upper: i128 = counts.iter().skip(threshold).sum();
    Some((2.0 * upper as f64 / total as f64).min(1.0))
}

/// Number of orderings giving each value of U for groups of `n1` and `n2`.
///
/// These are the coefficients of the Gaussian binomial `[n1+n2, m]_q` with
/// `m = min(n1, n2)`, built as `Π (1 - q^(n+i)) / (1 - q^i)` for `i = 1..=m`.
/// After step `i` the polynomial is `[n+i, i]_q`, so no coefficient exceeds
/// `C(n1+n2, m)`, which is checked up front.
fn u_distribution(n1: usize, n2: usize) -> Option<Vec<i128>> {
    let (m, n) = (n1.min(n2), n1.max(n2));
    binomial(n + m, m)?;
    let mut counts = vec![0_i128; m * n + m + 1];
    counts[0] = 1;
    for i in 1..=m {
        let shift = n + i;
        for u in (shift..=i * n + i).rev() {
            counts[u] -= counts[u - shift];
        }
        for u in i..=i * n + i {
            counts[u] += counts[u - i];
        }
    }
    counts.truncate(m * n + 1);
    Some(counts)
}

fn binomial(n: usize, k: usize) -> Option<i128> {
    let mut value: i128 = 1;
    for i in 0..k {
        value = value.checked_mul((n - i) as i128)? / (i + 1) as i128;
    }
    Some(value)
}

fn asymptotic_p(n1: usize, n2: usize, u_max: f64, tie_term: f64) -> TestOutcome<f64> {
    let (n1, n2) = (n1 as f64, n2 as f64);
    let n = n1 + n2;
    let mu = n1 * n2 / 2.0;
    let sigma_sq = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if sigma_sq.is_nan() || sigma_sq <= 0.0 {
        return Ok(1.0);
    }
    let z = (u_max - mu - 0.5) / sigma_sq.sqrt();
    let normal = Normal::new(0.0, 1.0).map_err(|_| Insufficient::InvalidParameter {
        name: "sigma",
        value: 1.0,
    })?;
    Ok((2.0 * normal.sf(z)).min(1.0))
}
