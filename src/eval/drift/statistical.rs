//! Statistical helpers for drift tests.

use std::collections::BTreeMap;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Two-sample Kolmogorov-Smirnov distance: the largest gap between the two
/// empirical CDFs.
pub fn ks_statistic(reference: &[f64], current: &[f64]) -> f64 {
    if reference.is_empty() || current.is_empty() {
        return 0.0;
    }
    let a = sorted(reference);
    let b = sorted(current);
    let (n1, n2) = (a.len() as f64, b.len() as f64);

    let (mut i, mut j) = (0usize, 0usize);
    let mut d_max = 0.0f64;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d_max
}

/// Asymptotic p-value for a two-sample KS distance `d` with sample sizes
/// `n1` and `n2` (Kolmogorov distribution with the Stephens correction).
pub fn ks_p_value(d: f64, n1: usize, n2: usize) -> f64 {
    if d <= 0.0 || n1 == 0 || n2 == 0 {
        return 1.0;
    }
    let n_eff = (n1 as f64 * n2 as f64) / (n1 + n2) as f64;
    let sqrt_n = n_eff.sqrt();
    let lambda = (sqrt_n + 0.12 + 0.11 / sqrt_n) * d;

    let mut p = 0.0;
    for k in 1..=100 {
        let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
        let term = sign * (-2.0 * f64::from(k).powi(2) * lambda.powi(2)).exp();
        p += term;
        if term.abs() < 1e-10 {
            break;
        }
    }
    (2.0 * p).clamp(0.0, 1.0)
}

/// Chi-square statistic of the current category counts against the reference
/// proportions. Both histograms are smoothed by half a count per category so
/// a category unseen in the reference still contributes. Returns the
/// statistic and its degrees of freedom.
pub fn chi_square_statistic(
    reference: &BTreeMap<String, usize>,
    current: &BTreeMap<String, usize>,
) -> (f64, usize) {
    let mut categories: Vec<&String> = reference.keys().chain(current.keys()).collect();
    categories.sort_unstable();
    categories.dedup();

    let k = categories.len();
    let ref_total = reference.values().sum::<usize>() as f64 + 0.5 * k as f64;
    let cur_total = current.values().sum::<usize>() as f64;
    if k < 2 || cur_total == 0.0 {
        return (0.0, 0);
    }

    let chi_sq = categories
        .iter()
        .map(|cat| {
            let expected =
                (reference.get(*cat).copied().unwrap_or(0) as f64 + 0.5) / ref_total * cur_total;
            let observed = current.get(*cat).copied().unwrap_or(0) as f64;
            (observed - expected).powi(2) / expected
        })
        .sum();
    (chi_sq, k - 1)
}

/// Upper-tail chi-square p-value (Wilson-Hilferty normal approximation)
pub fn chi_square_p_value(chi_sq: f64, df: usize) -> f64 {
    if df == 0 || chi_sq <= 0.0 {
        return 1.0;
    }
    let k = df as f64;
    let z = ((chi_sq / k).powf(1.0 / 3.0) - (1.0 - 2.0 / (9.0 * k))) / (2.0 / (9.0 * k)).sqrt();
    (0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2))).clamp(0.0, 1.0)
}

/// Population Stability Index over reference deciles
pub fn psi(reference: &[f64], current: &[f64]) -> f64 {
    const BINS: usize = 10;
    if reference.is_empty() || current.is_empty() {
        return 0.0;
    }
    let sorted_ref = sorted(reference);
    let mut edges = Vec::with_capacity(BINS + 1);
    edges.push(f64::NEG_INFINITY);
    for i in 1..BINS {
        let idx = (sorted_ref.len() * i / BINS).min(sorted_ref.len() - 1);
        edges.push(sorted_ref[idx]);
    }
    edges.push(f64::INFINITY);

    let ref_counts = bin_counts(reference, &edges);
    let cur_counts = bin_counts(current, &edges);
    let (n_ref, n_cur) = (reference.len() as f64, current.len() as f64);

    ref_counts
        .iter()
        .zip(&cur_counts)
        .map(|(&r, &c)| {
            let r_pct = (r as f64 + 1e-4) / (n_ref + 1e-3);
            let c_pct = (c as f64 + 1e-4) / (n_cur + 1e-3);
            (c_pct - r_pct) * (c_pct / r_pct).ln()
        })
        .sum()
}

/// Count samples falling in `(edges[i], edges[i + 1]]`
pub fn bin_counts(data: &[f64], edges: &[f64]) -> Vec<usize> {
    let mut counts = vec![0; edges.len().saturating_sub(1)];
    for &val in data {
        if let Some(i) = edges.windows(2).position(|w| val > w[0] && val <= w[1]) {
            counts[i] += 1;
        }
    }
    counts
}

/// Error function (Abramowitz-Stegun 7.1.26)
pub fn erf(x: f64) -> f64 {
    let (a1, a2, a3, a4, a5) = (0.254829592, -0.284496736, 1.421413741, -1.453152027, 1.061405429);
    let p = 0.3275911;

    let sign = x.signum();
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}
