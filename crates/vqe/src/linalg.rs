//! Small dense helpers for the linear interpolation models.

use faer::prelude::*;
use faer::Mat;

/// Pivots below this multiple of the largest entry mark a singular system.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Solves `a · x = b` with a partial-pivot LU factorization.
///
/// Returns `None` when a pivot of `U` falls below `1e-10` times the largest
/// entry of `a`, i.e. when the interpolation points are (nearly) affinely
/// dependent.
pub(crate) fn solve(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    debug_assert_eq!(a.len(), n);

    let largest = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let scale = if largest > 0.0 { largest } else { 1.0 };

    let m = Mat::<f64>::from_fn(n, n, |i, j| a[i][j]);
    let lu = m.partial_piv_lu();
    let u = lu.compute_u();
    if (0..n).any(|i| u.read(i, i).abs() < PIVOT_TOLERANCE * scale) {
        return None;
    }

    let rhs = Mat::<f64>::from_fn(n, 1, |i, _| b[i]);
    let x = lu.solve(rhs.as_ref());
    let x: Vec<f64> = (0..n).map(|i| x.read(i, 0)).collect();
    x.iter().all(|v| v.is_finite()).then_some(x)
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Index of the first maximum of `key` over `indices`.
pub(crate) fn argmax_by<I, K>(indices: I, mut key: K) -> usize
where
    I: IntoIterator<Item = usize>,
    K: FnMut(usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for i in indices {
        let v = key(i);
        match best {
            Some((_, bv)) if v <= bv => {}
            _ => best = Some((i, v)),
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Index of the first minimum of `key` over `indices`.
pub(crate) fn argmin_by<I, K>(indices: I, mut key: K) -> usize
where
    I: IntoIterator<Item = usize>,
    K: FnMut(usize) -> f64,
{
    argmax_by(indices, |i| -key(i))
}
