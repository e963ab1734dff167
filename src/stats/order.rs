/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Order statistics by selection.

use ::portmat_linalg::{MatrixError, Result};

// subarrays longer than this are first narrowed around a sampled pivot
const SAMPLE_THRESHOLD: isize = 600;

fn check_values(xs: &[f64]) -> Result<()> {
    if xs.is_empty() {
        return Err(MatrixError::invalid_argument("order statistic of an empty slice"));
    }
    if xs.iter().any(|x| x.is_nan()) {
        return Err(MatrixError::invalid_argument("order statistic of data containing NaN"));
    }
    Ok(())
}

/// The `k`-th smallest element of `xs` (0-based).
///
/// `xs` is reordered in place so that `xs[k]` holds the result, every element
/// before it is `<=` and every element after it is `>=`.
pub fn select(xs: &mut [f64], k: usize) -> Result<f64> {
    check_values(xs)?;
    if k >= xs.len() {
        return Err(MatrixError::invalid_argument(format!(
            "cannot select element {} of {}", k, xs.len(),
        )));
    }
    floyd_rivest(xs, 0, xs.len() as isize - 1, k as isize);
    Ok(xs[k])
}

fn floyd_rivest(a: &mut [f64], mut left: isize, mut right: isize, k: isize) {
    let at = |i: isize| i as usize;

    while right > left {
        if right - left > SAMPLE_THRESHOLD {
            let n = (right - left + 1) as f64;
            let i = (k - left + 1) as f64;
            let z = n.ln();
            let s = 0.5 * (2.0 * z / 3.0).exp();
            let sign = if i - n / 2.0 < 0.0 { -1.0 } else { 1.0 };
            let sd = 0.5 * (z * s * (n - s) / n).sqrt() * sign;
            let new_left = left.max((k as f64 - i * s / n + sd).floor() as isize);
            let new_right = right.min((k as f64 + (n - i) * s / n + sd).floor() as isize);
            floyd_rivest(a, new_left, new_right, k);
        }

        let t = a[at(k)];
        let mut i = left;
        let mut j = right;
        a.swap(at(left), at(k));
        if a[at(right)] > t {
            a.swap(at(right), at(left));
        }
        while i < j {
            a.swap(at(i), at(j));
            i += 1;
            j -= 1;
            while a[at(i)] < t {
                i += 1;
            }
            while a[at(j)] > t {
                j -= 1;
            }
        }
        if a[at(left)] == t {
            a.swap(at(left), at(j));
        } else {
            j += 1;
            a.swap(at(j), at(right));
        }

        if j <= k {
            left = j + 1;
        }
        if k <= j {
            right = j - 1;
        }
    }
}

// Smallest element of a non-empty slice without NaN.
fn min_of(xs: &[f64]) -> f64 {
    xs.iter().cloned().fold(::std::f64::INFINITY, f64::min)
}

fn max_of(xs: &[f64]) -> f64 {
    xs.iter().cloned().fold(::std::f64::NEG_INFINITY, f64::max)
}

pub fn median(xs: &[f64]) -> Result<f64> {
    check_values(xs)?;
    let mut work = xs.to_vec();
    let n = work.len();
    let upper = select(&mut work, n / 2)?;
    match n % 2 {
        1 => Ok(upper),
        _ => {
            let lower = max_of(&work[..n / 2]);
            Ok(lower + (upper - lower) / 2.0)
        },
    }
}

/// Quantile with linear interpolation between order statistics
/// (type 7 of Hyndman and Fan, the default of R and numpy).
pub fn quantile(xs: &[f64], p: f64) -> Result<f64> {
    check_values(xs)?;
    if !(0.0..=1.0).contains(&p) {
        return Err(MatrixError::invalid_argument(format!("quantile level {} outside of [0, 1]", p)));
    }
    let mut work = xs.to_vec();
    let h = (work.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let x_lo = select(&mut work, lo)?;
    let frac = h - lo as f64;
    if frac == 0.0 {
        return Ok(x_lo);
    }
    let x_hi = min_of(&work[lo + 1..]);
    Ok(x_lo + frac * (x_hi - x_lo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::rngs::StdRng;
    use ::rand::{Rng, SeedableRng};

    fn sorted(xs: &[f64]) -> Vec<f64> {
        let mut xs = xs.to_vec();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs
    }

    fn check_partition(xs: &[f64], k: usize) {
        assert!(xs[..k].iter().all(|&x| x <= xs[k]));
        assert!(xs[k + 1..].iter().all(|&x| x >= xs[k]));
    }

    #[test]
    fn select_small() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let expected = sorted(&data);
        for k in 0..data.len() {
            let mut work = data.to_vec();
            assert_eq!(select(&mut work, k), Ok(expected[k]));
            check_partition(&work, k);
        }
    }

    #[test]
    fn select_large_with_duplicates() {
        let mut rng = StdRng::seed_from_u64(42);
        for &len in &[601, 1000, 2500] {
            // few distinct values, so many ties
            let data: Vec<f64> = (0..len).map(|_| rng.gen_range(0..20) as f64).collect();
            let expected = sorted(&data);
            for &k in &[0, 1, len / 3, len / 2, len - 2, len - 1] {
                let mut work = data.clone();
                assert_eq!(select(&mut work, k), Ok(expected[k]));
                check_partition(&work, k);
            }
        }
    }

    #[test]
    fn select_rejects_bad_input() {
        assert!(select(&mut [], 0).is_err());
        assert!(select(&mut [1.0, 2.0], 2).is_err());
        assert!(select(&mut [1.0, ::std::f64::NAN], 0).is_err());
    }

    #[test]
    fn medians() {
        assert_eq!(median(&[5.0, 1.0, 3.0]), Ok(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
        assert_eq!(median(&[2.0, 2.0, 2.0, 7.0]), Ok(2.0));
        assert_eq!(median(&[1.0]), Ok(1.0));
        assert!(median(&[]).is_err());
    }

    #[test]
    fn quantiles() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&data, 0.0), Ok(1.0));
        assert_eq!(quantile(&data, 1.0), Ok(5.0));
        assert_eq!(quantile(&data, 0.5), Ok(3.0));
        assert_eq!(quantile(&data, 0.25), Ok(2.0));
        assert_close!(abs=1e-14, quantile(&[4.0, 1.0, 3.0, 2.0], 0.1).unwrap(), 1.3);
        assert!(quantile(&data, 1.5).is_err());
        assert!(quantile(&data, -0.1).is_err());
    }

    #[test]
    fn quantile_matches_sorting() {
        let mut rng = StdRng::seed_from_u64(3);
        let data: Vec<f64> = (0..1001).map(|_| rng.gen::<f64>()).collect();
        let s = sorted(&data);
        let h = 1000.0 * 0.37;
        let lo = h as usize;
        let expected = s[lo] + (h - lo as f64) * (s[lo + 1] - s[lo]);
        assert_close!(abs=1e-15, quantile(&data, 0.37).unwrap(), expected);
    }
}
