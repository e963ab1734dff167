/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Normal deviates by inversion.

use ::portmat_linalg::{Matrix, MatrixError, Result};
use ::rand::distributions::Open01;
use ::rand::Rng;

// Wichura, Algorithm AS 241 (PPND16), Appl. Statist. 37 (1988).
const CENTRAL_NUM: [f64; 8] = [
    3.387132872796366608,
    133.14166789178437745,
    1971.5909503065514427,
    13731.693765509461125,
    45921.953931549871457,
    67265.770927008700853,
    33430.575583588128105,
    2509.0809287301226727,
];
const CENTRAL_DEN: [f64; 8] = [
    1.0,
    42.313330701600911252,
    687.1870074920579083,
    5394.1960214247511077,
    21213.794301586595867,
    39307.89580009271061,
    28729.085735721942674,
    5226.495278852545925,
];
const INTERMEDIATE_NUM: [f64; 8] = [
    1.42343711074968357734,
    4.6303378461565452959,
    5.7694972214606914055,
    3.64784832476320460504,
    1.27045825245236838258,
    0.24178072517745061177,
    0.0227238449892691845833,
    7.7454501427834140764e-4,
];
const INTERMEDIATE_DEN: [f64; 8] = [
    1.0,
    2.05319162663775882187,
    1.6763848301838038494,
    0.68976733498510000455,
    0.14810397642748007459,
    0.0151986665636164571966,
    5.475938084995344946e-4,
    1.05075007164441684324e-9,
];
const TAIL_NUM: [f64; 8] = [
    6.6579046435011037772,
    5.4637849111641143699,
    1.7848265399172913358,
    0.29656057182850489123,
    0.026532189526576123093,
    0.0012426609473880784386,
    2.71155556874348757815e-5,
    2.01033439929228813265e-7,
];
const TAIL_DEN: [f64; 8] = [
    1.0,
    0.59983220655588793769,
    0.13692988092273580531,
    0.0148753612908506148525,
    7.868691311456132591e-4,
    1.8463183175100546818e-5,
    1.4215117583164458887e-7,
    2.04426310338993978564e-15,
];

fn horner(coeffs: &[f64; 8], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

fn rational(num: &[f64; 8], den: &[f64; 8], x: f64) -> f64 {
    horner(num, x) / horner(den, x)
}

/// Inverse of the standard normal CDF.
///
/// Relative accuracy is about `1e-16` over the whole range. `norminv(0)` and
/// `norminv(1)` are `-inf` and `+inf`.
pub fn norminv(p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(MatrixError::invalid_argument(format!("probability {} outside of [0, 1]", p)));
    }
    if p == 0.0 {
        return Ok(::std::f64::NEG_INFINITY);
    }
    if p == 1.0 {
        return Ok(::std::f64::INFINITY);
    }

    let q = p - 0.5;
    if q.abs() <= 0.425 {
        let r = 0.180625 - q * q;
        return Ok(q * rational(&CENTRAL_NUM, &CENTRAL_DEN, r));
    }

    let tail = if q < 0.0 { p } else { 1.0 - p };
    let r = (-tail.ln()).sqrt();
    let value = match r <= 5.0 {
        true => rational(&INTERMEDIATE_NUM, &INTERMEDIATE_DEN, r - 1.6),
        false => rational(&TAIL_NUM, &TAIL_DEN, r - 5.0),
    };
    Ok(if q < 0.0 { -value } else { value })
}

/// A sample of `N(mu, sigma²)`.
pub fn normrnd<R: Rng + ?Sized>(mu: f64, sigma: f64, rng: &mut R) -> f64 {
    mu + sigma * standard_normal(rng)
}

fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u: f64 = rng.sample(Open01);
    // u lies strictly inside (0, 1)
    norminv(u).unwrap_or(0.0)
}

/// A `rows x cols` matrix of independent `N(0, 1)` samples.
pub fn normrnd_matrix<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
    Matrix::fill(rows, cols, |_, _| standard_normal(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::rngs::StdRng;
    use ::rand::SeedableRng;

    #[test]
    fn known_quantiles() {
        assert_eq!(norminv(0.5), Ok(0.0));
        assert_close!(abs=1e-15, norminv(0.975).unwrap(), 1.959963984540054);
        assert_close!(rel=1e-15, norminv(0.001).unwrap(), -3.090232306167813);
        assert_close!(rel=1e-15, norminv(1e-10).unwrap(), -6.361340902404056);
        assert_close!(rel=1e-15, norminv(1e-300).unwrap(), -37.0470962993612);
        assert_close!(rel=1e-15, norminv(0.8).unwrap(), 0.8416212335729144);
    }

    #[test]
    fn symmetric_about_one_half() {
        for &p in &[0.01, 0.2, 0.4, 0.45] {
            assert_close!(abs=1e-14, norminv(p).unwrap(), -norminv(1.0 - p).unwrap());
        }
    }

    #[test]
    fn endpoints_and_domain() {
        assert_eq!(norminv(0.0), Ok(::std::f64::NEG_INFINITY));
        assert_eq!(norminv(1.0), Ok(::std::f64::INFINITY));
        assert!(norminv(-0.1).is_err());
        assert!(norminv(1.1).is_err());
        assert!(norminv(::std::f64::NAN).is_err());
    }

    #[test]
    fn sample_moments() {
        crate::init_logger();
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let xs: Vec<f64> = (0..n).map(|_| normrnd(2.0, 3.0, &mut rng)).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert_close!(abs=0.1, mean, 2.0);
        assert_close!(abs=0.5, var, 9.0);

        let m = normrnd_matrix(3, 4, &mut rng);
        assert_eq!(m.dims(), (3, 4));
    }
}
