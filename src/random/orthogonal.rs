/* ************************************************************************ **
** This file is part of portmat, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::normal::normrnd_matrix;

use ::portmat_linalg::{qr_decomposition, Matrix, Result};
use ::rand::Rng;

/// A random `n x n` orthogonal matrix, distributed according to the Haar measure.
///
/// The `Q` factor of a Gaussian matrix is only Haar distributed once the signs
/// of its columns are fixed by the diagonal of `R`.
pub fn random_orthogonal<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Matrix> {
    let gaussian = normrnd_matrix(n, n, rng);
    let (mut q, r) = qr_decomposition(&gaussian)?.into_parts();
    let signs: Vec<f64> = (0..n).map(|i| if r[(i, i)] >= 0.0 { 1.0 } else { -1.0 }).collect();
    q.elem_map_mut(|x, _, j| x * signs[j]);
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::portmat_linalg::{txy, xy};
    use ::rand::rngs::StdRng;
    use ::rand::SeedableRng;

    #[test]
    fn is_orthogonal() {
        let mut rng = StdRng::seed_from_u64(17);
        for &n in &[1, 2, 5, 12] {
            let q = random_orthogonal(n, &mut rng).unwrap();
            assert_close!(abs=1e-13, txy(&q, &q).unwrap(), Matrix::identity(n));
            assert_close!(abs=1e-13, xy(&q, &q.transpose()).unwrap(), Matrix::identity(n));
        }
    }

    #[test]
    fn reproducible_with_seed() {
        let a = random_orthogonal(4, &mut StdRng::seed_from_u64(2)).unwrap();
        let b = random_orthogonal(4, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_eq!(a, b);
    }
}
