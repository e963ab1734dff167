use ::portmat::linalg::{self, Matrix, SvdSettings};

#[allow(unused)]
pub fn init_logger() {
    let _ = ::env_logger::try_init();
}

/// `A⁺·b`, with singular values below `1e-10·σ_max` treated as zero.
#[allow(unused)]
pub fn pseudo_inverse_solve(a: &Matrix, b: &Matrix) -> Matrix {
    let tall = a.num_rows() >= a.num_cols();
    let svd = match tall {
        true => linalg::svd_decomposition(a, &SvdSettings::default()).unwrap(),
        false => linalg::svd_decomposition(&a.transpose(), &SvdSettings::default()).unwrap(),
    };
    // for a wide A, A = V·S·Uᵗ
    let (u, v) = match tall {
        true => (&svd.u, &svd.v),
        false => (&svd.v, &svd.u),
    };
    let sigma = svd.singular_values();
    let cutoff = 1e-10 * sigma[0];
    let s_inv = Matrix::from_diagonal_values(
        &sigma.iter().map(|&s| if s > cutoff { 1.0 / s } else { 0.0 }).collect::<Vec<_>>()
    );
    let utb = linalg::txy(u, b).unwrap();
    linalg::xy(v, &linalg::xy(&s_inv, &utb).unwrap()).unwrap()
}

#[allow(unused)]
pub fn reconstruct_svd(svd: &linalg::Svd) -> Matrix {
    linalg::xy(&linalg::xy(&svd.u, &svd.s).unwrap(), &svd.v.transpose()).unwrap()
}
