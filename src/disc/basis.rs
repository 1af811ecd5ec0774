use ndarray::{Array1, Array2, ArrayView1};
use statrs::function::gamma::gamma;
use thiserror::Error;

pub mod triangle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasisError {
    #[error(
        "polynomial order {0} is not supported (maximum is {max})",
        max = triangle::MAX_POLYNOMIAL_ORDER
    )]
    UnsupportedOrder(usize),
    #[error("no Gauss-Legendre rule with {0} points")]
    UnsupportedLineQuadrature(usize),
    #[error("no triangle cubature rule of degree {0}")]
    UnsupportedCubature(usize),
}

// Orthonormal Jacobi polynomials and the Dubiner simplex basis on the
// bi-unit triangle (-1,-1), (1,-1), (-1,1).
pub trait Basis {
    fn jacobi_polynomial(x: ArrayView1<f64>, alpha: f64, beta: f64, n: i32) -> Array1<f64> {
        let gamma0 = 2.0_f64.powf(alpha + beta + 1.0) / (alpha + beta + 1.0)
            * gamma(alpha + 1.0)
            * gamma(beta + 1.0)
            / gamma(alpha + beta + 1.0);
        let p0 = Array1::from_elem(x.len(), 1.0 / gamma0.sqrt());
        if n == 0 {
            return p0;
        }
        let gamma1 = (alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0) * gamma0;
        let p1 = ((alpha + beta + 2.0) * &x * 0.5 + (alpha - beta) * 0.5) / gamma1.sqrt();
        if n == 1 {
            return p1;
        }
        // P_{i+1} = ((x - b_i) P_i - a_i P_{i-1}) / a_{i+1}
        let mut a_old = 2.0 / (2.0 + alpha + beta)
            * ((alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0)).sqrt();
        let mut p_prev = p0;
        let mut p_curr = p1;
        for i in 1..n {
            let i_f = i as f64;
            let h1 = 2.0 * i_f + alpha + beta;
            let a_new = 2.0 / (h1 + 2.0)
                * ((i_f + 1.0)
                    * (i_f + 1.0 + alpha + beta)
                    * (i_f + 1.0 + alpha)
                    * (i_f + 1.0 + beta)
                    / (h1 + 1.0)
                    / (h1 + 3.0))
                    .sqrt();
            let b_new = -(alpha.powi(2) - beta.powi(2)) / h1 / (h1 + 2.0);
            let p_next = ((&x - b_new) * &p_curr - &(a_old * &p_prev)) / a_new;
            p_prev = p_curr;
            p_curr = p_next;
            a_old = a_new;
        }
        p_curr
    }
    fn grad_jacobi_polynomial(x: ArrayView1<f64>, alpha: f64, beta: f64, n: i32) -> Array1<f64> {
        match n {
            0 => Array1::zeros(x.len()),
            _ => {
                let pn = Self::jacobi_polynomial(x, alpha + 1.0, beta + 1.0, n - 1);
                let n = n as f64;
                (n * (n + alpha + beta + 1.0)).sqrt() * pn
            }
        }
    }
    fn rs_to_ab(r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let a = r
            .iter()
            .zip(s.iter())
            .map(|(&r_val, &s_val)| {
                if (1.0 - s_val).abs() > 1.0e-14 {
                    2.0 * (1.0 + r_val) / (1.0 - s_val) - 1.0
                } else {
                    -1.0
                }
            })
            .collect::<Array1<f64>>();
        let b = s.to_owned();
        (a, b)
    }
    fn dubiner_basis(a: ArrayView1<f64>, b: ArrayView1<f64>, i: i32, j: i32) -> Array1<f64> {
        let h1 = Self::jacobi_polynomial(a, 0.0, 0.0, i);
        let h2 = Self::jacobi_polynomial(b, 2.0 * i as f64 + 1.0, 0.0, j);
        2.0_f64.sqrt() * &h1 * &h2 * &b.mapv(|b_val| (1.0 - b_val).powi(i))
    }
    fn grad_simplex_2d(
        a: ArrayView1<f64>,
        b: ArrayView1<f64>,
        id: i32,
        jd: i32,
    ) -> (Array1<f64>, Array1<f64>) {
        let fa = Self::jacobi_polynomial(a, 0.0, 0.0, id);
        let gb = Self::jacobi_polynomial(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let dfa = Self::grad_jacobi_polynomial(a, 0.0, 0.0, id);
        let dgb = Self::grad_jacobi_polynomial(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let half_one_minus_b = b.mapv(|b_val| 0.5 * (1.0 - b_val));
        let half_one_plus_a = a.mapv(|a_val| 0.5 * (1.0 + a_val));

        let mut dmode_dr = &dfa * &gb;
        let mut dmode_ds = &dfa * &(&gb * &half_one_plus_a);
        if id > 0 {
            let scale = half_one_minus_b.mapv(|v| v.powi(id - 1));
            dmode_dr = dmode_dr * &scale;
            dmode_ds = dmode_ds * &scale;
        }
        let mut tmp = &dgb * &half_one_minus_b.mapv(|v| v.powi(id));
        if id > 0 {
            tmp = tmp - &(0.5 * id as f64 * &gb * &half_one_minus_b.mapv(|v| v.powi(id - 1)));
        }
        dmode_ds = dmode_ds + &(&fa * &tmp);

        let scale = 2.0_f64.powf(id as f64 + 0.5);
        (dmode_dr * scale, dmode_ds * scale)
    }
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64>;
    fn grad_vandermonde_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>);
}
