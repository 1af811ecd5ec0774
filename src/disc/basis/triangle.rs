use ndarray::{Array1, Array2, Array3, ArrayView1, array, s};

use crate::disc::{
    basis::{Basis, BasisError},
    gauss_points::{GaussPoints1d, TriangleCubature},
    geometric::Geometric2D,
};

pub const MAX_POLYNOMIAL_ORDER: usize = 4;
/// Degree of the rule used for error norms, independent of `n`.
pub const ERROR_CUBATURE_DEGREE: usize = 8;

/// Modal basis tables on the reference triangle (0,0), (1,0), (0,1).
///
/// The basis is the Dubiner basis scaled so that it is orthonormal on the
/// reference triangle, i.e. the reference mass matrix is the identity and the
/// physical one is `jacob_det * I`. Modes are ordered `(i, j)` with `i` outer.
///
/// Layout of the tables:
/// - `phis_cub[[mode, q]]` basis values at the cubature points
/// - `dphis_dr_cub[[mode, q]]`, `dphis_ds_cub[[mode, q]]` reference gradients
///   premultiplied by the cubature weights
/// - `phis_edge[[local_edge, mode, q]]` values at the Gauss points of each edge,
///   with every edge traversed counterclockwise
/// - `phis_vertex[[mode, vertex]]` values at the three vertices
/// - `phis_err[[mode, q]]` values at the points of the error rule
#[derive(Clone, Debug)]
pub struct TriangleBasis {
    pub n: usize,
    pub basis_num: usize,
    pub cub_r: Array1<f64>,
    pub cub_s: Array1<f64>,
    pub cub_w: Array1<f64>,
    pub phis_cub: Array2<f64>,
    pub dphis_dr_cub: Array2<f64>,
    pub dphis_ds_cub: Array2<f64>,
    pub quad_p: Array1<f64>,
    pub quad_w: Array1<f64>,
    pub phis_edge: Array3<f64>,
    pub phis_vertex: Array2<f64>,
    pub err_r: Array1<f64>,
    pub err_s: Array1<f64>,
    pub err_w: Array1<f64>,
    pub phis_err: Array2<f64>,
    // value of the constant mode; the cell average is `c0 * phi0`
    pub phi0: f64,
}
impl Geometric2D for TriangleBasis {}
impl TriangleBasis {
    pub fn new(n: usize) -> Result<Self, BasisError> {
        if n > MAX_POLYNOMIAL_ORDER {
            return Err(BasisError::UnsupportedOrder(n));
        }
        let basis_num = (n + 1) * (n + 2) / 2;
        let cubature = TriangleCubature::new(Self::cubature_degree(n))?;
        let line = GaussPoints1d::new(n + 1)?;

        let (phis_cub, dphis_dr, dphis_ds) =
            Self::evaluate_with_gradients(n, cubature.r.view(), cubature.s.view());
        let dphis_dr_cub = dphis_dr * &cubature.weights;
        let dphis_ds_cub = dphis_ds * &cubature.weights;

        let edge_quad_num = line.points.len();
        let mut phis_edge = Array3::<f64>::zeros((3, basis_num, edge_quad_num));
        for local_id in 0..3 {
            let (edge_r, edge_s): (Vec<f64>, Vec<f64>) = line
                .points
                .iter()
                .map(|&xi| Self::compute_ref_edge_point(local_id, xi))
                .unzip();
            let phis = Self::evaluate(
                n,
                Array1::from(edge_r).view(),
                Array1::from(edge_s).view(),
            );
            phis_edge.slice_mut(s![local_id, .., ..]).assign(&phis);
        }

        let vertex_r = array![0.0, 1.0, 0.0];
        let vertex_s = array![0.0, 0.0, 1.0];
        let phis_vertex = Self::evaluate(n, vertex_r.view(), vertex_s.view());
        let phi0 = phis_vertex[[0, 0]];

        let err_rule = TriangleCubature::new(ERROR_CUBATURE_DEGREE)?;
        let phis_err = Self::evaluate(n, err_rule.r.view(), err_rule.s.view());

        Ok(Self {
            n,
            basis_num,
            cub_r: cubature.r,
            cub_s: cubature.s,
            cub_w: cubature.weights,
            phis_cub,
            dphis_dr_cub,
            dphis_ds_cub,
            quad_p: line.points,
            quad_w: line.weights,
            phis_edge,
            phis_vertex,
            err_r: err_rule.r,
            err_s: err_rule.s,
            err_w: err_rule.weights,
            phis_err,
            phi0,
        })
    }
    /// Volume rule exact for products of two order-`n` polynomials.
    pub fn cubature_degree(n: usize) -> usize {
        (2 * n).max(1)
    }
    pub fn cub_num(&self) -> usize {
        self.cub_w.len()
    }
    pub fn edge_quad_num(&self) -> usize {
        self.quad_w.len()
    }
    pub fn err_num(&self) -> usize {
        self.err_w.len()
    }
    /// Basis values `[mode, point]` at reference points `(r, s)`.
    pub fn evaluate(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let (r_bi, s_bi) = Self::to_biunit(r, s);
        // the bi-unit basis is orthonormal over area 2, the reference triangle has area 1/2
        2.0 * Self::vandermonde2d(n, r_bi.view(), s_bi.view()).reversed_axes()
    }
    /// Basis values and reference gradients `[mode, point]` at `(r, s)`.
    pub fn evaluate_with_gradients(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>, Array2<f64>) {
        let (r_bi, s_bi) = Self::to_biunit(r, s);
        let phis = 2.0 * Self::vandermonde2d(n, r_bi.view(), s_bi.view()).reversed_axes();
        let (vr, vs) = Self::grad_vandermonde_2d(n, r_bi.view(), s_bi.view());
        // chain rule through r_bi = 2r - 1 on top of the factor 2
        (phis, 4.0 * vr.reversed_axes(), 4.0 * vs.reversed_axes())
    }
    fn to_biunit(r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        (r.mapv(|v| 2.0 * v - 1.0), s.mapv(|v| 2.0 * v - 1.0))
    }
}

impl Basis for TriangleBasis {
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let mut v = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let (a, b) = Self::rs_to_ab(r, s);
        let mut sk: usize = 0;
        for i in 0..n + 1 {
            for j in 0..n + 1 - i {
                v.column_mut(sk).assign(&Self::dubiner_basis(
                    a.view(),
                    b.view(),
                    i as i32,
                    j as i32,
                ));
                sk += 1;
            }
        }
        v
    }
    fn grad_vandermonde_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let mut v2dr = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let mut v2ds = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let (a, b) = Self::rs_to_ab(r, s);
        let mut sk: usize = 0;
        for i in 0..n + 1 {
            for j in 0..n + 1 - i {
                let (v2dr_col, v2ds_col) =
                    Self::grad_simplex_2d(a.view(), b.view(), i as i32, j as i32);
                v2dr.column_mut(sk).assign(&v2dr_col);
                v2ds.column_mut(sk).assign(&v2ds_col);
                sk += 1;
            }
        }
        (v2dr, v2ds)
    }
}
