use ndarray::{Array, Array1, Ix1};

use crate::disc::basis::BasisError;

pub mod dunavant_points;
pub mod legendre_points;

pub struct GaussPoints1d {
    pub points: Array<f64, Ix1>,
    pub weights: Array<f64, Ix1>,
}
impl GaussPoints1d {
    pub fn new(points_num: usize) -> Result<Self, BasisError> {
        let (points, weights) = legendre_points::get_legendre_points_interval(points_num)?;
        Ok(Self { points, weights })
    }
}
/// Cubature on the reference triangle with vertices (0,0), (1,0), (0,1).
/// Weights sum to the reference area 1/2.
pub struct TriangleCubature {
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub weights: Array1<f64>,
}
impl TriangleCubature {
    pub fn new(degree: usize) -> Result<Self, BasisError> {
        let (r, s, weights) = dunavant_points::get_dunavant_points(degree)?;
        Ok(Self { r, s, weights })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_legendre_weights_sum_to_interval_length() {
        for n in 1..=6 {
            let gp = GaussPoints1d::new(n).unwrap();
            assert_eq!(gp.points.len(), n);
            assert_relative_eq!(gp.weights.sum(), 2.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_legendre_integrates_odd_degree_exactly() {
        // n points integrate degree 2n - 1
        for n in 1..=6 {
            let gp = GaussPoints1d::new(n).unwrap();
            let deg = 2 * n - 2;
            let integral: f64 = gp
                .points
                .iter()
                .zip(gp.weights.iter())
                .map(|(&x, &w)| w * x.powi(deg as i32))
                .sum();
            assert_relative_eq!(integral, 2.0 / (deg as f64 + 1.0), epsilon = 1e-13);
        }
    }

    #[test]
    fn test_unsupported_quadrature() {
        assert!(GaussPoints1d::new(7).is_err());
        assert!(TriangleCubature::new(9).is_err());
    }

    #[test]
    fn test_cubature_integrates_monomials() {
        // integral of r^p s^q over the reference triangle is p! q! / (p + q + 2)!
        fn factorial(n: usize) -> f64 {
            (1..=n).map(|k| k as f64).product()
        }
        for degree in [1, 2, 4, 5, 6, 8] {
            let cub = TriangleCubature::new(degree).unwrap();
            assert_relative_eq!(cub.weights.sum(), 0.5, epsilon = 1e-12);
            for p in 0..=degree {
                for q in 0..=(degree - p) {
                    let integral: f64 = (0..cub.weights.len())
                        .map(|j| cub.weights[j] * cub.r[j].powi(p as i32) * cub.s[j].powi(q as i32))
                        .sum();
                    let exact = factorial(p) * factorial(q) / factorial(p + q + 2);
                    assert_relative_eq!(integral, exact, epsilon = 1e-11);
                }
            }
        }
    }
}
