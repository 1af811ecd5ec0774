//! Symmetric (Dunavant) cubature rules on the reference triangle
//! `{(r, s) : r >= 0, s >= 0, r + s <= 1}`.
//!
//! Rules are stored as barycentric orbits and expanded into points. The
//! tabulated weights sum to one and are scaled by the reference area (1/2)
//! on expansion.
//!
//! Tables from D. A. Dunavant, "High degree efficient symmetrical Gaussian
//! quadrature rules for the triangle", Int. J. Numer. Meth. Eng. 21 (1985).

use ndarray::Array1;

use crate::disc::basis::BasisError;

enum Orbit {
    Centroid(f64),
    // barycentric (a, a, 1 - 2a)
    Three(f64, f64),
    // barycentric (a, b, 1 - a - b), all six permutations
    Six(f64, f64, f64),
}

fn orbits(degree: usize) -> Result<Vec<Orbit>, BasisError> {
    let orbits = match degree {
        1 => vec![Orbit::Centroid(1.0)],
        2 => vec![Orbit::Three(1.0 / 6.0, 1.0 / 3.0)],
        3 | 4 => vec![
            Orbit::Three(0.445948490915965, 0.223381589678011),
            Orbit::Three(0.091576213509771, 0.109951743655322),
        ],
        5 => vec![
            Orbit::Centroid(0.225),
            Orbit::Three(0.470142064105115, 0.132394152788506),
            Orbit::Three(0.101286507323456, 0.125939180544827),
        ],
        6 => vec![
            Orbit::Three(0.249286745170910, 0.116786275726379),
            Orbit::Three(0.063089014491502, 0.050844906370207),
            Orbit::Six(0.053145049844817, 0.310352451033784, 0.082851075618374),
        ],
        7 | 8 => vec![
            Orbit::Centroid(0.144315607677787),
            Orbit::Three(0.459292588292723, 0.095091634267285),
            Orbit::Three(0.170569307751760, 0.103217370534718),
            Orbit::Three(0.050547228317031, 0.032458497623198),
            Orbit::Six(0.008394777409958, 0.263112829634638, 0.027230314174435),
        ],
        _ => return Err(BasisError::UnsupportedCubature(degree)),
    };
    Ok(orbits)
}

pub fn get_dunavant_points(
    degree: usize,
) -> Result<(Array1<f64>, Array1<f64>, Array1<f64>), BasisError> {
    let mut r = Vec::new();
    let mut s = Vec::new();
    let mut w = Vec::new();
    for orbit in orbits(degree)? {
        match orbit {
            Orbit::Centroid(weight) => {
                r.push(1.0 / 3.0);
                s.push(1.0 / 3.0);
                w.push(weight);
            }
            Orbit::Three(a, weight) => {
                let b = 1.0 - 2.0 * a;
                for (ri, si) in [(a, a), (a, b), (b, a)] {
                    r.push(ri);
                    s.push(si);
                    w.push(weight);
                }
            }
            Orbit::Six(a, b, weight) => {
                let c = 1.0 - a - b;
                for (ri, si) in [(a, b), (b, a), (a, c), (c, a), (b, c), (c, b)] {
                    r.push(ri);
                    s.push(si);
                    w.push(weight);
                }
            }
        }
    }
    let w = Array1::from(w) * 0.5;
    Ok((Array1::from(r), Array1::from(s), w))
}
