// Reference triangle: vertex 0 at (0,0), vertex 1 at (1,0), vertex 2 at (0,1).
// Affine map: x = x1 * (1 - r - s) + x2 * r + x3 * s
pub trait Geometric2D {
    fn compute_jacob_det(x: &[f64; 3], y: &[f64; 3]) -> f64 {
        (x[1] - x[0]) * (y[2] - y[0]) - (x[2] - x[0]) * (y[1] - y[0])
    }
    /// Returns `[xr, yr, xs, ys]`.
    fn compute_partials(x: &[f64; 3], y: &[f64; 3]) -> [f64; 4] {
        [x[1] - x[0], y[1] - y[0], x[2] - x[0], y[2] - y[0]]
    }
    fn compute_edge_length(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
        ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
    }
    /// Diameter of the inscribed circle (Heron's formula).
    fn compute_inscribed_diameter(x: &[f64; 3], y: &[f64; 3]) -> f64 {
        let a = Self::compute_edge_length(x[0], y[0], x[1], y[1]);
        let b = Self::compute_edge_length(x[1], y[1], x[2], y[2]);
        let c = Self::compute_edge_length(x[0], y[0], x[2], y[2]);
        let k = 0.5 * (a + b + c);
        2.0 * (k * (k - a) * (k - b) * (k - c)).sqrt() / k
    }
    fn compute_normal(x0: f64, y0: f64, x1: f64, y1: f64) -> [f64; 2] {
        // normalized normal vector
        let normal = [y0 - y1, x1 - x0];
        let normal_magnitude = (normal[0].powi(2) + normal[1].powi(2)).sqrt();
        [normal[0] / normal_magnitude, normal[1] / normal_magnitude]
    }
    /// Flips `normal` if it points from the edge midpoint towards the opposite vertex.
    fn orient_normal(normal: [f64; 2], midpoint: [f64; 2], opposite: [f64; 2]) -> [f64; 2] {
        let inward = [opposite[0] - midpoint[0], opposite[1] - midpoint[1]];
        let dot = normal[0] * inward[0] + normal[1] * inward[1];
        if dot > 0.0 {
            [-normal[0], -normal[1]]
        } else {
            normal
        }
    }
    fn map_to_physical(r: f64, s: f64, x: &[f64; 3], y: &[f64; 3]) -> [f64; 2] {
        [
            x[1] * r + x[2] * s + x[0] * (1.0 - r - s),
            y[1] * r + y[2] * s + y[0] * (1.0 - r - s),
        ]
    }
    /// Reference coordinates of the edge point with parameter `xi` in [-1, 1].
    /// Every local edge is traversed counterclockwise.
    fn compute_ref_edge_point(local_id: usize, xi: f64) -> (f64, f64) {
        match local_id {
            // bottom edge: (0,0) -> (1,0)
            0 => (0.5 * (1.0 + xi), 0.0),
            // hypotenuse: (1,0) -> (0,1)
            1 => (0.5 * (1.0 - xi), 0.5 * (1.0 + xi)),
            // left edge: (0,1) -> (0,0)
            2 => (0.0, 0.5 * (1.0 - xi)),
            _ => {
                panic!("Invalid edge ID");
            }
        }
    }
}
