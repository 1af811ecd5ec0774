pub mod basis;
pub mod boundary;
pub mod diagnostics;
pub mod euler2d;
pub mod gauss_points;
pub mod geometric;
pub mod mesh;
pub mod modal_field;
