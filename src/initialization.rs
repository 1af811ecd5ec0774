use std::path::Path;

use crate::{
    disc::{
        basis::{BasisError, triangle::TriangleBasis},
        euler2d::exact_solution::SupersonicVortex,
        mesh::mesh2d::{Mesh2d, MeshError},
    },
    io::param_parser::{ParamError, SolverParamParser},
    solver::{FlowParameters, MeshParameters, SolverParameters},
};

pub fn initialize_params_by_file(
    file_path: impl AsRef<Path>,
) -> Result<(FlowParameters, SolverParameters, MeshParameters), ParamError> {
    let parser = SolverParamParser::parse(file_path)?;
    Ok(initialize_params(&parser))
}
pub fn initialize_params(
    parser: &SolverParamParser,
) -> (FlowParameters, SolverParameters, MeshParameters) {
    let flow_params = FlowParameters {
        hcr: parser.hcr,
        mach: parser.mach,
    };
    let solver_params = SolverParameters {
        cfl: parser.cfl,
        final_time: parser.final_time,
        final_step: parser.final_step,
        polynomial_order: parser.polynomial_order,
        output_interval: parser.output_interval,
    };
    let mesh_params = MeshParameters {
        r_inner: parser.r_inner,
        r_outer: parser.r_outer,
        radial_num: parser.radial_num,
        angular_num: parser.angular_num,
    };
    (flow_params, solver_params, mesh_params)
}
pub fn initialize_basis(polynomial_order: usize) -> Result<TriangleBasis, BasisError> {
    TriangleBasis::new(polynomial_order)
}
pub fn initialize_mesh(mesh_params: &MeshParameters) -> Result<Mesh2d, MeshError> {
    let mesh = Mesh2d::create_annulus_mesh(
        mesh_params.r_inner,
        mesh_params.r_outer,
        mesh_params.radial_num,
        mesh_params.angular_num,
    )?;
    log::info!(
        "quarter annulus mesh: {} nodes, {} elements, {} sides ({} on the boundary), area {:.6}",
        mesh.node_num,
        mesh.elem_num,
        mesh.edge_num,
        mesh.boundary_edges.len(),
        mesh.total_area()
    );
    Ok(mesh)
}
pub fn initialize_vortex(
    flow_params: &FlowParameters,
    mesh_params: &MeshParameters,
) -> SupersonicVortex {
    SupersonicVortex {
        hcr: flow_params.hcr,
        mach: flow_params.mach,
        r_inner: mesh_params.r_inner,
    }
}
