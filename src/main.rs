use std::{error::Error, process::ExitCode};

use euler_dg_2d::{
    disc::euler2d::Disc2dEuler,
    initialization::{
        initialize_basis, initialize_mesh, initialize_params_by_file, initialize_vortex,
    },
    solver::Solver,
};

fn run() -> Result<(), Box<dyn Error>> {
    let (flow_params, solver_params, mesh_params) =
        initialize_params_by_file("inputs/solverparam.json")?;
    let basis = initialize_basis(solver_params.polynomial_order)?;
    let mesh = initialize_mesh(&mesh_params)?;
    let vortex = initialize_vortex(&flow_params, &mesh_params);
    let disc = Disc2dEuler::new(basis, &mesh, &flow_params, &vortex);
    let mut solver = Solver::new(disc, &solver_params);
    solver.solve()?;
    solver.write_output()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
