use std::path::PathBuf;

use csv::Writer;
use serde::Serialize;

use super::{OutputError, output_dir};
use crate::disc::{
    euler2d::Disc2dEuler,
    modal_field::{ModalField, Quantity},
};

#[derive(Serialize)]
struct VertexData {
    element: usize,
    vertex: usize,
    x: f64,
    y: f64,
    value: f64,
}

/// One row per element vertex with the reconstructed value of `quantity`.
pub fn write_vertex_values(
    name: &str,
    solution: &ModalField,
    disc: &Disc2dEuler<'_>,
    quantity: Quantity,
) -> Result<PathBuf, OutputError> {
    let path = output_dir()?.join(format!("{name}.csv"));
    let values = disc.reconstruct_at_vertices(solution, quantity);
    let mut writer = Writer::from_path(&path)?;
    for (ielem, element) in disc.mesh.elements.iter().enumerate() {
        for (vertex, &inode) in element.inodes.iter().enumerate() {
            let node = disc.mesh.nodes[inode];
            writer.serialize(VertexData {
                element: ielem,
                vertex,
                x: node.x,
                y: node.y,
                value: values[[ielem, vertex]],
            })?;
        }
    }
    writer.flush()?;
    Ok(path)
}
