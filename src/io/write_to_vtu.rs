use std::path::PathBuf;

use ndarray::Array2;
use vtkio::{
    Vtk,
    model::{
        Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType,
        IOBuffer, UnstructuredGridPiece, Version, VertexNumbers,
    },
};

use super::{OutputError, output_dir};
use crate::disc::{
    euler2d::Disc2dEuler,
    modal_field::{ModalField, Quantity},
};

fn scalar_array(name: &str, data: IOBuffer) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.to_string(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data,
    })
}

/// Writes density, velocity, energy and pressure at the element vertices.
///
/// Every element owns its three points so the discontinuities between
/// elements are kept.
pub fn write_vertex_solution(
    name: &str,
    solution: &ModalField,
    disc: &Disc2dEuler<'_>,
    current_step: usize,
) -> Result<PathBuf, OutputError> {
    let mesh = disc.mesh;
    let hcr = disc.hcr();
    let rho = disc.reconstruct_at_vertices(solution, Quantity::Density);
    let energy = disc.reconstruct_at_vertices(solution, Quantity::Energy);
    let (u, v) = disc.reconstruct_velocity_at_vertices(solution);

    let point_num = 3 * mesh.elem_num;
    let mut vtk_points = Vec::with_capacity(3 * point_num);
    let mut pressure = Vec::with_capacity(point_num);
    for (ielem, element) in mesh.elements.iter().enumerate() {
        for (vertex, &inode) in element.inodes.iter().enumerate() {
            let node = mesh.nodes[inode];
            vtk_points.extend([node.x, node.y, 0.0]);
            let (r, uu, vv, e) = (
                rho[[ielem, vertex]],
                u[[ielem, vertex]],
                v[[ielem, vertex]],
                energy[[ielem, vertex]],
            );
            pressure.push((hcr - 1.0) * (e - 0.5 * r * (uu * uu + vv * vv)));
        }
    }
    let connectivity: Vec<u64> = (0..point_num as u64).collect();
    let offsets: Vec<u64> = (1..=mesh.elem_num as u64).map(|i| 3 * i).collect();
    let flatten = |a: Array2<f64>| a.iter().copied().collect::<Vec<f64>>();

    let filename = output_dir()?.join(format!("{name}_{current_step}.vtu"));
    let vtk_file = Vtk {
        version: Version::XML { major: 1, minor: 0 },
        title: "Euler vertex solution".into(),
        byte_order: ByteOrder::native(),
        data: DataSet::inline(UnstructuredGridPiece {
            points: IOBuffer::F64(vtk_points),
            cells: Cells {
                cell_verts: VertexNumbers::XML {
                    connectivity,
                    offsets,
                },
                types: vec![CellType::Triangle; mesh.elem_num],
            },
            data: Attributes {
                point: vec![
                    scalar_array(Quantity::Density.name(), IOBuffer::F64(flatten(rho))),
                    scalar_array("velocity_x", IOBuffer::F64(flatten(u))),
                    scalar_array("velocity_y", IOBuffer::F64(flatten(v))),
                    scalar_array(Quantity::Energy.name(), IOBuffer::F64(flatten(energy))),
                    scalar_array("pressure", IOBuffer::F64(pressure)),
                ],
                cell: vec![scalar_array(
                    "element_id",
                    IOBuffer::U64((0..mesh.elem_num as u64).collect()),
                )],
            },
        }),
        file_path: None,
    };
    vtk_file
        .export(&filename)
        .map_err(|e| OutputError::Vtk(format!("{e:?}")))?;
    Ok(filename)
}
