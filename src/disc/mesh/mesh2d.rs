use std::f64::consts::FRAC_PI_2;

use hashbrown::HashMap;
use thiserror::Error;

use crate::disc::{
    boundary::{BoundaryPosition, BoundaryType},
    geometric::Geometric2D,
};

#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("element {0} has a (near) zero Jacobian determinant")]
    DegenerateElement(usize),
    #[error("element {0} is ordered clockwise")]
    ClockwiseElement(usize),
    #[error("side {0} has zero length")]
    ZeroLengthEdge(usize),
    #[error("boundary side ({0}, {1}) has no boundary type")]
    UnlabeledBoundaryEdge(usize, usize),
    #[error("side ({0}, {1}) is shared by more than two elements")]
    NonManifoldEdge(usize, usize),
    #[error("invalid boundary sentinel {0}")]
    InvalidSentinel(i64),
    #[error("node index {0} out of range")]
    InvalidNodeIndex(usize),
    #[error("element index {0} out of range")]
    InvalidElementIndex(i64),
    #[error("side {side} has local side id {local_id}, expected 0, 1 or 2")]
    InvalidLocalId { side: usize, local_id: usize },
    #[error("side {0} does not join the vertices of its local side")]
    SideNodeMismatch(usize),
    #[error("local side {local_id} of element {elem} is claimed by more than one side")]
    DuplicateSide { elem: usize, local_id: usize },
    #[error("local side {local_id} of element {elem} has no side")]
    MissingSide { elem: usize, local_id: usize },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeNeighbor {
    Element { ielem: usize, local_id: usize },
    Boundary(BoundaryType),
}
#[derive(Clone, Debug)]
pub struct Edge {
    pub inodes: [usize; 2],
    pub left: usize,
    pub left_local_id: usize,
    pub right: EdgeNeighbor,
    pub length: f64,
    // unit normal pointing out of the left element
    pub normal: [f64; 2],
}
#[derive(Clone, Debug)]
pub struct TriangleElement {
    pub inodes: [usize; 3],
    pub iedges: [usize; 3],
    pub jacob_det: f64,
    pub xr: f64,
    pub yr: f64,
    pub xs: f64,
    pub ys: f64,
    pub inscribed_diameter: f64,
}
impl TriangleElement {
    fn new(inodes: [usize; 3]) -> Self {
        Self {
            inodes,
            iedges: [usize::MAX; 3],
            jacob_det: 0.0,
            xr: 0.0,
            yr: 0.0,
            xs: 0.0,
            ys: 0.0,
            inscribed_diameter: 0.0,
        }
    }
}
/// One row of a legacy side table; a negative `right` is a boundary sentinel.
#[derive(Clone, Copy, Debug)]
pub struct SideRecord {
    pub inodes: [usize; 2],
    pub left: usize,
    pub right: i64,
    pub left_local_id: usize,
    pub right_local_id: usize,
}

#[derive(Clone, Debug)]
pub struct Mesh2d {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub elements: Vec<TriangleElement>,
    pub internal_edges: Vec<usize>,
    pub boundary_edges: Vec<usize>,
    pub elem_num: usize,
    pub edge_num: usize,
    pub node_num: usize,
}
impl Geometric2D for Mesh2d {}
impl Mesh2d {
    /// Builds the side topology from triangles and tagged boundary segments.
    ///
    /// Clockwise triangles are reordered. Local side `l` of an element joins
    /// its vertices `l` and `(l + 1) % 3`.
    pub fn from_connectivity(
        nodes: Vec<Node>,
        triangles: &[[usize; 3]],
        boundary_tags: &[([usize; 2], BoundaryType)],
    ) -> Result<Self, MeshError> {
        let node_num = nodes.len();
        let tags: HashMap<(usize, usize), BoundaryType> = boundary_tags
            .iter()
            .map(|&([a, b], bnd)| (sorted_pair(a, b), bnd))
            .collect();

        let mut elements = Vec::with_capacity(triangles.len());
        let mut edges: Vec<Edge> = Vec::new();
        let mut neighbors: Vec<Option<EdgeNeighbor>> = Vec::new();
        let mut edge_map: HashMap<(usize, usize), usize> = HashMap::new();
        for (ielem, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&inode| inode >= node_num) {
                return Err(MeshError::InvalidNodeIndex(bad));
            }
            let mut inodes = *tri;
            let (x, y) = vertex_coords(&nodes, &inodes);
            if Self::compute_jacob_det(&x, &y) < 0.0 {
                inodes.swap(0, 1);
            }
            let mut element = TriangleElement::new(inodes);
            for local_id in 0..3 {
                let n0 = inodes[local_id];
                let n1 = inodes[(local_id + 1) % 3];
                let key = sorted_pair(n0, n1);
                match edge_map.get(&key) {
                    None => {
                        edge_map.insert(key, edges.len());
                        element.iedges[local_id] = edges.len();
                        edges.push(Edge {
                            inodes: [n0, n1],
                            left: ielem,
                            left_local_id: local_id,
                            right: EdgeNeighbor::Boundary(BoundaryType::Reflecting),
                            length: 0.0,
                            normal: [0.0, 0.0],
                        });
                        neighbors.push(None);
                    }
                    Some(&iedge) => {
                        if neighbors[iedge].is_some() {
                            return Err(MeshError::NonManifoldEdge(key.0, key.1));
                        }
                        neighbors[iedge] = Some(EdgeNeighbor::Element { ielem, local_id });
                        element.iedges[local_id] = iedge;
                    }
                }
            }
            elements.push(element);
        }
        for (edge, neighbor) in edges.iter_mut().zip(neighbors) {
            edge.right = match neighbor {
                Some(neighbor) => neighbor,
                None => {
                    let key = sorted_pair(edge.inodes[0], edge.inodes[1]);
                    let bnd = tags
                        .get(&key)
                        .ok_or(MeshError::UnlabeledBoundaryEdge(key.0, key.1))?;
                    EdgeNeighbor::Boundary(*bnd)
                }
            };
        }
        let mut mesh = Self::assemble(nodes, edges, elements);
        mesh.compute_geometry()?;
        Ok(mesh)
    }
    /// Builds a mesh from an explicit side table with negative boundary sentinels.
    ///
    /// Elements must already be counterclockwise. Every side must list the
    /// vertices of its left local side in counterclockwise order, and every
    /// local side of every element must be claimed by exactly one side.
    pub fn from_side_table(
        nodes: Vec<Node>,
        triangles: &[[usize; 3]],
        sides: &[SideRecord],
    ) -> Result<Self, MeshError> {
        let node_num = nodes.len();
        let mut elements = Vec::with_capacity(triangles.len());
        for (ielem, tri) in triangles.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&inode| inode >= node_num) {
                return Err(MeshError::InvalidNodeIndex(bad));
            }
            let (x, y) = vertex_coords(&nodes, tri);
            if Self::compute_jacob_det(&x, &y) < 0.0 {
                return Err(MeshError::ClockwiseElement(ielem));
            }
            elements.push(TriangleElement::new(*tri));
        }
        let mut edges = Vec::with_capacity(sides.len());
        for (iedge, side) in sides.iter().enumerate() {
            if let Some(&bad) = side.inodes.iter().find(|&&inode| inode >= node_num) {
                return Err(MeshError::InvalidNodeIndex(bad));
            }
            if side.left >= elements.len() {
                return Err(MeshError::InvalidElementIndex(side.left as i64));
            }
            // the side runs counterclockwise around its left element
            let [a, b] = local_side_nodes(&elements[side.left], side.left_local_id, iedge)?;
            if side.inodes != [a, b] {
                return Err(MeshError::SideNodeMismatch(iedge));
            }
            claim_side(&mut elements, side.left, side.left_local_id, iedge)?;
            let right = if side.right >= 0 {
                let ielem = side.right as usize;
                if ielem >= elements.len() {
                    return Err(MeshError::InvalidElementIndex(side.right));
                }
                // and clockwise around its right element
                let [c, d] = local_side_nodes(&elements[ielem], side.right_local_id, iedge)?;
                if side.inodes != [d, c] {
                    return Err(MeshError::SideNodeMismatch(iedge));
                }
                claim_side(&mut elements, ielem, side.right_local_id, iedge)?;
                EdgeNeighbor::Element {
                    ielem,
                    local_id: side.right_local_id,
                }
            } else {
                EdgeNeighbor::Boundary(BoundaryType::from_sentinel(side.right)?)
            };
            edges.push(Edge {
                inodes: side.inodes,
                left: side.left,
                left_local_id: side.left_local_id,
                right,
                length: 0.0,
                normal: [0.0, 0.0],
            });
        }
        for (elem, element) in elements.iter().enumerate() {
            if let Some(local_id) = element.iedges.iter().position(|&iedge| iedge == usize::MAX) {
                return Err(MeshError::MissingSide { elem, local_id });
            }
        }
        let mut mesh = Self::assemble(nodes, edges, elements);
        mesh.compute_geometry()?;
        Ok(mesh)
    }
    fn assemble(nodes: Vec<Node>, edges: Vec<Edge>, elements: Vec<TriangleElement>) -> Self {
        let (internal_edges, boundary_edges): (Vec<usize>, Vec<usize>) = (0..edges.len())
            .partition(|&iedge| matches!(edges[iedge].right, EdgeNeighbor::Element { .. }));
        Self {
            elem_num: elements.len(),
            edge_num: edges.len(),
            node_num: nodes.len(),
            nodes,
            edges,
            elements,
            internal_edges,
            boundary_edges,
        }
    }
    /// Jacobians, affine partials, inscribed diameters, side lengths and
    /// outward normals.
    pub fn compute_geometry(&mut self) -> Result<(), MeshError> {
        for (ielem, element) in self.elements.iter_mut().enumerate() {
            let (x, y) = vertex_coords(&self.nodes, &element.inodes);
            let jacob_det = Self::compute_jacob_det(&x, &y);
            let scale = (x[1] - x[0]).abs().max((x[2] - x[0]).abs())
                * (y[1] - y[0]).abs().max((y[2] - y[0]).abs());
            if jacob_det.abs() <= 1.0e-12 * scale || jacob_det == 0.0 {
                return Err(MeshError::DegenerateElement(ielem));
            }
            let [xr, yr, xs, ys] = Self::compute_partials(&x, &y);
            element.jacob_det = jacob_det;
            element.xr = xr;
            element.yr = yr;
            element.xs = xs;
            element.ys = ys;
            element.inscribed_diameter = Self::compute_inscribed_diameter(&x, &y);
        }
        for (iedge, edge) in self.edges.iter_mut().enumerate() {
            let left = &self.elements[edge.left];
            let n0 = self.nodes[left.inodes[edge.left_local_id]];
            let n1 = self.nodes[left.inodes[(edge.left_local_id + 1) % 3]];
            let opposite = self.nodes[left.inodes[(edge.left_local_id + 2) % 3]];
            let length = Self::compute_edge_length(n0.x, n0.y, n1.x, n1.y);
            if length <= 0.0 {
                return Err(MeshError::ZeroLengthEdge(iedge));
            }
            let normal = Self::compute_normal(n0.x, n0.y, n1.x, n1.y);
            let midpoint = [0.5 * (n0.x + n1.x), 0.5 * (n0.y + n1.y)];
            edge.length = length;
            edge.normal = Self::orient_normal(normal, midpoint, [opposite.x, opposite.y]);
        }
        Ok(())
    }
    pub fn element_coords(&self, ielem: usize) -> ([f64; 3], [f64; 3]) {
        vertex_coords(&self.nodes, &self.elements[ielem].inodes)
    }
    #[cfg(test)]
    pub fn centroid(&self, ielem: usize) -> [f64; 2] {
        let (x, y) = self.element_coords(ielem);
        [(x[0] + x[1] + x[2]) / 3.0, (y[0] + y[1] + y[2]) / 3.0]
    }
    pub fn total_area(&self) -> f64 {
        self.elements.iter().map(|elem| 0.5 * elem.jacob_det).sum()
    }
    /// Single element with every side carrying `bnd`.
    pub fn create_single_triangle(
        vertices: [[f64; 2]; 3],
        bnd: BoundaryType,
    ) -> Result<Self, MeshError> {
        let nodes = vertices.iter().map(|&[x, y]| Node { x, y }).collect();
        let tags = [([0, 1], bnd), ([1, 2], bnd), ([2, 0], bnd)];
        Self::from_connectivity(nodes, &[[0, 1, 2]], &tags)
    }
    /// Structured triangulation of `[x0, x1] x [y0, y1]`; every cell is split
    /// along its lower-left to upper-right diagonal.
    pub fn create_rectangle_mesh(
        nx: usize,
        ny: usize,
        (x0, x1): (f64, f64),
        (y0, y1): (f64, f64),
        bnds: [BoundaryType; 4],
    ) -> Result<Self, MeshError> {
        let node_id = |i: usize, j: usize| j * (nx + 1) + i;
        let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                nodes.push(Node {
                    x: x0 + (x1 - x0) * i as f64 / nx as f64,
                    y: y0 + (y1 - y0) * j as f64 / ny as f64,
                });
            }
        }
        let mut triangles = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let a = node_id(i, j);
                let b = node_id(i + 1, j);
                let c = node_id(i + 1, j + 1);
                let d = node_id(i, j + 1);
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
        let mut tags = Vec::with_capacity(2 * (nx + ny));
        for i in 0..nx {
            tags.push((
                [node_id(i, 0), node_id(i + 1, 0)],
                bnds[BoundaryPosition::Lower.index()],
            ));
            tags.push((
                [node_id(i, ny), node_id(i + 1, ny)],
                bnds[BoundaryPosition::Upper.index()],
            ));
        }
        for j in 0..ny {
            tags.push((
                [node_id(nx, j), node_id(nx, j + 1)],
                bnds[BoundaryPosition::Right.index()],
            ));
            tags.push((
                [node_id(0, j), node_id(0, j + 1)],
                bnds[BoundaryPosition::Left.index()],
            ));
        }
        Self::from_connectivity(nodes, &triangles, &tags)
    }
    /// Quarter annulus in the first quadrant with reflecting circular walls,
    /// outflow on `y = 0` and inflow on `x = 0`.
    pub fn create_annulus_mesh(
        r_inner: f64,
        r_outer: f64,
        radial_num: usize,
        angular_num: usize,
    ) -> Result<Self, MeshError> {
        let node_id = |i: usize, j: usize| i * (angular_num + 1) + j;
        let mut nodes = Vec::with_capacity((radial_num + 1) * (angular_num + 1));
        for i in 0..=radial_num {
            let r = r_inner + (r_outer - r_inner) * i as f64 / radial_num as f64;
            for j in 0..=angular_num {
                let theta = FRAC_PI_2 * j as f64 / angular_num as f64;
                nodes.push(Node {
                    x: r * theta.cos(),
                    y: r * theta.sin(),
                });
            }
        }
        let mut triangles = Vec::with_capacity(2 * radial_num * angular_num);
        for i in 0..radial_num {
            for j in 0..angular_num {
                let a = node_id(i, j);
                let b = node_id(i + 1, j);
                let c = node_id(i + 1, j + 1);
                let d = node_id(i, j + 1);
                triangles.push([a, b, c]);
                triangles.push([a, c, d]);
            }
        }
        let mut tags = Vec::with_capacity(2 * (radial_num + angular_num));
        for i in 0..radial_num {
            tags.push(([node_id(i, 0), node_id(i + 1, 0)], BoundaryType::Outflow));
            tags.push((
                [node_id(i, angular_num), node_id(i + 1, angular_num)],
                BoundaryType::Inflow,
            ));
        }
        for j in 0..angular_num {
            tags.push(([node_id(0, j), node_id(0, j + 1)], BoundaryType::Reflecting));
            tags.push((
                [node_id(radial_num, j), node_id(radial_num, j + 1)],
                BoundaryType::Reflecting,
            ));
        }
        Self::from_connectivity(nodes, &triangles, &tags)
    }
}

fn local_side_nodes(
    element: &TriangleElement,
    local_id: usize,
    iedge: usize,
) -> Result<[usize; 2], MeshError> {
    if local_id >= 3 {
        return Err(MeshError::InvalidLocalId {
            side: iedge,
            local_id,
        });
    }
    Ok([element.inodes[local_id], element.inodes[(local_id + 1) % 3]])
}
fn claim_side(
    elements: &mut [TriangleElement],
    elem: usize,
    local_id: usize,
    iedge: usize,
) -> Result<(), MeshError> {
    let slot = &mut elements[elem].iedges[local_id];
    if *slot != usize::MAX {
        return Err(MeshError::DuplicateSide { elem, local_id });
    }
    *slot = iedge;
    Ok(())
}
fn sorted_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

fn vertex_coords(nodes: &[Node], inodes: &[usize; 3]) -> ([f64; 3], [f64; 3]) {
    (
        inodes.map(|inode| nodes[inode].x),
        inodes.map(|inode| nodes[inode].y),
    )
}
