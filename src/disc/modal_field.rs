use ndarray::{
    Array3, ArrayView1, ArrayView2, Axis, Ix2, Zip, iter::AxisIterMut, s,
};

pub const QUANTITY_NUM: usize = 4;

/// Conserved quantities of the 2D Euler equations, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    Density,
    MomentumX,
    MomentumY,
    Energy,
}
impl Quantity {
    pub const ALL: [Quantity; QUANTITY_NUM] = [
        Quantity::Density,
        Quantity::MomentumX,
        Quantity::MomentumY,
        Quantity::Energy,
    ];
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Density => "density",
            Quantity::MomentumX => "momentum_x",
            Quantity::MomentumY => "momentum_y",
            Quantity::Energy => "energy",
        }
    }
}

/// Modal coefficients stored as `[entity, quantity, mode]`.
///
/// The entity is an element for coefficient states and volume buffers and a
/// mesh side for the left/right surface buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalField {
    pub values: Array3<f64>,
}
impl ModalField {
    pub fn zeros(entity_num: usize, basis_num: usize) -> Self {
        Self {
            values: Array3::zeros((entity_num, QUANTITY_NUM, basis_num)),
        }
    }
    pub fn entity_num(&self) -> usize {
        self.values.shape()[0]
    }
    pub fn basis_num(&self) -> usize {
        self.values.shape()[2]
    }
    pub fn get(&self, entity: usize, quantity: Quantity, mode: usize) -> f64 {
        self.values[[entity, quantity.index(), mode]]
    }
    pub fn set(&mut self, entity: usize, quantity: Quantity, mode: usize, value: f64) {
        self.values[[entity, quantity.index(), mode]] = value;
    }
    /// Coefficients of one entity as `[quantity, mode]`.
    pub fn entity(&self, entity: usize) -> ArrayView2<f64> {
        self.values.index_axis(Axis(0), entity)
    }
    pub fn entities_mut(&mut self) -> AxisIterMut<'_, f64, Ix2> {
        self.values.axis_iter_mut(Axis(0))
    }
    pub fn modes(&self, entity: usize, quantity: Quantity) -> ArrayView1<f64> {
        self.values.slice(s![entity, quantity.index(), ..])
    }
    /// Mean-mode coefficient; the cell average is this value times `phi0`.
    pub fn mean(&self, entity: usize, quantity: Quantity) -> f64 {
        self.values[[entity, quantity.index(), 0]]
    }
    /// `self += alpha * other`
    pub fn scaled_add(&mut self, alpha: f64, other: &ModalField) {
        self.values.scaled_add(alpha, &other.values);
    }
    /// `self = base + alpha * increment`
    pub fn assign_axpy(&mut self, base: &ModalField, alpha: f64, increment: &ModalField) {
        Zip::from(&mut self.values)
            .and(&base.values)
            .and(&increment.values)
            .for_each(|v, &b, &inc| *v = b + alpha * inc);
    }
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}
