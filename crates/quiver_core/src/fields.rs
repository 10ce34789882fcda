use crate::traits::{Scalar, VectorField};

/// Scalar field `dx/dt = 4 - x^2`.
///
/// Fixed points at x = ±2: +2 attracts, -2 repels. Anything starting above
/// -2 relaxes onto +2; anything below -2 runs away to -infinity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadratic;

impl<T: Scalar> VectorField<T> for Quadratic {
    fn dimension(&self) -> usize {
        1
    }

    fn eval(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = T::from_f64(4.0).unwrap() - x[0] * x[0];
    }
}

/// Firing-rate model of a single self-coupled neuron:
/// `dx/dt = -x + 1 / (1 + exp(-(r + c*x)))`.
///
/// `r` is the external drive and `c` the self-coupling strength. For
/// r = -3, c = 6 the field is bistable, with attractors near 0 and 1 and a
/// repelling point at exactly 0.5.
#[derive(Debug, Clone, Copy)]
pub struct SigmoidNeuron<T> {
    pub r: T,
    pub c: T,
}

impl<T: Scalar> SigmoidNeuron<T> {
    pub fn new(r: T, c: T) -> Self {
        Self { r, c }
    }
}

impl<T: Scalar> VectorField<T> for SigmoidNeuron<T> {
    fn dimension(&self) -> usize {
        1
    }

    fn eval(&self, _t: T, x: &[T], out: &mut [T]) {
        let drive = self.r + self.c * x[0];
        out[0] = -x[0] + T::one() / (T::one() + (-drive).exp());
    }
}

/// Linear planar system `dx/dt = a*x + b*y`, `dy/dt = c*x + d*y`.
///
/// The classroom instance (4, 2, -17, -5) has eigenvalues -1/2 ± i*sqrt(55)/2
/// and spirals into the origin.
#[derive(Debug, Clone, Copy)]
pub struct Linear2d<T> {
    pub a: T,
    pub b: T,
    pub c: T,
    pub d: T,
}

impl<T: Scalar> Linear2d<T> {
    pub fn new(a: T, b: T, c: T, d: T) -> Self {
        Self { a, b, c, d }
    }
}

impl<T: Scalar> VectorField<T> for Linear2d<T> {
    fn dimension(&self) -> usize {
        2
    }

    fn eval(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = self.a * x[0] + self.b * x[1];
        out[1] = self.c * x[0] + self.d * x[1];
    }
}

/// Nonlinear planar field `dx/dt = x - y`, `dy/dt = x^2 - 4`.
///
/// Equilibria at (2, 2) and (-2, -2); the first is an unstable spiral, the
/// second a saddle. Innocent-looking, but most trajectories escape to
/// infinity along the quadratic branch fast enough to give adaptive
/// black-box integrators trouble, which is why it serves as the comparison
/// case between those and the fixed-step methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct Saddle2d;

impl<T: Scalar> VectorField<T> for Saddle2d {
    fn dimension(&self) -> usize {
        2
    }

    fn eval(&self, _t: T, x: &[T], out: &mut [T]) {
        out[0] = x[0] - x[1];
        out[1] = x[0] * x[0] - T::from_f64(4.0).unwrap();
    }
}
