use crate::traits::{Scalar, Stepper, VectorField};

/// Explicit Euler stepper: `x_next = x + dt * f(t, x)`.
///
/// First-order accurate. Cheap, and good enough for well-damped systems at
/// small steps, but the error halves only linearly with dt.
pub struct Euler<T: Scalar> {
    slope: Vec<T>,
}

impl<T: Scalar> Euler<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            slope: vec![T::zero(); dim],
        }
    }
}

impl<T: Scalar> Stepper<T> for Euler<T> {
    fn order(&self) -> usize {
        1
    }

    fn step(&mut self, field: &impl VectorField<T>, t: T, state: &mut [T], dt: T) {
        if self.slope.len() != state.len() {
            self.slope.resize(state.len(), T::zero());
        }

        field.eval(t, state, &mut self.slope);
        for i in 0..state.len() {
            state[i] = state[i] + dt * self.slope[i];
        }
    }
}

/// Classic Runge-Kutta 4th order stepper.
///
/// Four stage evaluations per step, global error O(dt^4). Stage times are
/// t, t + dt/2, t + dt/2, and t + dt, so time-dependent fields are sampled
/// where the tableau requires.
pub struct Rk4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> Rk4<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![T::zero(); dim],
            k2: vec![T::zero(); dim],
            k3: vec![T::zero(); dim],
            k4: vec![T::zero(); dim],
            tmp: vec![T::zero(); dim],
        }
    }

    fn ensure_dim(&mut self, dim: usize) {
        if self.k1.len() != dim {
            self.k1.resize(dim, T::zero());
            self.k2.resize(dim, T::zero());
            self.k3.resize(dim, T::zero());
            self.k4.resize(dim, T::zero());
            self.tmp.resize(dim, T::zero());
        }
    }
}

impl<T: Scalar> Stepper<T> for Rk4<T> {
    fn order(&self) -> usize {
        4
    }

    fn step(&mut self, field: &impl VectorField<T>, t: T, state: &mut [T], dt: T) {
        self.ensure_dim(state.len());

        let half = T::from_f64(0.5).unwrap();
        let sixth = T::from_f64(1.0 / 6.0).unwrap();
        let two = T::from_f64(2.0).unwrap();

        // k1 = f(t, x)
        field.eval(t, state, &mut self.k1);

        // k2 = f(t + dt/2, x + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        field.eval(t + dt * half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, x + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        field.eval(t + dt * half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, x + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        field.eval(t + dt, &self.tmp, &mut self.k4);

        // x_next = x + dt/6 * (k1 + 2k2 + 2k3 + k4)
        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }
    }
}
