use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in vector fields and
/// steppers. Must support floating-point arithmetic, debug printing, and
/// conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// The right-hand side of an ODE system, `dx/dt = f(t, x)`.
///
/// Implementations must be pure: deterministic given `(t, x)` and free of
/// side effects or call-history dependence. Parameters belong on the
/// implementing struct, so a field and its parameters are matched by
/// construction rather than at call time. The time argument is always
/// threaded through, so non-autonomous systems are expressible even though
/// most gallery fields ignore it.
pub trait VectorField<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state, `dimension()` entries
    /// out: buffer to write dx/dt into, `dimension()` entries
    fn eval(&self, t: T, x: &[T], out: &mut [T]);
}

/// A fixed-step rule that advances a state across `[t, t + dt]`.
///
/// `dt` is owned entirely by the caller; steppers never adjust it. The
/// `&mut self` receiver exists only for scratch buffers; a stepper carries no
/// state between calls, so any two steppers with the same signature can be
/// substituted for one another without touching the driving loop.
pub trait Stepper<T: Scalar> {
    /// Classical order of accuracy (global error O(dt^order)).
    fn order(&self) -> usize;

    /// Performs one step of size dt, updating `state` in place.
    fn step(&mut self, field: &impl VectorField<T>, t: T, state: &mut [T], dt: T);
}
