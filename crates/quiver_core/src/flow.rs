use crate::traits::{Scalar, Stepper, VectorField};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while building a trajectory.
///
/// Numerical blow-up is deliberately absent from this taxonomy: a state
/// escaping to infinity or NaN is a valid observable outcome and propagates
/// into the trajectory instead of aborting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("time grid must contain at least one point")]
    EmptyGrid,

    #[error("degenerate zero step at grid index {index}")]
    ZeroStep { index: usize },

    #[error("state dimension mismatch: field has {expected} components, state has {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("uniform grid step does not advance start toward stop")]
    UnorderedSpan,
}

/// The sample times of one integration run.
///
/// Consecutive spacing is the integration step: fixed-step methods take
/// exactly one step per grid interval, with no internal sub-stepping. Spacing
/// may vary point to point and may be negative throughout (backward
/// integration); only zero spacing is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid<T> {
    times: Vec<T>,
}

impl<T: Scalar> TimeGrid<T> {
    /// Uniform grid with `numpy.arange` semantics: samples `start + i * dt`
    /// on the half-open span `[start, stop)`. `dt` may be negative when
    /// `stop < start`.
    pub fn uniform(start: T, stop: T, dt: T) -> Result<Self, FlowError> {
        let span = (stop - start) / dt;
        if !span.is_finite() || span <= T::zero() {
            return Err(FlowError::UnorderedSpan);
        }

        let mut times = Vec::new();
        let mut i = 0usize;
        loop {
            let t = start + dt * T::from_usize(i).unwrap();
            // Past `stop` in the direction of travel.
            if (t - stop) * dt >= T::zero() {
                break;
            }
            times.push(t);
            i += 1;
        }
        Self::from_times(times)
    }

    /// Explicit, possibly non-uniform grid. Rejects empty grids and zero
    /// spacing between consecutive points.
    pub fn from_times(times: Vec<T>) -> Result<Self, FlowError> {
        if times.is_empty() {
            return Err(FlowError::EmptyGrid);
        }
        for (index, pair) in times.windows(2).enumerate() {
            if pair[1] - pair[0] == T::zero() {
                return Err(FlowError::ZeroStep { index });
            }
        }
        Ok(Self { times })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }
}

/// An ordered sequence of states, one per grid point, with
/// `trajectory.len() == grid.len()` and `trajectory.state(0)` equal to the
/// initial condition exactly. States are stored as row-major flat data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory<T> {
    times: Vec<T>,
    states: Vec<T>,
    dim: usize,
}

impl<T: Scalar> Trajectory<T> {
    fn with_capacity(dim: usize, len: usize) -> Self {
        Self {
            times: Vec::with_capacity(len),
            states: Vec::with_capacity(len * dim),
            dim,
        }
    }

    fn push(&mut self, t: T, state: &[T]) {
        self.times.push(t);
        self.states.extend_from_slice(state);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// The state at grid index `i`.
    pub fn state(&self, i: usize) -> &[T] {
        &self.states[i * self.dim..(i + 1) * self.dim]
    }

    pub fn first(&self) -> &[T] {
        self.state(0)
    }

    pub fn last(&self) -> &[T] {
        self.state(self.len() - 1)
    }

    /// All states in grid order.
    pub fn states(&self) -> impl Iterator<Item = &[T]> {
        self.states.chunks_exact(self.dim)
    }

    /// One state component as a time series, for state-vs-time inspection.
    pub fn component(&self, component: usize) -> impl Iterator<Item = T> + '_ {
        assert!(component < self.dim, "component index out of range");
        self.states.iter().skip(component).step_by(self.dim).copied()
    }
}

/// Builds a trajectory by threading `x0` through `stepper` across `grid`.
///
/// Each interval uses its own local spacing `t[i+1] - t[i]`, so non-uniform
/// grids integrate correctly. There is no early termination and no divergence
/// trapping; a failed dimension check aborts before any stepping.
pub fn integrate<T, F, S>(
    field: &F,
    stepper: &mut S,
    x0: &[T],
    grid: &TimeGrid<T>,
) -> Result<Trajectory<T>, FlowError>
where
    T: Scalar,
    F: VectorField<T>,
    S: Stepper<T>,
{
    let dim = field.dimension();
    if dim == 0 || x0.len() != dim {
        return Err(FlowError::DimensionMismatch {
            expected: dim,
            got: x0.len(),
        });
    }

    let times = grid.times();
    let mut trajectory = Trajectory::with_capacity(dim, times.len());
    trajectory.push(times[0], x0);

    let mut state = x0.to_vec();
    for i in 0..times.len() - 1 {
        let dt = times[i + 1] - times[i];
        stepper.step(field, times[i], &mut state, dt);
        trajectory.push(times[i + 1], &state);
    }
    Ok(trajectory)
}

/// Integrates one trajectory per initial condition over a shared grid.
///
/// Runs are fully independent (pure field, stateless stepper), so callers
/// needing throughput may distribute them; here they execute sequentially.
pub fn sweep<T, F, S, I>(
    field: &F,
    stepper: &mut S,
    initial_states: I,
    grid: &TimeGrid<T>,
) -> Result<Vec<Trajectory<T>>, FlowError>
where
    T: Scalar,
    F: VectorField<T>,
    S: Stepper<T>,
    I: IntoIterator,
    I::Item: AsRef<[T]>,
{
    let mut trajectories = Vec::new();
    for x0 in initial_states {
        trajectories.push(integrate(field, stepper, x0.as_ref(), grid)?);
    }
    Ok(trajectories)
}
