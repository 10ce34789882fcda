use crate::traits::VectorField;
use anyhow::{bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewtonSettings {
    pub max_steps: usize,
    pub damping: f64,
    pub tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 25,
            damping: 1.0,
            tolerance: 1e-9,
        }
    }
}

/// Linearized character of a fixed point, read off the Jacobian eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stability {
    /// All eigenvalues in the open left half-plane: nearby trajectories fall in.
    Attractor,
    /// All eigenvalues in the open right half-plane: nearby trajectories escape.
    Repulsor,
    /// Stable and unstable directions both present.
    Saddle,
    /// At least one eigenvalue on (or numerically at) the imaginary axis;
    /// the linearization does not decide.
    Marginal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equilibrium {
    pub state: Vec<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
    pub eigenvalues: Vec<Complex<f64>>,
    pub stability: Stability,
}

/// Damped Newton iteration for a zero of `f(t, .)` near `initial_guess`,
/// followed by eigenvalue classification of the Jacobian at the root.
///
/// The Jacobian comes from central finite differences on the field itself,
/// so any `VectorField` qualifies with no derivative bookkeeping.
pub fn find_equilibrium(
    field: &impl VectorField<f64>,
    t: f64,
    initial_guess: &[f64],
    settings: NewtonSettings,
) -> Result<Equilibrium> {
    let dim = field.dimension();
    if dim == 0 {
        bail!("field has zero dimension");
    }
    if initial_guess.len() != dim {
        bail!(
            "initial guess dimension mismatch: expected {}, got {}",
            dim,
            initial_guess.len()
        );
    }
    if settings.max_steps == 0 {
        bail!("max_steps must be greater than zero");
    }
    if settings.damping <= 0.0 {
        bail!("damping must be positive");
    }
    if settings.tolerance <= 0.0 {
        bail!("tolerance must be positive");
    }

    let mut state = initial_guess.to_vec();
    let mut residual = vec![0.0; dim];
    field.eval(t, &state, &mut residual);
    let mut residual_norm = l2_norm(&residual);
    let mut iterations = 0usize;

    while residual_norm > settings.tolerance {
        if iterations >= settings.max_steps {
            bail!(
                "Newton iteration failed to converge in {} steps (residual {:.3e})",
                settings.max_steps,
                residual_norm
            );
        }

        let jacobian = finite_difference_jacobian(field, t, &state);
        let delta = jacobian
            .lu()
            .solve(&DVector::from_column_slice(&residual))
            .context("singular Jacobian during Newton iteration")?;

        for i in 0..dim {
            state[i] -= settings.damping * delta[i];
        }

        iterations += 1;
        field.eval(t, &state, &mut residual);
        residual_norm = l2_norm(&residual);
    }

    let jacobian = finite_difference_jacobian(field, t, &state);
    let eigenvalues: Vec<Complex<f64>> = jacobian.complex_eigenvalues().iter().copied().collect();
    let stability = classify(&eigenvalues);

    Ok(Equilibrium {
        state,
        residual_norm,
        iterations,
        eigenvalues,
        stability,
    })
}

fn finite_difference_jacobian(
    field: &impl VectorField<f64>,
    t: f64,
    state: &[f64],
) -> DMatrix<f64> {
    let dim = state.len();
    let mut jacobian = DMatrix::zeros(dim, dim);
    let mut forward = vec![0.0; dim];
    let mut backward = vec![0.0; dim];
    let mut probe = state.to_vec();

    for j in 0..dim {
        let h = f64::EPSILON.cbrt() * state[j].abs().max(1.0);
        let original = probe[j];
        probe[j] = original + h;
        field.eval(t, &probe, &mut forward);
        probe[j] = original - h;
        field.eval(t, &probe, &mut backward);
        probe[j] = original;

        for i in 0..dim {
            jacobian[(i, j)] = (forward[i] - backward[i]) / (2.0 * h);
        }
    }
    jacobian
}

fn classify(eigenvalues: &[Complex<f64>]) -> Stability {
    // Finite-difference noise floor; real parts inside it are undecidable.
    let tol = 1e-7;
    let mut has_stable = false;
    let mut has_unstable = false;
    let mut has_marginal = false;
    for ev in eigenvalues {
        if ev.re < -tol {
            has_stable = true;
        } else if ev.re > tol {
            has_unstable = true;
        } else {
            has_marginal = true;
        }
    }

    if has_marginal {
        Stability::Marginal
    } else if has_stable && has_unstable {
        Stability::Saddle
    } else if has_unstable {
        Stability::Repulsor
    } else {
        Stability::Attractor
    }
}

fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}
