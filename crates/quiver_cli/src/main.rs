//! Thin runner over `quiver_core`: rebuilds the classroom scenarios the
//! gallery fields come from and writes their trajectories as JSON on stdout,
//! ready for an external plotting tool. No rendering happens here.

use anyhow::{bail, Context, Result};
use quiver_core::equilibrium::{find_equilibrium, Equilibrium, NewtonSettings};
use quiver_core::fields::{Linear2d, Quadratic, Saddle2d, SigmoidNeuron};
use quiver_core::flow::{integrate, sweep, TimeGrid, Trajectory};
use quiver_core::portrait::{sample_phase_plane, AxisSpec, PhasePlane};
use quiver_core::solvers::{Euler, Rk4};
use quiver_core::traits::Stepper;
use serde::Serialize;
use std::io;

#[derive(Serialize)]
struct Run {
    scenario: &'static str,
    method: &'static str,
    order: usize,
    trajectories: Vec<Trajectory<f64>>,
}

#[derive(Serialize)]
struct ParameterRun {
    r: f64,
    trajectory: Trajectory<f64>,
}

#[derive(Serialize)]
struct SpiralReport {
    scenario: &'static str,
    method: &'static str,
    order: usize,
    trajectory: Trajectory<f64>,
    equilibrium: Equilibrium,
}

#[derive(Serialize)]
struct PortraitReport {
    scenario: &'static str,
    plane: PhasePlane,
    equilibrium: Equilibrium,
}

fn main() -> Result<()> {
    let scenario = std::env::args().nth(1).unwrap_or_default();
    match scenario.as_str() {
        "quadratic" => quadratic(),
        "sigmoid" => sigmoid(),
        "sigmoid-sweep" => sigmoid_sweep(),
        "linear" => linear(),
        "saddle" => saddle(),
        "portrait" => portrait(),
        "" => bail!("usage: quiver <quadratic|sigmoid|sigmoid-sweep|linear|saddle|portrait>"),
        other => bail!(
            "unknown scenario `{other}`; expected quadratic, sigmoid, sigmoid-sweep, linear, \
             saddle or portrait"
        ),
    }
}

/// dx/dt = 4 - x^2 from x0 = 10: relaxation onto the fixed point at 2.
fn quadratic() -> Result<()> {
    let grid = TimeGrid::uniform(0.0, 5.0, 0.1)?;
    let mut stepper = Rk4::new(1);
    let trajectory = integrate(&Quadratic, &mut stepper, &[10.0], &grid)?;
    emit(&Run {
        scenario: "quadratic",
        method: "rk4",
        order: stepper.order(),
        trajectories: vec![trajectory],
    })
}

/// Bistable firing-rate neuron: 40 initial conditions splitting into the two
/// basins either side of the repulsor at 0.5.
fn sigmoid() -> Result<()> {
    let field = SigmoidNeuron::new(-3.0, 6.0);
    let grid = TimeGrid::uniform(0.0, 50.0, 0.01)?;
    let mut stepper = Rk4::new(1);
    let x0s: Vec<[f64; 1]> = linspace(0.0, 2.0, 40).into_iter().map(|x| [x]).collect();
    let trajectories = sweep(&field, &mut stepper, x0s.iter(), &grid)?;
    emit(&Run {
        scenario: "sigmoid",
        method: "rk4",
        order: stepper.order(),
        trajectories,
    })
}

/// Fixed initial condition, external drive swept across the saddle-node: the
/// lower attractor disappears as r rises from -3 toward -2.
fn sigmoid_sweep() -> Result<()> {
    let grid = TimeGrid::uniform(0.0, 50.0, 0.01)?;
    let mut stepper = Rk4::new(1);
    let mut runs = Vec::new();
    for r in linspace(-3.0, -2.0, 10) {
        let field = SigmoidNeuron::new(r, 6.0);
        let trajectory = integrate(&field, &mut stepper, &[0.25], &grid)?;
        runs.push(ParameterRun { r, trajectory });
    }
    emit(&runs)
}

/// Euler on the damped linear spiral, plus the Newton classification of its
/// origin equilibrium.
fn linear() -> Result<()> {
    let field = Linear2d::new(4.0, 2.0, -17.0, -5.0);
    let grid = TimeGrid::uniform(0.0, 5.0, 0.05)?;
    let mut stepper = Euler::new(2);
    let trajectory = integrate(&field, &mut stepper, &[1.5, 0.0], &grid)?;
    let equilibrium = find_equilibrium(&field, 0.0, &[0.5, 0.5], NewtonSettings::default())?;
    emit(&SpiralReport {
        scenario: "linear",
        method: "euler",
        order: stepper.order(),
        trajectory,
        equilibrium,
    })
}

/// The odeint-comparison case: a 4x4 grid of initial conditions on the
/// nonlinear saddle field, each integrated for one time unit.
fn saddle() -> Result<()> {
    let grid = TimeGrid::uniform(0.0, 1.0, 0.01)?;
    let mut stepper = Rk4::new(2);
    let mut x0s = Vec::new();
    for xi in linspace(-4.0, 4.0, 4) {
        for yi in linspace(-4.0, 4.0, 4) {
            x0s.push([xi, yi]);
        }
    }
    let trajectories = sweep(&Saddle2d, &mut stepper, x0s.iter(), &grid)?;
    emit(&Run {
        scenario: "saddle",
        method: "rk4",
        order: stepper.order(),
        trajectories,
    })
}

/// Arrow field of the damped spiral on the classroom mesh, for external
/// quiver rendering.
fn portrait() -> Result<()> {
    let field = Linear2d::new(4.0, 2.0, -17.0, -5.0);
    let plane = sample_phase_plane(
        &field,
        0.0,
        AxisSpec::new(-2.0, 2.0, 20),
        AxisSpec::new(-6.0, 6.0, 24),
    )?;
    let equilibrium = find_equilibrium(&field, 0.0, &[0.5, 0.5], NewtonSettings::default())?;
    emit(&PortraitReport {
        scenario: "portrait",
        plane,
        equilibrium,
    })
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| lo + (hi - lo) * k as f64 / (n - 1) as f64)
        .collect()
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value)
        .context("failed to serialize scenario output")?;
    println!();
    Ok(())
}
