//! Numerical validation of the fixed-step steppers: measured convergence
//! orders, agreement with an external adaptive reference, and the classroom
//! scenarios the gallery fields come from.

use ode_solvers::dopri5::Dopri5;
use ode_solvers::Vector2;
use quiver_core::fields::{Linear2d, Quadratic, SigmoidNeuron};
use quiver_core::flow::{integrate, sweep, TimeGrid};
use quiver_core::solvers::{Euler, Rk4};
use quiver_core::traits::{Stepper, VectorField};

struct Decay;

impl VectorField<f64> for Decay {
    fn dimension(&self) -> usize {
        1
    }

    fn eval(&self, _t: f64, x: &[f64], out: &mut [f64]) {
        out[0] = -x[0];
    }
}

/// Grid over [0, 1] that lands on t = 1 despite the half-open constructor.
fn unit_interval(dt: f64) -> TimeGrid<f64> {
    TimeGrid::uniform(0.0, 1.0 + dt / 2.0, dt).unwrap()
}

fn error_at_one(stepper: &mut impl Stepper<f64>, dt: f64) -> f64 {
    let grid = unit_interval(dt);
    let trajectory = integrate(&Decay, stepper, &[1.0], &grid).unwrap();
    (trajectory.last()[0] - (-1.0_f64).exp()).abs()
}

#[test]
fn euler_error_halves_when_dt_halves() {
    let mut stepper = Euler::new(1);
    let coarse = error_at_one(&mut stepper, 0.01);
    let fine = error_at_one(&mut stepper, 0.005);
    let ratio = coarse / fine;
    assert!(
        (1.8..2.2).contains(&ratio),
        "first-order decay expected, got ratio {ratio}"
    );
}

#[test]
fn rk4_error_drops_sixteenfold_when_dt_halves() {
    let mut stepper = Rk4::new(1);
    let coarse = error_at_one(&mut stepper, 0.1);
    let fine = error_at_one(&mut stepper, 0.05);
    let ratio = coarse / fine;
    assert!(
        (12.0..20.0).contains(&ratio),
        "fourth-order decay expected, got ratio {ratio}"
    );
}

#[test]
fn euler_and_rk4_converge_to_the_same_limit() {
    let field = Linear2d::new(4.0, 2.0, -17.0, -5.0);
    let grid: TimeGrid<f64> = TimeGrid::uniform(0.0, 2.0, 1e-4).unwrap();
    let mut euler = Euler::new(2);
    let mut rk4 = Rk4::new(2);
    let euler_run = integrate(&field, &mut euler, &[1.5, 0.0], &grid).unwrap();
    let rk4_run = integrate(&field, &mut rk4, &[1.5, 0.0], &grid).unwrap();
    for (a, b) in euler_run.last().iter().zip(rk4_run.last()) {
        assert!((a - b).abs() < 1e-2);
    }
}

// The adaptive collaborator: Dormand-Prince 5(4) from ode_solvers, consumed
// strictly as a black box reporting on the requested grid.
struct SpiralOracle;

impl ode_solvers::System<f64, Vector2<f64>> for SpiralOracle {
    fn system(&self, _t: f64, y: &Vector2<f64>, dy: &mut Vector2<f64>) {
        dy[0] = 4.0 * y[0] + 2.0 * y[1];
        dy[1] = -17.0 * y[0] - 5.0 * y[1];
    }
}

#[test]
fn rk4_agrees_with_adaptive_reference_on_shared_grid_points() {
    let field = Linear2d::new(4.0, 2.0, -17.0, -5.0);
    let grid = TimeGrid::uniform(0.0, 10.0, 0.01).unwrap();
    let mut rk4 = Rk4::new(2);
    let trajectory = integrate(&field, &mut rk4, &[0.1, -0.2], &grid).unwrap();

    let mut oracle = Dopri5::new(
        SpiralOracle,
        0.0,
        10.0,
        0.01,
        Vector2::new(0.1, -0.2),
        1e-10,
        1e-10,
    );
    oracle.integrate().expect("adaptive reference integration");
    let reference_times = oracle.x_out();
    let reference_states = oracle.y_out();
    assert!(reference_times.len() >= trajectory.len());

    for i in 0..trajectory.len() {
        assert!((trajectory.times()[i] - reference_times[i]).abs() < 1e-9);
        let state = trajectory.state(i);
        assert!((state[0] - reference_states[i][0]).abs() < 1e-3);
        assert!((state[1] - reference_states[i][1]).abs() < 1e-3);
    }
}

fn check_monotone_relaxation(stepper: &mut impl Stepper<f64>) {
    let grid = TimeGrid::uniform(0.0, 5.0, 0.01).unwrap();
    let trajectory = integrate(&Quadratic, stepper, &[10.0], &grid).unwrap();

    let xs: Vec<f64> = trajectory.component(0).collect();
    for pair in xs.windows(2) {
        assert!(pair[1] <= pair[0], "relaxation onto x = 2 must be monotone");
        assert!(pair[1] >= 2.0, "trajectory crossed the x = 2 fixed point");
    }
    assert!((xs.last().unwrap() - 2.0).abs() < 1e-3);
}

#[test]
fn quadratic_relaxes_onto_upper_fixed_point_from_above() {
    check_monotone_relaxation(&mut Euler::new(1));
    check_monotone_relaxation(&mut Rk4::new(1));
}

#[test]
fn euler_damped_spiral_decays_while_oscillating() {
    let field = Linear2d::new(4.0, 2.0, -17.0, -5.0);
    let grid = TimeGrid::uniform(0.0, 5.0, 0.05).unwrap();
    let mut stepper = Euler::new(2);
    let trajectory = integrate(&field, &mut stepper, &[1.5, 0.0], &grid).unwrap();

    for component in 0..2 {
        let series: Vec<f64> = trajectory.component(component).collect();
        let sign_changes = series
            .windows(2)
            .filter(|pair| pair[0].signum() != pair[1].signum())
            .count();
        assert!(
            sign_changes >= 4,
            "component {component} should oscillate, saw {sign_changes} sign changes"
        );

        let half = series.len() / 2;
        let head = series[..half].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        let tail = series[half..].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!(
            tail < 0.85 * head,
            "component {component} amplitude should decay, head {head} tail {tail}"
        );
    }
}

#[test]
fn sigmoid_neuron_splits_into_two_basins() {
    let field = SigmoidNeuron::new(-3.0, 6.0);
    let grid = TimeGrid::uniform(0.0, 50.0, 0.01).unwrap();
    let mut stepper = Rk4::new(1);

    let x0s: Vec<[f64; 1]> = (0..40).map(|k| [2.0 * k as f64 / 39.0]).collect();
    let trajectories = sweep(&field, &mut stepper, x0s.iter(), &grid).unwrap();

    // Attractors of x = sigma(6x - 3) sit near 0.0707 and 0.9293; the
    // repulsor at exactly 0.5 separates the basins.
    let mut low = 0usize;
    let mut high = 0usize;
    for (x0, trajectory) in x0s.iter().zip(&trajectories) {
        let settled = trajectory.last()[0];
        if x0[0] < 0.5 {
            assert!((settled - 0.0707).abs() < 0.02, "x0 {} settled at {settled}", x0[0]);
            low += 1;
        } else {
            assert!((settled - 0.9293).abs() < 0.02, "x0 {} settled at {settled}", x0[0]);
            high += 1;
        }
    }
    assert_eq!(low, 10);
    assert_eq!(high, 30);
}
