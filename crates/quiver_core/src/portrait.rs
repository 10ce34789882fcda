use crate::traits::VectorField;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Sampling range for one phase-plane axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl AxisSpec {
    pub fn new(min: f64, max: f64, samples: usize) -> Self {
        Self { min, max, samples }
    }

    fn value_at(&self, i: usize) -> f64 {
        let frac = i as f64 / (self.samples - 1) as f64;
        self.min + (self.max - self.min) * frac
    }
}

/// Vector-field samples on a rectangular mesh, row-major over y then x, with
/// one `(x, y, dx, dy)` arrow per node. Plain arrays so any external quiver
/// renderer can consume them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePlane {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
}

impl PhasePlane {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Freezes a two-dimensional field at time `t` and evaluates it at every
/// node of the `x_axis` × `y_axis` mesh.
pub fn sample_phase_plane(
    field: &impl VectorField<f64>,
    t: f64,
    x_axis: AxisSpec,
    y_axis: AxisSpec,
) -> Result<PhasePlane> {
    if field.dimension() != 2 {
        bail!(
            "phase-plane sampling requires a two-dimensional field, got dimension {}",
            field.dimension()
        );
    }
    for axis in [x_axis, y_axis] {
        if axis.samples < 2 {
            bail!("each axis needs at least two samples, got {}", axis.samples);
        }
        if !(axis.min < axis.max) {
            bail!("axis range [{}, {}] is empty", axis.min, axis.max);
        }
    }

    let nodes = x_axis.samples * y_axis.samples;
    let mut plane = PhasePlane {
        x: Vec::with_capacity(nodes),
        y: Vec::with_capacity(nodes),
        dx: Vec::with_capacity(nodes),
        dy: Vec::with_capacity(nodes),
    };

    let mut out = [0.0; 2];
    for iy in 0..y_axis.samples {
        for ix in 0..x_axis.samples {
            let point = [x_axis.value_at(ix), y_axis.value_at(iy)];
            field.eval(t, &point, &mut out);
            plane.x.push(point[0]);
            plane.y.push(point[1]);
            plane.dx.push(out[0]);
            plane.dy.push(out[1]);
        }
    }
    Ok(plane)
}
