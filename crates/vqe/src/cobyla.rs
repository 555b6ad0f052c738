//! Derivative-free trust-region minimization with linear models, in the
//! style of COBYLA (without constraints).
//!
//! # Algorithm
//!
//! The solver keeps a center point and `n` interpolation vertices around it.
//! Each pass fits a linear model `f(x) ≈ f(x_c) + g·(x − x_c)` through the
//! vertices and steps a distance `rho` along `−g`. An improving step moves
//! the center; a failed step shrinks `rho`. When vertices drift too far from
//! the center, or the model becomes degenerate, a geometry step re-samples
//! one vertex near the center instead.
//!
//! Every evaluation after the initial point consumes one iteration and is
//! recorded in the history, including the evaluations that build the first
//! set of vertices.
//!
//! # Termination
//!
//! - [`Status::Converged`] when `rho` drops below the tolerance or an
//!   accepted step improves the energy by less than the tolerance
//! - [`Status::MaxIterations`] when the budget is spent first

use quantum::{Error, Result};
use tracing::{debug, trace};

use crate::linalg::{argmax_by, argmin_by, distance, dot, norm, solve};
use crate::optimizer::{validate_initial, Config, Minimizer, OptimizationResult, Recorder, Status};

/// Gradient norms below this are treated as a flat model.
const FLAT_GRADIENT: f64 = 1e-14;

/// Vertices farther than this multiple of `rho` trigger a geometry step.
const FAR_VERTEX: f64 = 2.0;

/// Trust-region settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cobyla {
    rho_begin: f64,
    shrink: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            rho_begin: 1.0,
            shrink: 0.5,
        }
    }
}

impl Cobyla {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial trust-region radius.
    pub fn with_rho_begin(mut self, rho_begin: f64) -> Result<Self> {
        if !rho_begin.is_finite() || rho_begin <= 0.0 {
            return Err(Error::invalid_parameter(
                "rho_begin",
                format!("must be finite and > 0, got {rho_begin}"),
            ));
        }
        self.rho_begin = rho_begin;
        Ok(self)
    }

    /// Radius factor after a rejected step, in `(0, 1)`.
    pub fn with_shrink(mut self, shrink: f64) -> Result<Self> {
        if !(shrink > 0.0 && shrink < 1.0) {
            return Err(Error::invalid_parameter(
                "shrink",
                format!("must lie in (0, 1), got {shrink}"),
            ));
        }
        self.shrink = shrink;
        Ok(self)
    }

    pub fn rho_begin(&self) -> f64 {
        self.rho_begin
    }

    pub fn shrink(&self) -> f64 {
        self.shrink
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    x: Vec<f64>,
    f: f64,
}

impl Minimizer for Cobyla {
    fn minimize<F>(
        &self,
        objective: F,
        initial: &[f64],
        config: &Config,
    ) -> Result<OptimizationResult>
    where
        F: FnMut(&[f64]) -> Result<f64>,
    {
        validate_initial(initial)?;

        let n = initial.len();
        let tolerance = config.tolerance();
        let mut rho = self.rho_begin;

        let (mut recorder, f0) = Recorder::start(objective, initial, config)?;
        let mut center = Vertex {
            x: initial.to_vec(),
            f: f0,
        };

        let mut vertices = Vec::with_capacity(n);
        for i in 0..n {
            if recorder.exhausted() {
                return recorder.finish(Status::MaxIterations);
            }
            let mut x = center.x.clone();
            x[i] += rho;
            let f = recorder.record(&x)?;
            vertices.push(Vertex { x, f });
        }

        loop {
            let best = argmin_by(0..n, |i| vertices[i].f);
            if vertices[best].f < center.f {
                std::mem::swap(&mut vertices[best], &mut center);
            }

            if rho < tolerance {
                debug!(rho, energy = center.f, "trust region below tolerance");
                return recorder.finish(Status::Converged);
            }
            if recorder.exhausted() {
                return recorder.finish(Status::MaxIterations);
            }

            let offsets: Vec<Vec<f64>> = vertices
                .iter()
                .map(|v| v.x.iter().zip(&center.x).map(|(a, c)| a - c).collect())
                .collect();
            let rises: Vec<f64> = vertices.iter().map(|v| v.f - center.f).collect();
            let distances: Vec<f64> = vertices.iter().map(|v| distance(&v.x, &center.x)).collect();
            let far = argmax_by(0..n, |i| distances[i]);

            let Some(gradient) = solve(&offsets, &rises) else {
                let axis = resample_axis(&offsets, far, rho);
                trace!(vertex = far, axis, rho, "degenerate model, resampling vertex");
                let mut x = center.x.clone();
                x[axis] += rho;
                let f = recorder.record(&x)?;
                vertices[far] = Vertex { x, f };
                continue;
            };

            if distances[far] > FAR_VERTEX * rho {
                let x = geometry_point(&offsets, &gradient, &center.x, far, rho);
                trace!(vertex = far, rho, "geometry step");
                let f = recorder.record(&x)?;
                vertices[far] = Vertex { x, f };
                continue;
            }

            let g_norm = norm(&gradient);
            if g_norm < FLAT_GRADIENT {
                rho *= self.shrink;
                continue;
            }

            let trial: Vec<f64> = center
                .x
                .iter()
                .zip(&gradient)
                .map(|(c, g)| c - rho * g / g_norm)
                .collect();
            let f_trial = recorder.record(&trial)?;

            if f_trial < center.f {
                let improvement = center.f - f_trial;
                let previous = std::mem::replace(
                    &mut center,
                    Vertex {
                        x: trial,
                        f: f_trial,
                    },
                );
                vertices[far] = previous;
                debug!(
                    iteration = recorder.iterations(),
                    energy = f_trial,
                    improvement,
                    rho,
                    "step accepted"
                );
                if improvement < tolerance {
                    return recorder.finish(Status::Converged);
                }
            } else {
                let worst = argmax_by(0..n, |i| vertices[i].f);
                if f_trial < vertices[worst].f {
                    vertices[worst] = Vertex {
                        x: trial,
                        f: f_trial,
                    };
                }
                rho *= self.shrink;
                debug!(
                    iteration = recorder.iterations(),
                    energy = f_trial,
                    rho,
                    "step rejected, radius shrunk"
                );
            }
        }
    }
}

/// First coordinate axis along which a vertex replacing `far` restores an
/// independent interpolation set. Falls back to axis `far` when the other
/// vertices are dependent among themselves.
fn resample_axis(offsets: &[Vec<f64>], far: usize, rho: f64) -> usize {
    let n = offsets.len();
    let zeros = vec![0.0; n];
    let mut candidate = offsets.to_vec();

    (0..n)
        .find(|&axis| {
            candidate[far] = vec![0.0; n];
            candidate[far][axis] = rho;
            solve(&candidate, &zeros).is_some()
        })
        .unwrap_or(far)
}

/// Replacement for vertex `far`: a point at distance `rho` from the center,
/// normal to the face spanned by the other vertices, on the side the model
/// predicts to be downhill.
fn geometry_point(
    offsets: &[Vec<f64>],
    gradient: &[f64],
    center: &[f64],
    far: usize,
    rho: f64,
) -> Vec<f64> {
    let mut unit = vec![0.0; center.len()];
    unit[far] = 1.0;

    let direction = match solve(offsets, &unit) {
        Some(v) if norm(&v) > 0.0 => v,
        _ => unit,
    };
    let sign = if dot(gradient, &direction) <= 0.0 { 1.0 } else { -1.0 };
    let scale = sign * rho / norm(&direction);

    center
        .iter()
        .zip(&direction)
        .map(|(c, d)| c + scale * d)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn bowl(x: &[f64]) -> Result<f64> {
        Ok((x[0] - 1.0).powi(2) + 2.0 * (x[1] + 0.5).powi(2) + 0.5 * (x[2] - 2.0).powi(2))
    }

    #[test]
    fn minimizes_quadratic_bowl() {
        let config = Config::new(400, 1e-8).unwrap();
        let result = Cobyla::new()
            .minimize(bowl, &[0.0, 0.0, 0.0], &config)
            .unwrap();

        assert!(result.best_energy < 1e-4, "f = {}", result.best_energy);
        assert_relative_eq!(result.best_parameters[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.best_parameters[1], -0.5, epsilon = 1e-2);
        assert_relative_eq!(result.best_parameters[2], 2.0, epsilon = 1e-2);
    }

    #[test]
    fn budget_smaller_than_initial_vertices() {
        let config = Config::new(2, 1e-6).unwrap();
        let result = Cobyla::new()
            .minimize(bowl, &[0.0, 0.0, 0.0], &config)
            .unwrap();

        assert_eq!(result.status, Status::MaxIterations);
        assert_eq!(result.iterations_run, 2);
        assert_eq!(result.history.len(), 3);
    }

    #[test]
    fn stops_when_radius_collapses() {
        let config = Config::new(10_000, 1e-3).unwrap();
        let result = Cobyla::new()
            .minimize(bowl, &[0.0, 0.0, 0.0], &config)
            .unwrap();

        assert_eq!(result.status, Status::Converged);
        assert!(result.iterations_run < 10_000);
    }

    #[test]
    fn degenerate_set_resampled_off_the_line() {
        // Flat in x[1]: accepted steps run along x[0] until the three points
        // are collinear at iteration 4.
        let slope = |x: &[f64]| -> Result<f64> { Ok(x[0]) };
        let config = Config::new(5, 1e-6).unwrap();
        let result = Cobyla::new().minimize(slope, &[0.0, 0.0], &config).unwrap();

        assert_eq!(result.iterations_run, 5);
        assert_eq!(result.history.len(), 6);
        let resampled = result.history.last().unwrap();
        assert_eq!(resampled.iteration, 5);
        assert_relative_eq!(resampled.parameters[0], -2.0, epsilon = 1e-12);
        assert_relative_eq!(resampled.parameters[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(resampled.energy, -2.0, epsilon = 1e-12);

        let config = Config::new(12, 1e-6).unwrap();
        let result = Cobyla::new().minimize(slope, &[0.0, 0.0], &config).unwrap();
        assert!(result.best_energy <= -5.0, "f = {}", result.best_energy);
    }

    #[test]
    fn far_vertex_replaced_at_radius() {
        // Two rejected trials shrink rho to 0.25 while vertex (1, 0) stays
        // at distance 1 from the center (0, 0).
        let shifted =
            |x: &[f64]| -> Result<f64> { Ok((x[0] - 0.3).powi(2) + (x[1] - 0.2).powi(2)) };
        let config = Config::new(5, 1e-6).unwrap();
        let result = Cobyla::new().minimize(shifted, &[0.0, 0.0], &config).unwrap();

        assert_eq!(result.history.len(), 6);
        let entries = result.history.entries();
        let origin = [0.0, 0.0];
        assert_relative_eq!(distance(&entries[3].parameters, &origin), 1.0, epsilon = 1e-12);
        assert_relative_eq!(distance(&entries[4].parameters, &origin), 0.5, epsilon = 1e-12);

        let replacement = &entries[5].parameters;
        assert_relative_eq!(distance(replacement, &origin), 0.25, epsilon = 1e-12);
        assert_relative_eq!(replacement[0], -0.208_012_573_584_461, epsilon = 1e-9);
        assert_relative_eq!(replacement[1], 0.138_675_049_056_307, epsilon = 1e-9);
    }

    #[test]
    fn resample_axis_restores_independence() {
        let collinear = vec![vec![2.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(resample_axis(&collinear, 0, 1.0), 1);

        let independent = vec![vec![0.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(resample_axis(&independent, 1, 0.5), 0);
    }

    #[test]
    fn empty_start_is_invalid() {
        let err = Cobyla::new()
            .minimize(bowl, &[], &Config::default())
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn non_finite_start_is_invalid() {
        let err = Cobyla::new()
            .minimize(bowl, &[0.0, f64::NAN, 0.0], &Config::default())
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn settings_validated() {
        assert!(Cobyla::new().with_rho_begin(0.0).is_err());
        assert!(Cobyla::new().with_shrink(1.0).is_err());
        assert!(Cobyla::new().with_shrink(f64::NAN).is_err());
        let c = Cobyla::new().with_rho_begin(0.25).unwrap().with_shrink(0.3).unwrap();
        assert_eq!(c.rho_begin(), 0.25);
        assert_eq!(c.shrink(), 0.3);
    }
}
