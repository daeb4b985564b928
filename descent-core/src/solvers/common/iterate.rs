//! Iterates, the append-only trajectory and the run result.

use crate::error::{OptimizeError, Result};
use crate::numerics::linalg::{all_finite, norm2};
use crate::numerics::Matrix;
use crate::problems::objective::{Objective, TwiceDifferentiable};

/// One visited point together with its first (and optionally second) order data.
#[derive(Clone, Debug, PartialEq)]
pub struct IteratePoint {
    pub x: Vec<f64>,
    pub f: f64,
    pub gradient: Vec<f64>,
    /// Present only for methods that consume the Hessian.
    pub hessian: Option<Matrix>,
}

impl IteratePoint {
    /// Evaluate value and gradient at `x`.
    pub fn evaluate<O: Objective + ?Sized>(obj: &O, x: Vec<f64>) -> Result<Self> {
        let f = obj.value(&x);
        if !f.is_finite() {
            return Err(OptimizeError::NonFiniteValue { what: "function value" });
        }
        let mut gradient = vec![0.0; x.len()];
        obj.gradient(&x, &mut gradient);
        if !all_finite(&gradient) {
            return Err(OptimizeError::NonFiniteValue { what: "gradient" });
        }
        Ok(Self {
            x,
            f,
            gradient,
            hessian: None,
        })
    }

    /// Evaluate value, gradient and Hessian at `x`.
    pub fn evaluate_with_hessian<O: TwiceDifferentiable + ?Sized>(
        obj: &O,
        x: Vec<f64>,
    ) -> Result<Self> {
        let mut point = Self::evaluate(obj, x)?;
        point.hessian = Some(hessian_at(obj, &point.x)?);
        Ok(point)
    }

    pub fn dim(&self) -> usize {
        self.x.len()
    }

    pub fn grad_norm(&self) -> f64 {
        norm2(&self.gradient)
    }

    /// Cached Hessian, or a fresh evaluation when this point was recorded without one.
    pub(crate) fn hessian_or_eval<O: TwiceDifferentiable + ?Sized>(&self, obj: &O) -> Result<Matrix> {
        match &self.hessian {
            Some(h) => Ok(h.clone()),
            None => hessian_at(obj, &self.x),
        }
    }
}

fn hessian_at<O: TwiceDifferentiable + ?Sized>(obj: &O, x: &[f64]) -> Result<Matrix> {
    let n = x.len();
    let mut buf = vec![0.0; n * n];
    obj.hessian(x, &mut buf);
    if !all_finite(&buf) {
        return Err(OptimizeError::NonFiniteValue { what: "hessian" });
    }
    Matrix::from_row_major(n, buf)
}

/// Append-only record of the iterates of one run, in iteration order.
///
/// Always holds at least the starting point.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    points: Vec<IteratePoint>,
}

impl Trajectory {
    pub(crate) fn starting_at(start: IteratePoint) -> Self {
        Self {
            points: vec![start],
        }
    }

    pub(crate) fn push(&mut self, point: IteratePoint) {
        self.points.push(point);
    }

    /// Most recent iterate.
    pub fn latest(&self) -> &IteratePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn start(&self) -> &IteratePoint {
        &self.points[0]
    }

    /// Iterate with the lowest function value; the earliest one on ties.
    pub fn best(&self) -> &IteratePoint {
        self.points
            .iter()
            .fold(&self.points[0], |best, p| if p.f < best.f { p } else { best })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[IteratePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IteratePoint> {
        self.points.iter()
    }

    /// Visited positions only.
    pub fn positions(&self) -> Vec<Vec<f64>> {
        self.points.iter().map(|p| p.x.clone()).collect()
    }

    /// Function values along the run.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.f).collect()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a IteratePoint;
    type IntoIter = std::slice::Iter<'a, IteratePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Outcome of a run.
///
/// When `converged` is false, `solution` is the best iterate found rather than the last one.
#[derive(Clone, Debug)]
pub struct RunResult {
    pub method: &'static str,
    pub solution: Vec<f64>,
    pub f: f64,
    pub grad_norm: f64,
    pub iterations: usize,
    pub converged: bool,
    pub trajectory: Trajectory,
}

impl RunResult {
    /// Turn an unconverged run into `NonConvergence`, keeping the partial progress.
    pub fn into_converged(self) -> Result<Self> {
        if self.converged {
            return Ok(self);
        }
        Err(OptimizeError::NonConvergence {
            iterations: self.iterations,
            grad_norm: self.grad_norm,
            best: self.solution,
            trajectory: self.trajectory,
        })
    }
}
