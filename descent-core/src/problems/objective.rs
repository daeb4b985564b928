/// Objective function to be minimized over R^n.
///
/// - `x` is the current point, `len = n`
/// - `gradient` writes ∇f(x) into a caller-owned buffer of the same length
///
/// Implementations must be deterministic: identical `x` gives identical output.
pub trait Objective {
    /// Function value f(x) at x.
    fn value(&self, x: &[f64]) -> f64;

    /// Write the gradient ∇f(x) at x into grad.
    ///
    /// grad is pre-sized to `x.len()`; its previous contents are unspecified.
    fn gradient(&self, x: &[f64], grad: &mut [f64]);

    /// Problem dimension, when the objective has a fixed one.
    ///
    /// Solvers compare this against `x0.len()` before the first evaluation.
    fn dim(&self) -> Option<usize> {
        None
    }
}

/// Objective that can also report its Hessian.
pub trait TwiceDifferentiable: Objective {
    /// Fill the Hessian at x, row-major (`hess[i*n + k]`), `len = n*n`.
    fn hessian(&self, x: &[f64], hess: &mut [f64]);
}

impl<T: Objective + ?Sized> Objective for &T {
    fn value(&self, x: &[f64]) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        (**self).gradient(x, grad)
    }

    fn dim(&self) -> Option<usize> {
        (**self).dim()
    }
}

impl<T: TwiceDifferentiable + ?Sized> TwiceDifferentiable for &T {
    fn hessian(&self, x: &[f64], hess: &mut [f64]) {
        (**self).hessian(x, hess)
    }
}

/// Objective assembled from a value closure and an analytic gradient closure.
#[derive(Clone, Copy, Debug)]
pub struct FnObjective<F, G> {
    pub value_fn: F,
    pub grad_fn: G,
}

impl<F, G> FnObjective<F, G>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64], &mut [f64]),
{
    pub fn new(value_fn: F, grad_fn: G) -> Self {
        Self { value_fn, grad_fn }
    }

    /// Attach an analytic Hessian.
    pub fn with_hessian<H>(self, hess_fn: H) -> FnTwiceObjective<F, G, H>
    where
        H: Fn(&[f64], &mut [f64]),
    {
        FnTwiceObjective {
            value_fn: self.value_fn,
            grad_fn: self.grad_fn,
            hess_fn,
        }
    }
}

impl<F, G> Objective for FnObjective<F, G>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64], &mut [f64]),
{
    fn value(&self, x: &[f64]) -> f64 {
        (self.value_fn)(x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        (self.grad_fn)(x, grad)
    }
}

/// Closure-backed objective with value, gradient and Hessian.
#[derive(Clone, Copy, Debug)]
pub struct FnTwiceObjective<F, G, H> {
    pub value_fn: F,
    pub grad_fn: G,
    pub hess_fn: H,
}

impl<F, G, H> Objective for FnTwiceObjective<F, G, H>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64], &mut [f64]),
    H: Fn(&[f64], &mut [f64]),
{
    fn value(&self, x: &[f64]) -> f64 {
        (self.value_fn)(x)
    }

    fn gradient(&self, x: &[f64], grad: &mut [f64]) {
        (self.grad_fn)(x, grad)
    }
}

impl<F, G, H> TwiceDifferentiable for FnTwiceObjective<F, G, H>
where
    F: Fn(&[f64]) -> f64,
    G: Fn(&[f64], &mut [f64]),
    H: Fn(&[f64], &mut [f64]),
{
    fn hessian(&self, x: &[f64], hess: &mut [f64]) {
        (self.hess_fn)(x, hess)
    }
}
