use descent::{
    LineSearchContext, LineSearchPolicy, LineSearchResult, OptimizeError, QuasiNewton, Rosenbrock,
};

/// Plain halving from a unit step until the value drops.
#[derive(Clone, Copy, Debug)]
struct Halving {
    max_steps: usize,
}

impl LineSearchPolicy for Halving {
    fn name(&self) -> &'static str {
        "halving"
    }

    fn search(
        &mut self,
        ctx: &LineSearchContext,
        eval_cost: &mut dyn FnMut(f64) -> Option<f64>,
    ) -> Result<LineSearchResult, OptimizeError> {
        if ctx.dphi0 >= 0.0 {
            return Err(OptimizeError::NotADescentDirection { slope: ctx.dphi0 });
        }
        let mut alpha = 1.0;
        for k in 0..self.max_steps {
            if let Some(value) = eval_cost(alpha) {
                if value < ctx.cost0 {
                    return Ok(LineSearchResult {
                        alpha,
                        value,
                        evaluations: k + 1,
                    });
                }
            }
            alpha *= 0.5;
        }
        Err(OptimizeError::LineSearchExhausted {
            method: "halving",
            evaluations: self.max_steps,
        })
    }
}

fn main() -> Result<(), OptimizeError> {
    env_logger::init();

    let mut solver = QuasiNewton::new();
    solver.max_iters = 5000;
    let mut ls = Halving { max_steps: 40 };
    let result = solver.minimize_with_line_search(&Rosenbrock::default(), vec![-1.2, 1.0], &mut ls)?;

    println!(
        "converged={} iters={} x*=[{:.6}, {:.6}]",
        result.converged, result.iterations, result.solution[0], result.solution[1]
    );
    Ok(())
}
