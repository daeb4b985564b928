use descent::{
    ConjugateGradient, GradientDescent, Matrix, Newton, Objective, Quadratic, QuasiNewton,
    RunResult,
};

fn report(result: &RunResult) {
    println!(
        "{:>7}: converged={} iters={:>3} x*=[{:.6}, {:.6}] f(x*)={:.3e}",
        result.method,
        result.converged,
        result.iterations,
        result.solution[0],
        result.solution[1],
        result.f
    );
}

fn main() -> Result<(), descent::OptimizeError> {
    env_logger::init();

    // f(x) = x^T A x - b^T x, minimizer solves 2 A x = b => x* = (0.5, -0.5)
    let a = Matrix::from_rows(&[[3.0, 1.0], [1.0, 2.0]])?;
    let obj = Quadratic::with_linear(a, vec![2.0, -1.0])?;
    let x0 = vec![5.0, 5.0];
    println!("f(x0) = {:.3e}", obj.value(&x0));

    report(&GradientDescent::new().minimize(&obj, x0.clone())?);
    report(&Newton::new().minimize(&obj, x0.clone())?);
    report(&QuasiNewton::new().minimize(&obj, x0.clone())?);
    report(&ConjugateGradient::new().minimize(&obj, x0)?);
    Ok(())
}
