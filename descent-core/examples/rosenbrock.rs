use descent::{minimize, Rosenbrock, RunConfig};

const RUN: &str = r#"
x0 = [-1.2, 1.0]
tolerance = 1e-3
max_iterations = 2000
method = "quasi_newton_dfp"
verbose = true

[armijo]
alpha0 = 1e-3
ita = 2.0
epsilon = 1e-3
"#;

fn main() -> Result<(), descent::OptimizeError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = RunConfig::from_toml_str(RUN)?;
    let result = minimize(&Rosenbrock::default(), &cfg)?.into_converged()?;

    println!(
        "converged after {} iterations: x*=[{:.6}, {:.6}] f(x*)={:.3e}",
        result.iterations, result.solution[0], result.solution[1], result.f
    );
    let path = result.trajectory.positions();
    for (k, x) in path.iter().enumerate().step_by(25) {
        println!("  {k:>4}: [{:+.4}, {:+.4}]", x[0], x[1]);
    }
    Ok(())
}
