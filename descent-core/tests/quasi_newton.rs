use approx::assert_abs_diff_eq;
use descent::numerics::is_positive_definite;
use descent::{
    ArmijoBacktracking, CurvaturePolicy, DfpUpdate, FnObjective, Matrix, OptimizeError, Quadratic,
    QuasiNewton, Rosenbrock,
};
use proptest::prelude::*;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn rosenbrock_reaches_the_valley_floor() {
    init_logger();
    let mut solver = QuasiNewton::new();
    solver.max_iters = 2000;

    let result = solver.minimize(&Rosenbrock::default(), vec![-1.2, 1.0]).unwrap();

    assert!(result.converged);
    assert!(result.iterations < 2000);
    assert_abs_diff_eq!(result.solution[0], 1.0, epsilon = 1e-2);
    assert_abs_diff_eq!(result.solution[1], 1.0, epsilon = 1e-2);
}

#[test]
fn function_values_never_increase() {
    let mut solver = QuasiNewton::new();
    solver.max_iters = 2000;
    let result = solver.minimize(&Rosenbrock::default(), vec![-1.2, 1.0]).unwrap();

    let values = result.trajectory.values();
    for pair in values.windows(2) {
        assert!(pair[1] <= pair[0], "f increased: {} -> {}", pair[0], pair[1]);
    }
}

#[test]
fn spd_quadratic() {
    let a = Matrix::from_rows(&[[3.0, 1.0], [1.0, 2.0]]).unwrap();
    let obj = Quadratic::with_linear(a, vec![2.0, -1.0]).unwrap();
    let mut solver = QuasiNewton::new();
    solver.tol = 1e-6;

    let result = solver.minimize(&obj, vec![5.0, 5.0]).unwrap();

    // 2 A x = b => [[6, 2], [2, 4]] x = [2, -1]
    assert!(result.converged);
    assert_abs_diff_eq!(result.solution[0], 0.5, epsilon = 1e-5);
    assert_abs_diff_eq!(result.solution[1], -0.5, epsilon = 1e-5);
}

fn unbounded_line() -> FnObjective<impl Fn(&[f64]) -> f64, impl Fn(&[f64], &mut [f64])> {
    // f = -x: constant gradient, so every secant pair has y = 0
    FnObjective::new(|x: &[f64]| -x[0], |_x: &[f64], g: &mut [f64]| g[0] = -1.0)
}

#[test]
fn degenerate_curvature_fails_under_fail_policy() {
    let mut solver = QuasiNewton::new();
    solver.curvature_policy = CurvaturePolicy::Fail;
    let err = solver.minimize(&unbounded_line(), vec![0.0]).unwrap_err();
    assert!(matches!(err, OptimizeError::SingularOrDegenerateCurvature { .. }));
}

#[test]
fn degenerate_curvature_is_skipped_by_default() {
    let mut solver = QuasiNewton::new();
    solver.max_iters = 3;
    let result = solver.minimize(&unbounded_line(), vec![0.0]).unwrap();
    assert!(!result.converged);
    assert_eq!(result.iterations, 3);
    assert!(result.trajectory.latest().x[0] > 0.0);
}

#[test]
fn failure_mid_run_keeps_the_trajectory() {
    // the gradient turns NaN close to the minimizer
    let obj = FnObjective::new(
        |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>(),
        |x: &[f64], g: &mut [f64]| {
            let r = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            for (gi, xi) in g.iter_mut().zip(x) {
                *gi = if r < 0.5 { f64::NAN } else { 2.0 * xi };
            }
        },
    );
    let err = QuasiNewton::new().minimize(&obj, vec![40.0, 40.0]).unwrap_err();

    assert!(matches!(
        err.root_cause(),
        OptimizeError::NonFiniteValue { what: "gradient" }
    ));
    let trajectory = err.trajectory().expect("history is attached");
    assert!(trajectory.len() >= 2);
    assert_eq!(trajectory.start().x, vec![40.0, 40.0]);
    assert!(trajectory.best().f < trajectory.start().f);
}

#[test]
fn invalid_armijo_parameters_are_rejected() {
    let mut solver = QuasiNewton::new();
    solver.armijo = ArmijoBacktracking::new(1e-3, 0.5, 1e-3, 60);
    let err = solver.minimize(&Rosenbrock::default(), vec![0.0, 0.0]).unwrap_err();
    assert!(matches!(err, OptimizeError::InvalidConfig(_)));
}

proptest! {
    #[test]
    fn dfp_keeps_h_symmetric_positive_definite(
        diag in prop::collection::vec(0.5f64..5.0, 3),
        off in -0.2f64..0.2,
        steps in prop::collection::vec((prop::collection::vec(-1.0f64..1.0, 3), 0.1f64..2.0), 1..6),
    ) {
        // y = A s with A SPD gives d . y > 0 for every step
        let a = Matrix::from_rows(&[
            [diag[0], off, 0.0],
            [off, diag[1], off],
            [0.0, off, diag[2]],
        ]).unwrap();
        let mut dfp = DfpUpdate::new(3);
        for (d, alpha) in steps {
            let norm: f64 = d.iter().map(|v| v * v).sum::<f64>().sqrt();
            prop_assume!(norm > 0.1);
            let s: Vec<f64> = d.iter().map(|v| alpha * v).collect();
            let y = a.mul_vec(&s).unwrap();
            dfp.update(&d, &y, alpha).unwrap();

            let h = dfp.inverse_hessian();
            prop_assert!(h.check_symmetric(1e-12).is_ok());
            prop_assert!(is_positive_definite(h));
        }
    }
}
