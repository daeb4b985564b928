use approx::assert_abs_diff_eq;
use descent::{
    FiniteDifference, FnObjective, Matrix, Newton, Objective, OptimizeError, Quadratic, Rosenbrock,
    Sphere,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sphere_in_one_iteration() {
    init_logger();
    let result = Newton::new().minimize(&Sphere, vec![3.0, 3.0]).unwrap();

    assert!(result.converged);
    assert_eq!(result.iterations, 1);
    assert_abs_diff_eq!(result.solution[0], 0.0, epsilon = 1e-8);
    assert_abs_diff_eq!(result.solution[1], 0.0, epsilon = 1e-8);
}

#[test]
fn spd_quadratic_in_one_iteration_from_anywhere() {
    let a = Matrix::from_rows(&[[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]]).unwrap();
    let obj = Quadratic::new(a);
    for x0 in [vec![1.0, -2.0, 0.5], vec![-30.0, 4.0, 12.0], vec![0.01, 0.0, -0.02]] {
        let result = Newton::new().minimize(&obj, x0).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
        for v in &result.solution {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-8);
        }
    }
}

#[test]
fn indefinite_hessian_is_repaired() {
    init_logger();
    // f = x^2 + (y^2 - 1)^2; Hessian indefinite at the start (f_yy = 12 y^2 - 4 < 0)
    let obj = FnObjective::new(
        |x: &[f64]| x[0] * x[0] + (x[1] * x[1] - 1.0).powi(2),
        |x: &[f64], g: &mut [f64]| {
            g[0] = 2.0 * x[0];
            g[1] = 4.0 * x[1] * (x[1] * x[1] - 1.0);
        },
    )
    .with_hessian(|x: &[f64], h: &mut [f64]| {
        h[0] = 2.0;
        h[1] = 0.0;
        h[2] = 0.0;
        h[3] = 12.0 * x[1] * x[1] - 4.0;
    });

    let mut solver = Newton::new();
    solver.shift_delta = 1.0;
    solver.tol = 1e-6;
    let x0 = vec![0.5, 0.5];
    let f0 = obj.value(&x0);

    let result = solver.minimize(&obj, x0).unwrap();

    assert!(result.converged);
    assert!(result.f < f0);
    assert_abs_diff_eq!(result.solution[0], 0.0, epsilon = 1e-5);
    assert_abs_diff_eq!(result.solution[1], 1.0, epsilon = 1e-5);
}

#[test]
fn finite_difference_derivatives() {
    let obj = FiniteDifference::new(|x: &[f64]| x[0].exp() - x[0] + (x[1] - 0.5).powi(2));
    let mut solver = Newton::new();
    solver.tol = 1e-6;

    let result = solver.minimize(&obj, vec![1.0, -1.0]).unwrap();

    assert!(result.converged);
    assert_abs_diff_eq!(result.solution[0], 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(result.solution[1], 0.5, epsilon = 1e-4);
}

#[test]
fn stationary_start_takes_no_iterations() {
    let result = Newton::new().minimize(&Rosenbrock::default(), vec![1.0, 1.0]).unwrap();
    assert!(result.converged);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.solution, vec![1.0, 1.0]);
}

#[test]
fn cap_keeps_partial_progress() {
    let mut solver = Newton::new();
    solver.max_iters = 1;
    let result = solver.minimize(&Rosenbrock::default(), vec![-1.2, 1.0]).unwrap();

    assert!(!result.converged);
    assert_eq!(result.trajectory.len(), 2);
    let err = result.into_converged().unwrap_err();
    assert!(matches!(err, OptimizeError::NonConvergence { iterations: 1, .. }));
}

#[test]
fn non_positive_shift_is_invalid() {
    let mut solver = Newton::new();
    solver.shift_delta = 0.0;
    let err = solver.minimize(&Sphere, vec![1.0]).unwrap_err();
    assert!(matches!(err, OptimizeError::InvalidConfig(_)));
}
