use approx::assert_abs_diff_eq;
use descent::{
    expand_bracket, ArmijoBacktracking, Dichotomous, Exhaustive, Fibonacci, GoldenSection,
    IntervalHalving, LineSearchContext, LineSearchPolicy, NewtonRaphson, OptimizeError,
    ParabolicNewton, ScalarMinimizer, ScalarSearch, SearchStart, Secant,
};
use proptest::prelude::*;

fn ctx(cost0: f64, dphi0: f64) -> LineSearchContext {
    LineSearchContext {
        iter: 0,
        cost0,
        dphi0,
        direction_norm: 1.0,
    }
}

#[test]
fn armijo_returns_a_decreasing_step() {
    // phi(alpha) = (alpha - 1)^2, phi(0) = 1, phi'(0) = -2
    let phi = |a: f64| (a - 1.0) * (a - 1.0);
    let mut armijo = ArmijoBacktracking::new(0.01, 2.0, 1e-3, 60);
    let mut eval = |a: f64| Some(phi(a));

    let ls = armijo.search(&ctx(1.0, -2.0), &mut eval).unwrap();

    assert!(phi(ls.alpha) < phi(0.0));
    assert_eq!(ls.value, phi(ls.alpha));
}

#[test]
fn armijo_treats_non_finite_trials_as_rejections() {
    // blows up past alpha = 0.5
    let mut eval = |a: f64| if a > 0.5 { None } else { Some(1.0 - a) };
    let ls = ArmijoBacktracking::new(4.0, 2.0, 1e-3, 60)
        .search(&ctx(1.0, -1.0), &mut eval)
        .unwrap();
    assert_eq!(ls.alpha, 0.5);
}

fn smooth(a: f64) -> f64 {
    a.exp() - 3.0 * a
}

#[test]
fn scalar_minimizers_agree() {
    let expected = 3f64.ln();
    let mut phi = smooth;

    let p = ParabolicNewton::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();
    let g = GoldenSection::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();
    let f = Fibonacci::default()
        .minimize(&mut phi, SearchStart::Bracket(0.0, 3.0), 1e-8)
        .unwrap();

    assert_abs_diff_eq!(p.alpha, expected, epsilon = 1e-4);
    assert_abs_diff_eq!(g.alpha, expected, epsilon = 1e-6);
    assert_abs_diff_eq!(f.alpha, expected, epsilon = 1e-6);
    assert!(g.evaluations <= GoldenSection::default().max_evaluations);
}

#[test]
fn bisection_family_agrees() {
    let expected = 3f64.ln();
    let mut phi = smooth;

    let d = Dichotomous::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();
    let h = IntervalHalving::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();
    let e = Exhaustive::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();

    assert_abs_diff_eq!(d.alpha, expected, epsilon = 1e-6);
    assert_abs_diff_eq!(h.alpha, expected, epsilon = 1e-6);
    assert_abs_diff_eq!(e.alpha, expected, epsilon = 1e-6);
    assert!(e.evaluations <= Exhaustive::default().max_evaluations);
}

#[test]
fn secant_on_values_and_on_the_derivative() {
    let expected = 3f64.ln();

    let mut phi = smooth;
    let by_value = Secant::default()
        .minimize(&mut phi, SearchStart::Point(0.0), 1e-8)
        .unwrap();
    assert_abs_diff_eq!(by_value.alpha, expected, epsilon = 1e-6);

    let mut dphi = |a: f64| a.exp() - 3.0;
    let by_slope = Secant::default()
        .minimize_with_derivative(&mut dphi, SearchStart::Point(0.0), 1e-10)
        .unwrap();
    assert_abs_diff_eq!(by_slope.alpha, expected, epsilon = 1e-9);
    assert!(by_slope.slope.abs() <= 1e-10);
}

#[test]
fn newton_raphson_with_analytic_derivatives() {
    let mut dphi = |a: f64| a.exp() - 3.0;
    let mut d2phi = |a: f64| a.exp();
    let sp = NewtonRaphson::default()
        .minimize_with_derivatives(&mut dphi, &mut d2phi, 0.0, 1e-12)
        .unwrap();
    assert_abs_diff_eq!(sp.alpha, 3f64.ln(), epsilon = 1e-12);
    assert!(sp.evaluations < 10);
}

#[test]
fn newton_raphson_gives_up_after_its_iterations() {
    // phi = sqrt(1 + a^2): Newton overshoots ever further from the minimum
    let mut dphi = |a: f64| a / (1.0 + a * a).sqrt();
    let mut d2phi = |a: f64| (1.0 + a * a).powf(-1.5);
    let mut nr = NewtonRaphson { max_iterations: 5 };
    let err = nr
        .minimize_with_derivatives(&mut dphi, &mut d2phi, 1.5, 1e-9)
        .unwrap_err();
    assert!(matches!(
        err,
        OptimizeError::LineSearchExhausted {
            method: "newton_raphson",
            evaluations: 5,
        }
    ));
}

#[test]
fn every_search_kind_handles_a_steep_line() {
    // minimizer far inside the default first step
    let kinds = [
        ScalarSearch::ParabolicNewton(ParabolicNewton::default()),
        ScalarSearch::GoldenSection(GoldenSection::default()),
        ScalarSearch::Fibonacci(Fibonacci::default()),
        ScalarSearch::Dichotomous(Dichotomous::default()),
        ScalarSearch::IntervalHalving(IntervalHalving::default()),
        ScalarSearch::Exhaustive(Exhaustive::default()),
        ScalarSearch::Secant(Secant::default()),
    ];
    for mut kind in kinds {
        let mut phi = |a: f64| 625.0 * (a - 8e-4).powi(2) - 625.0 * 6.4e-7;
        let min = kind
            .minimize(&mut phi, SearchStart::Point(0.0), 1e-7)
            .unwrap_or_else(|e| panic!("{}: {e}", kind.name()));
        assert_abs_diff_eq!(min.alpha, 8e-4, epsilon = 1e-6);
        assert!(min.value < 0.0, "{}", kind.name());
    }
}

#[test]
fn bracket_expansion_encloses_the_minimum() {
    let mut phi = |a: f64| (a - 5.0) * (a - 5.0);
    let (lo, hi) = expand_bracket(&mut phi, 0.0, 0.1, 100).unwrap();
    assert!(lo < 5.0 && 5.0 < hi);
}

#[test]
fn evaluation_cap_is_enforced() {
    let mut phi = |a: f64| -a;
    let mut pn = ParabolicNewton {
        h: 1e-2,
        max_evaluations: 6,
    };
    let err = pn.minimize(&mut phi, SearchStart::Point(0.0), 1e-6).unwrap_err();
    assert!(matches!(
        err,
        OptimizeError::LineSearchExhausted {
            method: "parabolic_newton",
            ..
        }
    ));
}

proptest! {
    #[test]
    fn armijo_step_satisfies_sufficient_decrease(
        c in 0.1f64..10.0,
        m in 0.1f64..5.0,
        alpha0 in 1e-4f64..10.0,
        ita in 1.5f64..4.0,
        epsilon in 1e-4f64..0.5,
    ) {
        // phi(alpha) = c (alpha - m)^2, minimum at m > 0
        let phi = |a: f64| c * (a - m) * (a - m);
        let dphi0 = -2.0 * c * m;
        let mut eval = |a: f64| Some(phi(a));
        let mut armijo = ArmijoBacktracking::new(alpha0, ita, epsilon, 60);

        let ls = armijo.search(&ctx(phi(0.0), dphi0), &mut eval).unwrap();

        prop_assert!(ls.alpha > 0.0);
        prop_assert!(phi(ls.alpha) <= phi(0.0) + epsilon * ls.alpha * dphi0);
    }
}
