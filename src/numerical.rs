//! Newton-Raphson root finding for f: R^n -> R^n
///  Example#1
/// ```
/// use RustedNewton::numerical::NR::Newton;
/// use RustedNewton::numerical::NR_config::NewtonConfig;
/// use RustedNewton::numerical::test_functions::Sinusoid1D;
/// use nalgebra::DVector;
///    // sin(x) = 0 starting from x0 = 1, Jacobian by finite differences
///    let s = Sinusoid1D::default();
///    let config = NewtonConfig::new().with_tol(1e-10).with_dx(1e-5);
///    let solver = Newton::scalar(move |x| s.eval(x), config).unwrap();
///    let report = solver.solve_detailed(&DVector::from_element(1, 1.0)).unwrap();
///    assert!(report.root[0].abs() < 1e-8);
///    println!("{}", report.statistics_table());
///  ```
pub mod NR;
/// solver configuration: defaults, validation, loading from TOML
pub mod NR_config;
pub mod NR_errors;
/// test problems with known roots
pub mod NR_examples;
/// forward-difference Jacobian
pub mod finite_difference;
/// polynomials, sinusoids, linear maps and their derivatives
pub mod test_functions;
