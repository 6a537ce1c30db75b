//! Newton-Raphson solver for f(x) = 0, f: R^n -> R^n.
//!
//! The Jacobian is taken from the analytic callable when one is supplied, otherwise it is
//! approximated by forward differences with step `dx`. Iteration stops when |f(x)| < tol,
//! fails when an iterate leaves the search radius around x0, when the Jacobian cannot be
//! inverted, or when `maxiter` iterations pass without convergence.
//!  Example#1
//! ```
//! use RustedNewton::numerical::NR::Newton;
//! use RustedNewton::numerical::NR_config::NewtonConfig;
//! use nalgebra::{DMatrix, DVector};
//!    // f(x) = A x has its root at the origin
//!    let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
//!    let config = NewtonConfig::new().with_tol(1e-10).with_maxiter(3);
//!    let solver = Newton::new(move |x: &DVector<f64>| Ok(&A * x), config).unwrap();
//!    let root = solver.solve(&DVector::from_vec(vec![1.0, 2.0])).unwrap();
//!    assert!(root.norm() < 1e-10);
//! ```
//! Example#2
//! ```
//! use RustedNewton::numerical::NR::Newton;
//! use RustedNewton::numerical::NR_config::NewtonConfig;
//!    // scalar function with analytic derivative
//!    let config = NewtonConfig::new().with_tol(1e-10).with_maxiter(4);
//!    let solver = Newton::scalar(|x| 3.0 * x + 6.0, config)
//!        .unwrap()
//!        .with_scalar_derivative(|_x| 3.0);
//!    assert_eq!(solver.solve_scalar(2.0).unwrap(), -2.0);
//! ```
use crate::Utils::logger::init_term_logger;
use crate::numerical::NR_config::NewtonConfig;
use crate::numerical::NR_errors::NewtonError;
use crate::numerical::finite_difference::{approximate_derivative, approximate_jacobian};
use log::{debug, error, info, warn};
use nalgebra::{DMatrix, DVector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabled::{builder::Builder, settings::Style};

/// residual function f(x)
pub type VectorFunction =
    Box<dyn Fn(&DVector<f64>) -> Result<DVector<f64>, NewtonError> + Send + Sync>;
/// analytic Jacobian Df(x)
pub type JacobianFunction =
    Box<dyn Fn(&DVector<f64>) -> Result<DMatrix<f64>, NewtonError> + Send + Sync>;
type ScalarFunction = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

pub struct Newton {
    f: VectorFunction,
    Df: Option<JacobianFunction>,
    // set by `Newton::scalar`, differentiated directly when there is no analytic derivative
    f_scalar: Option<ScalarFunction>,
    config: NewtonConfig,
}

/// State of the iteration at one evaluation of the residual
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    pub iteration: usize,
    pub x: DVector<f64>,
    pub residual_norm: f64,
}

/// Result of a successful solve together with its statistics
#[derive(Debug, Clone)]
pub struct NewtonReport {
    pub root: DVector<f64>,
    pub residual_norm: f64,
    /// number of Newton steps taken
    pub iterations: usize,
    pub function_evaluations: usize,
    pub jacobian_evaluations: usize,
    pub elapsed: Duration,
    pub history: Vec<IterationRecord>,
}

impl NewtonReport {
    pub fn statistics_table(&self) -> String {
        let stats = vec![
            ("number of iterations", self.iterations.to_string()),
            ("function evaluations", self.function_evaluations.to_string()),
            ("jacobian evaluations", self.jacobian_evaluations.to_string()),
            ("residual norm", format!("{:e}", self.residual_norm)),
            ("length of x vector", self.root.len().to_string()),
            ("time elapsed, ms", self.elapsed.as_millis().to_string()),
        ];
        let mut builder = Builder::default();
        for (key, value) in stats {
            builder.push_record([key.to_string(), value]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        table.to_string()
    }
}

// evaluation counters of a single solve call
#[derive(Debug, Default)]
struct EvalCounter {
    fun: usize,
    jac: usize,
}

impl Newton {
    /// Create a solver for f(x) = 0. Without an analytic Jacobian (see `with_jacobian`)
    /// finite differences with step `config.dx` are used.
    pub fn new<F>(f: F, config: NewtonConfig) -> Result<Newton, NewtonError>
    where
        F: Fn(&DVector<f64>) -> Result<DVector<f64>, NewtonError> + Send + Sync + 'static,
    {
        config.validate()?;
        Ok(Newton {
            f: Box::new(f),
            Df: None,
            f_scalar: None,
            config,
        })
    }

    /// Solver for a scalar function f: R -> R, treated as a function of 1-vectors
    pub fn scalar<F>(f: F, config: NewtonConfig) -> Result<Newton, NewtonError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let f: ScalarFunction = Arc::new(f);
        let f_vec = f.clone();
        let mut solver = Self::new(
            move |x: &DVector<f64>| {
                check_scalar(x)?;
                Ok(DVector::from_element(1, f_vec(x[0])))
            },
            config,
        )?;
        solver.f_scalar = Some(f);
        Ok(solver)
    }

    /// Use the analytic Jacobian `Df` instead of finite differences
    pub fn with_jacobian<D>(mut self, Df: D) -> Self
    where
        D: Fn(&DVector<f64>) -> Result<DMatrix<f64>, NewtonError> + Send + Sync + 'static,
    {
        self.Df = Some(Box::new(Df));
        self
    }

    /// Use the analytic derivative of a scalar function
    pub fn with_scalar_derivative<D>(self, df: D) -> Self
    where
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.with_jacobian(move |x: &DVector<f64>| {
            check_scalar(x)?;
            Ok(DMatrix::from_element(1, 1, df(x[0])))
        })
    }

    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    pub fn has_analytic_jacobian(&self) -> bool {
        self.Df.is_some()
    }

    /////////////////////////////////////////////////////////////////////////////////////////////
    //                ITERATIONS
    /////////////////////////////////////////////////////////////////////////////////////////////
    fn evaluate(&self, x: &DVector<f64>, counter: &mut EvalCounter) -> Result<DVector<f64>, NewtonError> {
        counter.fun += 1;
        let fx = (self.f)(x)?;
        if fx.len() != x.len() {
            return Err(NewtonError::DimensionMismatch {
                expected: x.len(),
                found: fx.len(),
            });
        }
        Ok(fx)
    }

    fn jacobian(&self, x: &DVector<f64>, counter: &mut EvalCounter) -> Result<DMatrix<f64>, NewtonError> {
        counter.jac += 1;
        let n = x.len();
        let Df_x = match &self.Df {
            Some(Df) => Df(x)?,
            None => {
                counter.fun += n + 1;
                match &self.f_scalar {
                    Some(f) => {
                        check_scalar(x)?;
                        approximate_derivative(f.as_ref(), x[0], self.config.dx)
                    }
                    None => approximate_jacobian(self.f.as_ref(), x, self.config.dx)?,
                }
            }
        };
        if Df_x.shape() != (n, n) {
            return Err(NewtonError::DimensionMismatch {
                expected: n,
                found: if Df_x.nrows() != n {
                    Df_x.nrows()
                } else {
                    Df_x.ncols()
                },
            });
        }
        Ok(Df_x)
    }

    fn step_counted(
        &self,
        x: &DVector<f64>,
        fx: &DVector<f64>,
        counter: &mut EvalCounter,
    ) -> Result<DVector<f64>, NewtonError> {
        let Df_x = self.jacobian(x, counter)?;
        let h = solve_linear_system(&Df_x, fx)?;
        Ok(x - h)
    }

    /// f(x), checked to have the dimension of x
    pub fn residual(&self, x: &DVector<f64>) -> Result<DVector<f64>, NewtonError> {
        self.evaluate(x, &mut EvalCounter::default())
    }

    /// Take a single step of Newton's method starting from x.
    /// If `fx` is provided it is assumed to equal f(x).
    pub fn step(&self, x: &DVector<f64>, fx: Option<&DVector<f64>>) -> Result<DVector<f64>, NewtonError> {
        let mut counter = EvalCounter::default();
        match fx {
            Some(fx) => {
                if fx.len() != x.len() {
                    return Err(NewtonError::DimensionMismatch {
                        expected: x.len(),
                        found: fx.len(),
                    });
                }
                self.step_counted(x, fx, &mut counter)
            }
            None => {
                let fx = self.evaluate(x, &mut counter)?;
                self.step_counted(x, &fx, &mut counter)
            }
        }
    }

    pub fn step_scalar(&self, x: f64, fx: Option<f64>) -> Result<f64, NewtonError> {
        let x = DVector::from_element(1, x);
        let fx = fx.map(|v| DVector::from_element(1, v));
        let x_new = self.step(&x, fx.as_ref())?;
        Ok(x_new[0])
    }

    /// Return a root of f(x) = 0 found from the initial guess x0
    pub fn solve(&self, x0: &DVector<f64>) -> Result<DVector<f64>, NewtonError> {
        self.solve_detailed(x0).map(|report| report.root)
    }

    pub fn solve_scalar(&self, x0: f64) -> Result<f64, NewtonError> {
        let root = self.solve(&DVector::from_element(1, x0))?;
        Ok(root[0])
    }

    /// main loop: same as `solve`, returning the iteration statistics and history
    pub fn solve_detailed(&self, x0: &DVector<f64>) -> Result<NewtonReport, NewtonError> {
        if let Some(level) = &self.config.loglevel {
            init_term_logger(level);
        }
        if x0.is_empty() {
            return Err(NewtonError::InvalidConfiguration(
                "initial guess must not be empty".to_string(),
            ));
        }
        let begin = Instant::now();
        let tol = self.config.tol;
        let mut counter = EvalCounter::default();
        let mut history = Vec::new();
        let mut previous_norm = f64::INFINITY;
        let mut x = x0.clone();

        for i in 0..self.config.maxiter {
            let fx = self.evaluate(&x, &mut counter)?;
            let norm = fx.norm();
            debug!("iteration = {}, |f(x)| = {:e}", i, norm);
            history.push(IterationRecord {
                iteration: i,
                x: x.clone(),
                residual_norm: norm,
            });
            if norm < tol {
                let elapsed = begin.elapsed();
                info!(
                    "Solution found after {} iterations, |f(x)| = {:e}, elapsed {} ms",
                    i,
                    norm,
                    elapsed.as_millis()
                );
                return Ok(NewtonReport {
                    root: x,
                    residual_norm: norm,
                    iterations: i,
                    function_evaluations: counter.fun,
                    jacobian_evaluations: counter.jac,
                    elapsed,
                    history,
                });
            }
            if norm > previous_norm {
                warn!("Residual is increasing: {:e} > {:e}", norm, previous_norm);
            }
            previous_norm = norm;

            let x_new = self.step_counted(&x, &fx, &mut counter).inspect_err(|e| {
                error!("iteration {}: {}", i, e);
            })?;
            // distance from x0, not from the previous iterate
            if let Some(r) = self.config.radius {
                let distance = (&x_new - x0).norm();
                if distance > r {
                    let err = NewtonError::RadiusExceeded {
                        radius: r,
                        distance,
                        iteration: i + 1,
                    };
                    error!("{}", err);
                    return Err(err);
                }
            }
            x = x_new;
        }
        let err = NewtonError::NonConvergence {
            maxiter: self.config.maxiter,
            residual_norm: previous_norm,
        };
        error!("{}", err);
        Err(err)
    }
}

fn check_scalar(x: &DVector<f64>) -> Result<(), NewtonError> {
    if x.len() != 1 {
        return Err(NewtonError::DimensionMismatch {
            expected: 1,
            found: x.len(),
        });
    }
    Ok(())
}

//////////////////////////////////////////////////////////////////////////////////////////////
//                  LINEAR SYSTEM SOLVER
//////////////////////////////////////////////////////////////////////////////////////////////
/// Solve A h = b by LU decomposition with partial pivoting
pub fn solve_linear_system(A: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>, NewtonError> {
    let lu = A.clone().lu();
    match lu.solve(b) {
        Some(h) if h.iter().all(|v| v.is_finite()) => Ok(h),
        _ => Err(NewtonError::SingularJacobian),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_linear_system_lu() {
        let A = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![3.0, 5.0]);
        let h = solve_linear_system(&A, &b).unwrap();
        assert_relative_eq!(h, DVector::from_vec(vec![0.8, 1.4]), epsilon = 1e-12);
    }

    #[test]
    fn test_solve_linear_system_singular() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert_eq!(
            solve_linear_system(&A, &b),
            Err(NewtonError::SingularJacobian)
        );
        let zero = DMatrix::zeros(1, 1);
        assert_eq!(
            solve_linear_system(&zero, &DVector::from_element(1, 4.0)),
            Err(NewtonError::SingularJacobian)
        );
    }

    #[test]
    fn test_statistics_table() {
        let report = NewtonReport {
            root: DVector::from_vec(vec![0.0, 0.0]),
            residual_norm: 1e-12,
            iterations: 1,
            function_evaluations: 5,
            jacobian_evaluations: 1,
            elapsed: Duration::from_millis(3),
            history: Vec::new(),
        };
        let table = report.statistics_table();
        assert!(table.contains("number of iterations"));
        assert!(table.contains("function evaluations"));
        assert!(table.contains("5"));
    }

    #[test]
    fn test_check_scalar() {
        assert!(check_scalar(&DVector::from_element(1, 1.0)).is_ok());
        assert_eq!(
            check_scalar(&DVector::from_element(2, 1.0)),
            Err(NewtonError::DimensionMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
