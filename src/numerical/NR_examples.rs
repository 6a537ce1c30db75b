//! a collection of test problems with known roots, built from the functions of `test_functions`
use crate::numerical::NR::Newton;
use crate::numerical::NR_config::NewtonConfig;
use crate::numerical::NR_errors::NewtonError;
use crate::numerical::test_functions::{LinearMap, Polynomial, Sinusoid1D, Vortex2D};
use nalgebra::{DMatrix, DVector};
use strum_macros::{Display, EnumIter};

/*
 Linear:      3x + 6 = 0,                   x0 = 2,      root -2
 Quadratic:   2x^2 = 0,                     x0 = 5,      double root 0
 Cubic:       x^3 + x^2 = 0,                x0 = 5,      double root 0, trajectory stays within r = 5
 Sinusoid:    sin(x) = 0,                   x0 = 1,      root 0
 LinearMap:   [[1,2],[3,4]] x = 0,          x0 = (1,2),  root (0,0)
 Vortex:      (x1, -x0) = 0,                x0 = (1,1),  root (0,0)
 CircleLine:  x^2 + y^2 - 10 = 0, x - y - 4 = 0, x0 = (1,1), root (3,-1)
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum NonlinearProblem {
    Linear,
    Quadratic,
    Cubic,
    Sinusoid,
    LinearMap,
    Vortex,
    CircleLine,
}

impl NonlinearProblem {
    pub fn initial_guess(&self) -> DVector<f64> {
        match self {
            NonlinearProblem::Linear => DVector::from_element(1, 2.0),
            NonlinearProblem::Quadratic | NonlinearProblem::Cubic => DVector::from_element(1, 5.0),
            NonlinearProblem::Sinusoid => DVector::from_element(1, 1.0),
            NonlinearProblem::LinearMap => DVector::from_vec(vec![1.0, 2.0]),
            NonlinearProblem::Vortex | NonlinearProblem::CircleLine => {
                DVector::from_vec(vec![1.0, 1.0])
            }
        }
    }

    pub fn expected_root(&self) -> DVector<f64> {
        match self {
            NonlinearProblem::Linear => DVector::from_element(1, -2.0),
            NonlinearProblem::Quadratic | NonlinearProblem::Cubic | NonlinearProblem::Sinusoid => {
                DVector::zeros(1)
            }
            NonlinearProblem::LinearMap | NonlinearProblem::Vortex => DVector::zeros(2),
            NonlinearProblem::CircleLine => DVector::from_vec(vec![3.0, -1.0]),
        }
    }

    /// how close the found root must be to `expected_root`. Double roots converge
    /// linearly, so only |x|^2 < tol is reached there.
    pub fn root_tolerance(&self) -> f64 {
        match self {
            NonlinearProblem::Quadratic | NonlinearProblem::Cubic => 1e-4,
            _ => 1e-8,
        }
    }

    pub fn config(&self) -> NewtonConfig {
        let config = NewtonConfig::new().with_tol(1e-10);
        match self {
            NonlinearProblem::Linear => config.with_maxiter(4).with_dx(1e-5),
            NonlinearProblem::Quadratic => config.with_maxiter(30).with_dx(1e-5),
            NonlinearProblem::Cubic => config.with_maxiter(30).with_dx(1e-5).with_radius(5.0),
            NonlinearProblem::Sinusoid => config.with_maxiter(20).with_dx(1e-5),
            NonlinearProblem::LinearMap => config.with_maxiter(3),
            NonlinearProblem::Vortex | NonlinearProblem::CircleLine => config.with_maxiter(50),
        }
    }

    /// Build a solver for the problem, with the analytic Jacobian or with finite differences
    pub fn solver(&self, config: NewtonConfig, analytic: bool) -> Result<Newton, NewtonError> {
        let solver = match self {
            NonlinearProblem::Linear => polynomial_solver(vec![3.0, 6.0], config, analytic)?,
            NonlinearProblem::Quadratic => {
                polynomial_solver(vec![2.0, 0.0, 0.0], config, analytic)?
            }
            NonlinearProblem::Cubic => {
                polynomial_solver(vec![1.0, 1.0, 0.0, 0.0], config, analytic)?
            }
            NonlinearProblem::Sinusoid => {
                let s = Sinusoid1D::default();
                let ds = s.derivative();
                let solver = Newton::scalar(move |x| s.eval(x), config)?;
                if analytic {
                    solver.with_scalar_derivative(move |x| ds.eval(x))
                } else {
                    solver
                }
            }
            NonlinearProblem::LinearMap => {
                let l = LinearMap::new(DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]))?;
                let A = l.jacobian();
                let solver = Newton::new(move |x: &DVector<f64>| l.evaluate(x), config)?;
                if analytic {
                    solver.with_jacobian(move |_x: &DVector<f64>| Ok(A.clone()))
                } else {
                    solver
                }
            }
            NonlinearProblem::Vortex => {
                let v = Vortex2D::new();
                let J = v.jacobian();
                let solver = Newton::new(move |x: &DVector<f64>| v.evaluate(x), config)?;
                if analytic {
                    solver.with_jacobian(move |_x: &DVector<f64>| Ok(J.clone()))
                } else {
                    solver
                }
            }
            NonlinearProblem::CircleLine => {
                let solver = Newton::new(
                    |v: &DVector<f64>| {
                        Ok(DVector::from_vec(vec![
                            v[0] * v[0] + v[1] * v[1] - 10.0,
                            v[0] - v[1] - 4.0,
                        ]))
                    },
                    config,
                )?;
                if analytic {
                    solver.with_jacobian(|v: &DVector<f64>| {
                        Ok(DMatrix::from_row_slice(
                            2,
                            2,
                            &[2.0 * v[0], 2.0 * v[1], 1.0, -1.0],
                        ))
                    })
                } else {
                    solver
                }
            }
        };
        Ok(solver)
    }
}

fn polynomial_solver(
    coeffs: Vec<f64>,
    config: NewtonConfig,
    analytic: bool,
) -> Result<Newton, NewtonError> {
    let p = Polynomial::new(coeffs)?;
    let dp = p.derivative();
    let solver = Newton::scalar(move |x| p.eval(x), config)?;
    if analytic {
        Ok(solver.with_scalar_derivative(move |x| dp.eval(x)))
    } else {
        Ok(solver)
    }
}
