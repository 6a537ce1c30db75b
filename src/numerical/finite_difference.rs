//! Forward-difference approximation of the Jacobian of a function R^n -> R^n.
//!
//! Column `i` of the result is `(f(x + dx*e_i) - f(x)) / dx`, so every call costs
//! `n + 1` evaluations of `f`. Nothing is cached between calls.
use crate::numerical::NR_errors::NewtonError;
use nalgebra::{DMatrix, DVector};

/// default finite-difference step
pub const DEFAULT_DX: f64 = 1e-6;

/// Return an approximation of the Jacobian Df(x) as an n x n matrix, n = x.len().
/// Errors raised by `f` are returned unchanged.
pub fn approximate_jacobian<F>(
    f: &F,
    x: &DVector<f64>,
    dx: f64,
) -> Result<DMatrix<f64>, NewtonError>
where
    F: Fn(&DVector<f64>) -> Result<DVector<f64>, NewtonError> + ?Sized,
{
    let n = x.len();
    let fx = f(x)?;
    if fx.len() != n {
        return Err(NewtonError::DimensionMismatch {
            expected: n,
            found: fx.len(),
        });
    }
    let mut Df_x = DMatrix::zeros(n, n);
    // perturbed copy, x itself is never touched
    let mut x_perturbed = x.clone();
    for i in 0..n {
        x_perturbed[i] = x[i] + dx;
        let f_perturbed = f(&x_perturbed)?;
        if f_perturbed.len() != n {
            return Err(NewtonError::DimensionMismatch {
                expected: n,
                found: f_perturbed.len(),
            });
        }
        Df_x.set_column(i, &((f_perturbed - &fx) / dx));
        x_perturbed[i] = x[i];
    }
    Ok(Df_x)
}

/// Scalar special case: the 1x1 Jacobian of f: R -> R at x.
/// Used by solvers built with `Newton::scalar` when no derivative is supplied.
pub fn approximate_derivative<F>(f: F, x: f64, dx: f64) -> DMatrix<f64>
where
    F: Fn(f64) -> f64,
{
    let fx = f(x);
    DMatrix::from_element(1, 1, (f(x + dx) - fx) / dx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::Rng;
    use std::cell::Cell;

    #[test]
    fn test_approx_jacobian_scalar_linear() {
        let slope = 3.0;
        let Df_x = approximate_derivative(|x| slope * x + 5.0, 2.0, 1e-3);
        assert_eq!(Df_x.shape(), (1, 1));
        assert_relative_eq!(Df_x[(0, 0)], slope, epsilon = 1e-9);
    }

    #[test]
    fn test_approx_jacobian_linear_map() {
        let A = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let f = |x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> { Ok(&A * x) };
        let x0 = DVector::from_vec(vec![5.0, 6.0]);
        let Df_x = approximate_jacobian(&f, &x0, 1e-6).unwrap();
        assert_eq!(Df_x.shape(), (2, 2));
        assert_abs_diff_eq!(Df_x, A, epsilon = 1e-6);
    }

    #[test]
    fn test_approx_jacobian_linear_map_random_points() {
        let A = DMatrix::from_row_slice(3, 3, &[2.0, -1.0, 0.5, 0.0, 3.0, 1.0, -4.0, 1.0, 1.0]);
        let f = |x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> { Ok(&A * x) };
        let mut rng = rand::rng();
        for _ in 0..10 {
            let x = DVector::from_fn(3, |_, _| rng.random_range(-10.0..10.0));
            for dx in [1e-3, 1e-5, 1e-7] {
                let Df_x = approximate_jacobian(&f, &x, dx).unwrap();
                assert_abs_diff_eq!(Df_x, A, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_approx_jacobian_converges_with_dx() {
        // f(x, y) = (x^2 y, sin(x) + y^3)
        let f = |v: &DVector<f64>| -> Result<DVector<f64>, NewtonError> {
            Ok(DVector::from_vec(vec![
                v[0] * v[0] * v[1],
                v[0].sin() + v[1].powi(3),
            ]))
        };
        let x: DVector<f64> = DVector::from_vec(vec![0.7, -1.3]);
        let exact = DMatrix::from_row_slice(
            2,
            2,
            &[2.0 * x[0] * x[1], x[0] * x[0], x[0].cos(), 3.0 * x[1] * x[1]],
        );
        let mut previous_error = f64::INFINITY;
        for dx in [1e-1, 1e-2, 1e-3, 1e-4] {
            let error = (approximate_jacobian(&f, &x, dx).unwrap() - &exact).norm();
            assert!(error < previous_error);
            previous_error = error;
        }
        assert!(previous_error < 1e-3);
    }

    #[test]
    fn test_approx_jacobian_multivariate_linear() {
        let f = |x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> {
            Ok(DVector::from_vec(vec![x[0] - x[1], x[0] + x[1]]))
        };
        let x0 = DVector::from_vec(vec![1.0, 1.0]);
        let expected = DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 1.0, 1.0]);
        let Df_x = approximate_jacobian(&f, &x0, DEFAULT_DX).unwrap();
        assert_abs_diff_eq!(Df_x, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_approx_derivative_quadratic() {
        let Df_x = approximate_derivative(|x| x * x, 1.0, DEFAULT_DX);
        assert_abs_diff_eq!(Df_x[(0, 0)], 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_approx_jacobian_costs_n_plus_one_evaluations() {
        let calls = Cell::new(0usize);
        let f = |x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> {
            calls.set(calls.get() + 1);
            Ok(x.map(|v| v * v))
        };
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        approximate_jacobian(&f, &x, DEFAULT_DX).unwrap();
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_approx_jacobian_propagates_function_error() {
        let f = |_x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> {
            Err(NewtonError::InvalidConfiguration("bad x".to_string()))
        };
        let x = DVector::from_vec(vec![1.0]);
        let res = approximate_jacobian(&f, &x, DEFAULT_DX);
        assert_eq!(
            res,
            Err(NewtonError::InvalidConfiguration("bad x".to_string()))
        );
    }

    #[test]
    fn test_approx_jacobian_rejects_non_square_function() {
        let f = |x: &DVector<f64>| -> Result<DVector<f64>, NewtonError> {
            Ok(DVector::from_vec(vec![x[0], x[1], x[0] + x[1]]))
        };
        let x = DVector::from_vec(vec![1.0, 2.0]);
        let res = approximate_jacobian(&f, &x, DEFAULT_DX);
        assert!(matches!(
            res,
            Err(NewtonError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }
}
