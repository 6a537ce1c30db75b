use std::fmt;

/// Error types for the Newton-Raphson solver and the functions it evaluates
#[derive(Debug, Clone, PartialEq)]
pub enum NewtonError {
    /// iteration budget exhausted while the residual norm stayed above tolerance
    NonConvergence { maxiter: usize, residual_norm: f64 },
    /// an iterate left the ball of radius `radius` around the initial guess
    RadiusExceeded {
        radius: f64,
        distance: f64,
        iteration: usize,
    },
    /// the linear system for the Newton step could not be solved
    SingularJacobian,
    /// a vector or matrix does not have the dimension of the iterate
    DimensionMismatch { expected: usize, found: usize },
    InvalidConfiguration(String),
}

impl fmt::Display for NewtonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NewtonError::NonConvergence {
                maxiter,
                residual_norm,
            } => write!(
                f,
                "Newton did not converge in {} iterations! (|f(x)| = {:e})",
                maxiter, residual_norm
            ),
            NewtonError::RadiusExceeded {
                radius,
                distance,
                iteration,
            } => write!(
                f,
                "Left search radius r = {} before finding root (|x - x0| = {} at iteration {})",
                radius, distance, iteration
            ),
            NewtonError::SingularJacobian => {
                write!(f, "Jacobian was non-invertible, pick new f(x) or initial guess")
            }
            NewtonError::DimensionMismatch { expected, found } => write!(
                f,
                "Dimension mismatch: expected {}, found {}",
                expected, found
            ),
            NewtonError::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for NewtonError {}
