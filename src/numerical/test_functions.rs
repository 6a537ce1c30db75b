//! Simple functions to try the Newton solver on. Each value evaluator builds its derivative
//! evaluator as a separate object (`Polynomial::derivative`, `Sinusoid1D::derivative`,
//! `LinearMap::jacobian`, `Vortex2D::jacobian`).
use crate::numerical::NR_errors::NewtonError;
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;
use std::fmt;

/// Polynomial with coefficients in order of decreasing degree:
/// `Polynomial::new(vec![1.0, 2.0, 3.0])` is p(x) = x^2 + 2x + 3.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Result<Self, NewtonError> {
        if coeffs.is_empty() {
            return Err(NewtonError::InvalidConfiguration(
                "Polynomial needs at least one coefficient!".to_string(),
            ));
        }
        Ok(Self { coeffs })
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Horner's scheme
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs[1..]
            .iter()
            .fold(self.coeffs[0], |ans, c| x * ans + c)
    }

    /// exact derivative; the derivative of a constant is the zero polynomial
    pub fn derivative(&self) -> Polynomial {
        let d = self.degree();
        if d == 0 {
            return Polynomial { coeffs: vec![0.0] };
        }
        let coeffs = self.coeffs[..d]
            .iter()
            .enumerate()
            .map(|(j, c)| (d - j) as f64 * c)
            .collect();
        Polynomial { coeffs }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let coeffs: Vec<String> = self.coeffs.iter().map(|c| c.to_string()).collect();
        write!(f, "Polynomial({})", coeffs.join(", "))
    }
}

/// s(x) = a*sin(f*x + p)
#[derive(Debug, Clone, PartialEq)]
pub struct Sinusoid1D {
    a: f64,
    f: f64,
    p: f64,
}

impl Default for Sinusoid1D {
    fn default() -> Self {
        Self {
            a: 1.0,
            f: 1.0,
            p: 0.0,
        }
    }
}

impl Sinusoid1D {
    pub fn new(a: f64, f: f64, p: f64) -> Result<Self, NewtonError> {
        if a < 0.0 || f < 0.0 {
            return Err(NewtonError::InvalidConfiguration(
                "Amplitude and frequency must be positive!".to_string(),
            ));
        }
        Ok(Self { a, f, p })
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.a * (x * self.f + self.p).sin()
    }

    /// s'(x) = a*f*sin(f*x + p + pi/2), again a sinusoid
    pub fn derivative(&self) -> Sinusoid1D {
        Sinusoid1D {
            a: self.a * self.f,
            f: self.f,
            p: self.p + PI / 2.0,
        }
    }
}

/// Linear function R^n -> R^n given by an n x n matrix A
#[derive(Debug, Clone, PartialEq)]
pub struct LinearMap {
    A: DMatrix<f64>,
}

impl LinearMap {
    pub fn new(A: DMatrix<f64>) -> Result<Self, NewtonError> {
        if A.nrows() != A.ncols() {
            return Err(NewtonError::InvalidConfiguration(format!(
                "Make sure that A is nxn! Got {}x{}",
                A.nrows(),
                A.ncols()
            )));
        }
        Ok(Self { A })
    }

    pub fn dim(&self) -> usize {
        self.A.nrows()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.A
    }

    pub fn evaluate(&self, x: &DVector<f64>) -> Result<DVector<f64>, NewtonError> {
        if x.len() != self.dim() {
            return Err(NewtonError::DimensionMismatch {
                expected: self.dim(),
                found: x.len(),
            });
        }
        Ok(&self.A * x)
    }

    /// The Jacobian of a linear map is A itself, wherever it is evaluated
    pub fn jacobian(&self) -> DMatrix<f64> {
        self.A.clone()
    }
}

/// Clockwise spinning 2-D vector field f(x) = [x1, -x0]
#[derive(Debug, Clone, PartialEq)]
pub struct Vortex2D {
    map: LinearMap,
}

impl Default for Vortex2D {
    fn default() -> Self {
        Self::new()
    }
}

impl Vortex2D {
    pub fn new() -> Self {
        Self {
            map: LinearMap {
                A: DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0]),
            },
        }
    }

    pub fn evaluate(&self, x: &DVector<f64>) -> Result<DVector<f64>, NewtonError> {
        self.map.evaluate(x)
    }

    pub fn jacobian(&self) -> DMatrix<f64> {
        self.map.jacobian()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
        let step = (end - start) / (n - 1) as f64;
        (0..n).map(|i| start + i as f64 * step).collect()
    }

    #[test]
    fn test_polynomial() {
        // p(x) = x^2 + 2x + 3
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]).unwrap();
        for x in linspace(-2.0, 2.0, 11) {
            assert_relative_eq!(p.eval(x), x * x + 2.0 * x + 3.0, epsilon = 1e-12);
        }
        assert_eq!(p.to_string(), "Polynomial(1, 2, 3)");
    }

    #[test]
    fn test_polynomial_derivative() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]).unwrap();
        let dp = p.derivative();
        assert_eq!(dp.coeffs(), &[2.0, 2.0]);
        for x in linspace(-2.0, 2.0, 11) {
            assert_relative_eq!(dp.eval(x), 2.0 * x + 2.0, epsilon = 1e-12);
        }
        // x^3 + x^2 -> 3x^2 + 2x
        let cubic = Polynomial::new(vec![1.0, 1.0, 0.0, 0.0]).unwrap();
        let dcubic = cubic.derivative();
        for x in linspace(-2.0, 2.0, 11) {
            assert_relative_eq!(dcubic.eval(x), 3.0 * x * x + 2.0 * x, epsilon = 1e-12);
        }
        let constant = Polynomial::new(vec![7.0]).unwrap();
        assert_eq!(constant.derivative().eval(3.0), 0.0);
    }

    #[test]
    fn test_empty_polynomial() {
        assert!(matches!(
            Polynomial::new(vec![]),
            Err(NewtonError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_sinusoid() {
        let (a, f, p) = (1.0, 3.0, 0.0);
        let s = Sinusoid1D::new(a, f, p).unwrap();
        for x in linspace(-2.0, 2.0, 11) {
            assert_relative_eq!(s.eval(x), a * (f * x + p).sin(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sinusoid_derivative() {
        let (a, f, p) = (2.0, 3.0, 0.5);
        let ds = Sinusoid1D::new(a, f, p).unwrap().derivative();
        for x in linspace(-2.0, 2.0, 11) {
            assert_relative_eq!(ds.eval(x), a * f * (f * x + p).cos(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sinusoid_rejects_negative_parameters() {
        assert!(matches!(
            Sinusoid1D::new(-1.0, 1.0, 0.0),
            Err(NewtonError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Sinusoid1D::new(1.0, -1.0, 0.0),
            Err(NewtonError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_linear_map() {
        let A = DMatrix::from_element(2, 2, 1.0);
        let l = LinearMap::new(A.clone()).unwrap();
        let x = DVector::from_vec(vec![1.0, 1.0]);
        assert_eq!(l.evaluate(&x).unwrap(), DVector::from_vec(vec![2.0, 2.0]));
        assert_eq!(l.jacobian(), A);
    }

    #[test]
    fn test_linear_map_dimension_checks() {
        let not_square = DMatrix::from_element(2, 3, 1.0);
        assert!(matches!(
            LinearMap::new(not_square),
            Err(NewtonError::InvalidConfiguration(_))
        ));
        let l = LinearMap::new(DMatrix::identity(2, 2)).unwrap();
        let x = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        assert_eq!(
            l.evaluate(&x),
            Err(NewtonError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_vortex2d() {
        let v = Vortex2D::new();
        let x = DVector::from_vec(vec![1.0, 0.0]);
        assert_eq!(v.evaluate(&x).unwrap(), DVector::from_vec(vec![0.0, -1.0]));
        let x = DVector::from_vec(vec![1.0, 1.0]);
        assert_eq!(v.evaluate(&x).unwrap(), DVector::from_vec(vec![1.0, -1.0]));
        assert_eq!(
            v.jacobian(),
            DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -1.0, 0.0])
        );
    }
}
