use crate::numerical::NR_errors::NewtonError;
use crate::numerical::finite_difference::DEFAULT_DX;
use std::fs;
use std::path::Path;
use toml::{Table, Value};

const LOG_LEVELS: [&str; 6] = ["debug", "info", "warn", "error", "off", "none"];
const KNOWN_KEYS: [&str; 5] = ["tol", "maxiter", "dx", "radius", "loglevel"];

/// Configuration of the Newton-Raphson solver
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// iterate until |f(x)| < tol
    pub tol: f64,
    /// maximum number of iterations to perform
    pub maxiter: usize,
    /// step size for computing approximate Jacobian
    pub dx: f64,
    /// search radius around the initial guess, None means unbounded
    pub radius: Option<f64>,
    /// if set, solve_detailed installs a terminal logger with this level
    pub loglevel: Option<String>,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            maxiter: 20,
            dx: DEFAULT_DX,
            radius: None,
            loglevel: None,
        }
    }
}

impl NewtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    pub fn with_dx(mut self, dx: f64) -> Self {
        self.dx = dx;
        self
    }

    /// Set the search radius. An infinite radius is stored as "no bound".
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = if radius == f64::INFINITY {
            None
        } else {
            Some(radius)
        };
        self
    }

    pub fn with_loglevel(mut self, loglevel: &str) -> Self {
        self.loglevel = Some(loglevel.to_lowercase());
        self
    }

    /// Check tol > 0, maxiter >= 1, dx > 0, radius > 0 and a known log level
    pub fn validate(&self) -> Result<(), NewtonError> {
        if !(self.tol > 0.0) {
            return Err(NewtonError::InvalidConfiguration(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        if self.maxiter == 0 {
            return Err(NewtonError::InvalidConfiguration(
                "maxiter must be at least 1".to_string(),
            ));
        }
        if !(self.dx > 0.0) || !self.dx.is_finite() {
            return Err(NewtonError::InvalidConfiguration(format!(
                "dx must be positive and finite, got {}",
                self.dx
            )));
        }
        if let Some(r) = self.radius {
            if !(r > 0.0) {
                return Err(NewtonError::InvalidConfiguration(format!(
                    "search radius must be positive, got {}",
                    r
                )));
            }
        }
        if let Some(level) = &self.loglevel {
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(NewtonError::InvalidConfiguration(format!(
                    "loglevel must be one of {:?}, got {}",
                    LOG_LEVELS, level
                )));
            }
        }
        Ok(())
    }

    ////////////////////////////////////TOML////////////////////////////////////////
    /// Read a config from TOML. Keys may sit at the top level or inside a `[newton]` table:
    /// ```
    /// use RustedNewton::numerical::NR_config::NewtonConfig;
    /// let config = NewtonConfig::from_toml_str(
    ///     "[newton]\n tol = 1e-10\n maxiter = 30\n radius = inf\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.maxiter, 30);
    /// assert_eq!(config.radius, None);
    /// ```
    pub fn from_toml_str(document: &str) -> Result<Self, NewtonError> {
        let table = document
            .parse::<Table>()
            .map_err(|e| NewtonError::InvalidConfiguration(format!("malformed TOML: {}", e)))?;
        let section = match table.get("newton") {
            Some(Value::Table(section)) => section,
            Some(_) => {
                return Err(NewtonError::InvalidConfiguration(
                    "`newton` must be a table".to_string(),
                ));
            }
            None => &table,
        };

        let mut config = Self::default();
        for (key, value) in section.iter() {
            match key.as_str() {
                "tol" => config.tol = float_value(key, value)?,
                "dx" => config.dx = float_value(key, value)?,
                "radius" => config = config.with_radius(float_value(key, value)?),
                "maxiter" => {
                    let maxiter = value.as_integer().ok_or_else(|| {
                        NewtonError::InvalidConfiguration("maxiter must be an integer".to_string())
                    })?;
                    config.maxiter = usize::try_from(maxiter).map_err(|_| {
                        NewtonError::InvalidConfiguration(format!(
                            "maxiter must be non-negative, got {}",
                            maxiter
                        ))
                    })?;
                }
                "loglevel" => {
                    let level = value.as_str().ok_or_else(|| {
                        NewtonError::InvalidConfiguration("loglevel must be a string".to_string())
                    })?;
                    config = config.with_loglevel(level);
                }
                other => {
                    return Err(NewtonError::InvalidConfiguration(format!(
                        "unknown key `{}`, expected one of {:?}",
                        other, KNOWN_KEYS
                    )));
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, NewtonError> {
        let document = fs::read_to_string(path.as_ref()).map_err(|e| {
            NewtonError::InvalidConfiguration(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&document)
    }
}

// integers are accepted where a float is expected
fn float_value(key: &str, value: &Value) -> Result<f64, NewtonError> {
    match value {
        Value::Float(v) => Ok(*v),
        Value::Integer(v) => Ok(*v as f64),
        _ => Err(NewtonError::InvalidConfiguration(format!(
            "{} must be a number",
            key
        ))),
    }
}
