#![allow(non_snake_case)]
use RustedNewton::Utils::logger::{init_logger, save_history_to_csv};
use RustedNewton::numerical::NR::Newton;
use RustedNewton::numerical::NR_config::NewtonConfig;
use RustedNewton::numerical::NR_errors::NewtonError;
use RustedNewton::numerical::NR_examples::NonlinearProblem;
use RustedNewton::numerical::test_functions::Polynomial;
use log::{info, warn};
use nalgebra::DVector;
use rand::Rng;
use strum::IntoEnumIterator;

fn main() {
    if let Err(e) = init_logger("info", false) {
        eprintln!("logger was not initialized: {}", e);
    }
    let example = 0;
    match example {
        0 => {
            // every test problem, with analytic and with finite-difference Jacobian
            for problem in NonlinearProblem::iter() {
                for analytic in [true, false] {
                    let x0 = problem.initial_guess();
                    let report = problem
                        .solver(problem.config(), analytic)
                        .and_then(|solver| solver.solve_detailed(&x0));
                    match report {
                        Ok(report) => info!(
                            "{} (analytic Jacobian: {}): root = {:?} \n {}",
                            problem,
                            analytic,
                            report.root.as_slice(),
                            report.statistics_table()
                        ),
                        Err(e) => warn!("{} (analytic Jacobian: {}) failed: {}", problem, analytic, e),
                    }
                }
            }
        }
        1 => {
            // multi-start: x^3 - 2x + 2 has a 2-cycle 0 -> 1 -> 0 under Newton, so some
            // initial guesses never converge; retry from random points inside [-3, 3]
            let p = Polynomial::new(vec![1.0, 0.0, -2.0, 2.0]).unwrap();
            let dp = p.derivative();
            let config = NewtonConfig::new().with_tol(1e-12).with_maxiter(30).with_radius(4.0);
            let solver = Newton::scalar(move |x| p.eval(x), config)
                .unwrap()
                .with_scalar_derivative(move |x| dp.eval(x));
            let mut rng = rand::rng();
            let mut x0 = 0.0;
            for attempt in 0..20 {
                match solver.solve_scalar(x0) {
                    Ok(root) => {
                        info!("attempt {}: x0 = {}, root = {}", attempt, x0, root);
                        break;
                    }
                    Err(
                        e @ (NewtonError::NonConvergence { .. }
                        | NewtonError::RadiusExceeded { .. }
                        | NewtonError::SingularJacobian),
                    ) => {
                        warn!("attempt {}: x0 = {} failed: {}", attempt, x0, e);
                        x0 = rng.random_range(-3.0..3.0);
                    }
                    Err(e) => panic!("{}", e),
                }
            }
        }
        2 => {
            // iteration history of the circle-line system saved to csv
            let problem = NonlinearProblem::CircleLine;
            let report = problem
                .solver(problem.config(), false)
                .and_then(|solver| solver.solve_detailed(&DVector::from_vec(vec![1.0, 1.0])))
                .unwrap();
            save_history_to_csv(&report, "newton_history.csv").unwrap();
            info!("history of {} iterations saved", report.iterations);
        }
        _ => {
            println!("example not found");
        }
    }
}
