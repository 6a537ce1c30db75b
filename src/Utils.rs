//! utility modules used by the solver
/// logger set-up and saving of the iteration history into a file
pub mod logger;
