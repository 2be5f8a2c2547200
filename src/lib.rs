pub mod barrier;
pub mod build_info;
pub mod cli;
pub mod convergence;
pub mod error;
pub mod grid;
pub mod heat_map;
pub mod init;
pub mod partition;
pub mod report;
pub mod solver;
pub mod solver_interface;
pub mod solver_parameters;
pub mod stencil;

pub use error::{Result, SolveError};
