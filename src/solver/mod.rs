//! Relaxation methods driven by `ConvergenceDriver`.

pub mod jacobi;
pub mod red_black;
pub mod reference;
pub mod shared_field;
mod workers;

pub use jacobi::JacobiSolver;
pub use red_black::RedBlackSolver;
pub use reference::ReferenceSolver;
pub use shared_field::SharedField;
pub use workers::WorkerReport;
