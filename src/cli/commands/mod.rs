//! Command execution functions for packager operations.

mod package;

pub use package::execute_package;
