//! Helpers shared by the packaging stages.

pub mod fs;
