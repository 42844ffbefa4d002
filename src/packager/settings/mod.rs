//! Configuration for packaging runs.
//!
//! [`PackagerSettings`] replaces any reliance on the process working
//! directory: every path the pipeline touches is resolved against its
//! `work_dir`. Build it with [`SettingsBuilder`].

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use core::{Compression, PackagerSettings};
